//! Object poses and local coordinate frames.
//!
//! [`Transform`] is a pose with a fluent API for position, rotation (Euler
//! angles), and scale. [`LocalFrame`] is what the clipping code consumes: a
//! pair of linear maps plus a separately tracked translation, converting
//! points between world space and an object's local space.

use crate::math::{mat4::Mat4, vec3::Vec3};

/// A 3D transform with position, rotation (Euler angles), and scale.
///
/// Provides a fluent API where mutating methods return `&mut Self` for chaining:
///
/// ```ignore
/// transform
///     .set_position_xyz(5.0, 2.0, 0.0)
///     .set_rotation_xyz(0.0, 0.1, 0.0)
///     .set_scale_uniform(2.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    position: Vec3,
    rotation: Vec3, // Euler angles in radians: x=pitch, y=yaw, z=roll
    scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform with default values (position=0, rotation=0, scale=1).
    pub fn new() -> Self {
        Self::default()
    }

    // ============ Position ============

    /// Get the position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Set the position.
    pub fn set_position(&mut self, position: Vec3) -> &mut Self {
        self.position = position;
        self
    }

    /// Set the position from x, y, z components.
    pub fn set_position_xyz(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.position = Vec3::new(x, y, z);
        self
    }

    // ============ Rotation ============

    /// Get the rotation (Euler angles in radians).
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Set the rotation from x, y, z components (radians).
    pub fn set_rotation_xyz(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.rotation = Vec3::new(x, y, z);
        self
    }

    // ============ Scale ============

    /// Get the scale.
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Set the scale.
    pub fn set_scale(&mut self, scale: Vec3) -> &mut Self {
        self.scale = scale;
        self
    }

    /// Set uniform scale (same value for x, y, z).
    pub fn set_scale_uniform(&mut self, s: f32) -> &mut Self {
        self.scale = Vec3::new(s, s, s);
        self
    }

    // ============ Matrix Generation ============

    /// Generate the transformation matrix.
    ///
    /// Order: Translation * RotationX * RotationY * RotationZ * Scale
    /// (Scale applied first, then rotations, then translation)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::translation(self.position.x, self.position.y, self.position.z) * self.linear_matrix()
    }

    /// Rotation and scale only, without translation.
    pub fn linear_matrix(&self) -> Mat4 {
        Mat4::rotation_x(self.rotation.x)
            * Mat4::rotation_y(self.rotation.y)
            * Mat4::rotation_z(self.rotation.z)
            * Mat4::scaling(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Inverse of [`Transform::linear_matrix`], built from the inverted
    /// factors in reverse order. A zero scale axis maps to zero.
    pub fn inverse_linear_matrix(&self) -> Mat4 {
        let recip = |s: f32| if s.abs() < f32::EPSILON { 0.0 } else { 1.0 / s };
        Mat4::scaling(recip(self.scale.x), recip(self.scale.y), recip(self.scale.z))
            * Mat4::rotation_z(-self.rotation.z)
            * Mat4::rotation_y(-self.rotation.y)
            * Mat4::rotation_x(-self.rotation.x)
    }

    /// Build the local frame for this pose.
    pub fn local_frame(&self) -> LocalFrame {
        LocalFrame::new(
            self.inverse_linear_matrix(),
            self.linear_matrix(),
            self.position,
        )
    }

    /// Approximate equality, used to detect that a pose has changed.
    pub fn approx_eq(&self, other: &Transform, epsilon: f32) -> bool {
        let close = |a: Vec3, b: Vec3| (a - b).magnitude() <= epsilon;
        close(self.position, other.position)
            && close(self.rotation, other.rotation)
            && close(self.scale, other.scale)
    }
}

/// Converts points between world space and a local frame.
///
/// ```text
/// to_world(p) = local_to_world * p + translation
/// to_local(p) = world_to_local * (p - translation)
/// ```
///
/// The matrices act on directions only (w=0), so moving a frame's origin
/// just means replacing `translation`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalFrame {
    world_to_local: Mat4,
    local_to_world: Mat4,
    translation: Vec3,
}

impl Default for LocalFrame {
    fn default() -> Self {
        Self::identity()
    }
}

impl LocalFrame {
    pub fn new(world_to_local: Mat4, local_to_world: Mat4, translation: Vec3) -> Self {
        Self {
            world_to_local,
            local_to_world,
            translation,
        }
    }

    pub fn identity() -> Self {
        Self::new(Mat4::identity(), Mat4::identity(), Vec3::ZERO)
    }

    /// Build a frame from a host-supplied local-to-world linear map.
    ///
    /// Returns `None` if the map is singular.
    pub fn from_local_to_world(local_to_world: Mat4, translation: Vec3) -> Option<Self> {
        let world_to_local = local_to_world.inverse()?;
        Some(Self::new(world_to_local, local_to_world, translation))
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    /// Same frame with its origin moved to `translation`.
    pub fn with_translation(&self, translation: Vec3) -> Self {
        Self {
            translation,
            ..*self
        }
    }

    pub fn to_world(&self, point: Vec3) -> Vec3 {
        self.local_to_world.transform_vector(point) + self.translation
    }

    pub fn to_local(&self, point: Vec3) -> Vec3 {
        self.world_to_local.transform_vector(point - self.translation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default() {
        let t = Transform::default();
        assert_eq!(t.position(), Vec3::ZERO);
        assert_eq!(t.rotation(), Vec3::ZERO);
        assert_eq!(t.scale(), Vec3::ONE);
    }

    #[test]
    fn test_fluent_api() {
        let mut t = Transform::new();
        t.set_position_xyz(1.0, 2.0, 3.0)
            .set_rotation_xyz(0.0, 0.5, 0.0)
            .set_scale_uniform(2.0);

        assert_eq!(t.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(t.rotation().y, 0.5);
        assert_eq!(t.scale(), Vec3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_to_matrix_identity() {
        let t = Transform::default();
        let m = t.to_matrix();
        // Default transform should produce identity matrix
        assert_eq!(m, Mat4::identity());
    }

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-5);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-5);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-5);
    }

    #[test]
    fn local_frame_round_trip() {
        let mut t = Transform::new();
        t.set_position_xyz(3.0, -1.0, 2.0)
            .set_rotation_xyz(0.3, 1.1, -0.4)
            .set_scale(Vec3::new(2.0, 0.5, 4.0));
        let frame = t.local_frame();

        let p = Vec3::new(0.25, -0.5, 0.125);
        assert_vec_eq(frame.to_local(frame.to_world(p)), p);
        assert_vec_eq(frame.to_world(Vec3::ZERO), t.position());
    }

    #[test]
    fn local_frame_matches_matrix() {
        let mut t = Transform::new();
        t.set_position_xyz(1.0, 2.0, 3.0).set_rotation_xyz(0.0, 0.8, 0.0).set_scale_uniform(3.0);
        let p = Vec3::new(0.5, 0.5, -0.5);
        assert_vec_eq(t.local_frame().to_world(p), t.to_matrix() * p);
    }

    #[test]
    fn zero_scale_stays_finite() {
        let mut t = Transform::new();
        t.set_scale(Vec3::new(1.0, 0.0, 1.0));
        assert!(t.local_frame().to_local(Vec3::ONE).is_finite());
    }

    #[test]
    fn with_translation_moves_origin_only() {
        let frame = LocalFrame::identity().with_translation(Vec3::new(0.0, 5.0, 0.0));
        assert_vec_eq(frame.to_local(Vec3::new(1.0, 5.0, 0.0)), Vec3::RIGHT);
    }

    #[test]
    fn from_singular_matrix_is_none() {
        assert!(LocalFrame::from_local_to_world(Mat4::scaling(0.0, 1.0, 1.0), Vec3::ZERO).is_none());
    }

    #[test]
    fn approx_eq_detects_pose_change() {
        let a = Transform::new();
        let mut b = a;
        assert!(a.approx_eq(&b, 1e-6));
        b.set_position_xyz(0.01, 0.0, 0.0);
        assert!(!a.approx_eq(&b, 1e-6));
    }
}
