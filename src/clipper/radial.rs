//! Rotational ordering of coplanar points.
//!
//! Clipping produces an unordered set of points on the boundary of a convex
//! polygon. Sorting them by signed angle around the polygon's normal turns
//! that set into a boundary walk that can be fan-triangulated.

use std::cmp::Ordering;

use crate::math::vec3::Vec3;

/// Vectors shorter than this have no meaningful direction.
const DEGENERATE_LENGTH: f32 = 1e-6;

/// Signed angle in degrees from `a` to `b`, measured around `normal`.
///
/// The magnitude is the unsigned angle between the vectors, in `[0, 180]`;
/// it is negated when `a x b` points away from `normal`. Returns 0 if either
/// vector has (near) zero length.
pub fn signed_angle(a: Vec3, b: Vec3, normal: Vec3) -> f32 {
    let (len_a, len_b) = (a.magnitude(), b.magnitude());
    if len_a < DEGENERATE_LENGTH || len_b < DEGENERATE_LENGTH {
        return 0.0;
    }

    let cos = (a.dot(b) / (len_a * len_b)).clamp(-1.0, 1.0);
    let angle = cos.acos().to_degrees();
    if normal.dot(a.cross(b)) < 0.0 {
        -angle
    } else {
        angle
    }
}

/// Orders points by the signed angle of `center - point` relative to a
/// reference direction, around a normal.
///
/// Ascending order walks counter-clockwise when seen from the side the
/// normal points to.
#[derive(Clone, Copy, Debug)]
pub struct RadialOrder {
    reference: Vec3,
    center: Vec3,
    normal: Vec3,
}

impl RadialOrder {
    pub fn new(reference: Vec3, center: Vec3, normal: Vec3) -> Self {
        Self {
            reference,
            center,
            normal,
        }
    }

    /// Ordering that starts at `first`: its angle is 0 by construction.
    pub fn starting_at(first: Vec3, center: Vec3, normal: Vec3) -> Self {
        Self::new(center - first, center, normal)
    }

    pub fn angle_of(&self, point: Vec3) -> f32 {
        signed_angle(self.reference, self.center - point, self.normal)
    }

    pub fn compare(&self, a: &Vec3, b: &Vec3) -> Ordering {
        self.angle_of(*a).total_cmp(&self.angle_of(*b))
    }

    /// Sorts `points` in place. Stable, so ties keep their input order.
    pub fn sort(&self, points: &mut [Vec3]) {
        points.sort_by(|a, b| self.compare(a, b));
    }
}
