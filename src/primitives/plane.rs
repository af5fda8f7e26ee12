use super::ray::Ray;
use crate::math::vec3::Vec3;

/// An infinite plane in Hessian normal form.
///
/// A point `p` lies on the plane when `normal.dot(p) + distance == 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    normal: Vec3,
    distance: f32,
}

impl Plane {
    /// Creates a plane from a unit normal and signed distance.
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    /// Creates the plane through three points.
    ///
    /// The normal is `normalize((b - a) x (c - a))`, so the winding of the
    /// points picks the side it faces. Collinear points give a zero normal.
    pub fn from_points(a: Vec3, b: Vec3, c: Vec3) -> Self {
        let normal = (b - a).cross(c - a).normalize();
        Self {
            normal,
            distance: -normal.dot(a),
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Returns the signed distance from a point to this plane.
    /// Positive = on the side the normal points to.
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }

    /// Intersects a ray with the plane.
    ///
    /// Returns the distance along the ray to the hit point, or `None` when
    /// the ray is within `tolerance` of parallel to the plane or the hit lies
    /// at or behind the ray origin.
    pub fn raycast(&self, ray: &Ray, tolerance: f32) -> Option<f32> {
        let along = ray.direction().dot(self.normal);
        if along.abs() < tolerance {
            return None;
        }

        let dist = (-ray.origin().dot(self.normal) - self.distance) / along;
        (dist > 0.0).then_some(dist)
    }
}
