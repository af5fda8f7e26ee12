//! Triangles with their derived edges, plane, normal and area.

use crate::math::vec3::Vec3;
use crate::primitives::{Edge, Plane};
use crate::transform::LocalFrame;

/// A triangle defined by three points in a fixed winding.
///
/// Edges (0→1, 1→2, 2→0), the supporting plane, and the area are derived
/// together in [`Triangle::new`]. There are no setters: moved geometry is
/// always a new triangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    vertices: [Vec3; 3],
    edges: [Edge; 3],
    plane: Plane,
    area: f32,
}

/// Area of the triangle `(a, b, c)`: half the magnitude of the cross product.
pub fn triangle_area(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    0.5 * (b - a).cross(c - a).magnitude()
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self {
            vertices: [a, b, c],
            edges: [Edge::new(a, b), Edge::new(b, c), Edge::new(c, a)],
            plane: Plane::from_points(a, b, c),
            area: triangle_area(a, b, c),
        }
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        self.vertices
    }

    pub fn vertex0(&self) -> Vec3 {
        self.vertices[0]
    }

    pub fn vertex1(&self) -> Vec3 {
        self.vertices[1]
    }

    pub fn vertex2(&self) -> Vec3 {
        self.vertices[2]
    }

    pub fn edges(&self) -> &[Edge; 3] {
        &self.edges
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Unit normal, or zero for a degenerate triangle.
    pub fn normal(&self) -> Vec3 {
        self.plane.normal()
    }

    pub fn area(&self) -> f32 {
        self.area
    }

    pub fn centroid(&self) -> Vec3 {
        (self.vertices[0] + self.vertices[1] + self.vertices[2]) / 3.0
    }

    /// Returns true if `point` lies inside the triangle.
    ///
    /// Area-sum test: the three triangles formed by `point` and each edge
    /// must add up to this triangle's area within `tolerance`. Only
    /// meaningful for points on (or very near) the triangle's plane.
    pub fn contains(&self, point: Vec3, tolerance: f32) -> bool {
        let [a, b, c] = self.vertices;
        let sum = triangle_area(a, b, point) + triangle_area(b, c, point) + triangle_area(c, a, point);
        (self.area - sum).abs() < tolerance
    }

    /// Maps the vertices from `frame`'s local space into world space.
    pub fn to_world(&self, frame: &LocalFrame) -> Self {
        self.map(|v| frame.to_world(v))
    }

    /// Maps the vertices from world space into `frame`'s local space.
    pub fn to_local(&self, frame: &LocalFrame) -> Self {
        self.map(|v| frame.to_local(v))
    }

    /// Translates the triangle along its normal.
    pub fn offset(&self, distance: f32) -> Self {
        let offset = self.normal() * distance;
        self.map(|v| v + offset)
    }

    pub fn is_finite(&self) -> bool {
        self.vertices.iter().all(Vec3::is_finite)
    }

    fn map(&self, f: impl Fn(Vec3) -> Vec3) -> Self {
        let [a, b, c] = self.vertices;
        Self::new(f(a), f(b), f(c))
    }
}
