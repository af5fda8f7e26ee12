use crate::math::vec3::Vec3;

/// A line segment between two vertices.
///
/// The length is computed once at construction; edges are never mutated, so
/// it always agrees with the vertices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    vertex0: Vec3,
    vertex1: Vec3,
    length: f32,
}

impl Edge {
    pub fn new(vertex0: Vec3, vertex1: Vec3) -> Self {
        Self {
            vertex0,
            vertex1,
            length: (vertex0 - vertex1).magnitude(),
        }
    }

    pub fn vertex0(&self) -> Vec3 {
        self.vertex0
    }

    pub fn vertex1(&self) -> Vec3 {
        self.vertex1
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    /// Vector from `vertex0` to `vertex1`.
    pub fn vector(&self) -> Vec3 {
        self.vertex1 - self.vertex0
    }

    /// Returns true if `point` lies on the segment.
    ///
    /// Uses the sum-of-distances test: the distances from the point to both
    /// endpoints must add up to the segment length within `tolerance`. Points
    /// slightly past an endpoint are therefore accepted.
    pub fn contains(&self, point: Vec3, tolerance: f32) -> bool {
        let test_length = self.vertex0.distance(point) + self.vertex1.distance(point);
        (self.length - test_length).abs() < tolerance
    }
}
