//! The canonical clip volume: a unit cube centred on the origin.
//!
//! ```text
//!   0---------1
//!   |\        |\
//!   | 2---------3
//!   | |       | |
//!   4-|-------5 |
//!    \|        \|
//!     6---------7
//! ```
//!
//! Top face (y = +0.5) is 0-1-3-2, bottom face (y = -0.5) is 4-5-7-6.

use std::sync::OnceLock;

use crate::math::vec3::Vec3;
use crate::primitives::{Edge, Plane};

pub const HALF_EXTENT: f32 = 0.5;

pub const CUBE_VERTICES: [Vec3; 8] = [
    Vec3::new(-HALF_EXTENT, HALF_EXTENT, -HALF_EXTENT),
    Vec3::new(HALF_EXTENT, HALF_EXTENT, -HALF_EXTENT),
    Vec3::new(-HALF_EXTENT, HALF_EXTENT, HALF_EXTENT),
    Vec3::new(HALF_EXTENT, HALF_EXTENT, HALF_EXTENT),
    Vec3::new(-HALF_EXTENT, -HALF_EXTENT, -HALF_EXTENT),
    Vec3::new(HALF_EXTENT, -HALF_EXTENT, -HALF_EXTENT),
    Vec3::new(-HALF_EXTENT, -HALF_EXTENT, HALF_EXTENT),
    Vec3::new(HALF_EXTENT, -HALF_EXTENT, HALF_EXTENT),
];

/// Vertex index pairs for the 12 edges: top ring, bottom ring, verticals.
const CUBE_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 3),
    (3, 2),
    (2, 0),
    (4, 5),
    (5, 7),
    (7, 6),
    (6, 4),
    (0, 4),
    (1, 5),
    (3, 7),
    (2, 6),
];

/// Vertex index triples for the 6 faces, wound so normals face outward.
const CUBE_FACES: [(usize, usize, usize); 6] = [
    (0, 3, 1), // +y
    (0, 6, 2), // -x
    (0, 1, 5), // -z
    (1, 3, 7), // +x
    (4, 5, 7), // -y
    (2, 6, 3), // +z
];

/// Read-only geometry of the unit cube.
#[derive(Debug, Clone)]
pub struct ClipVolume {
    vertices: [Vec3; 8],
    edges: [Edge; 12],
    planes: [Plane; 6],
}

static UNIT_CUBE: OnceLock<ClipVolume> = OnceLock::new();

impl ClipVolume {
    /// The process-wide unit cube, built on first use.
    pub fn unit() -> &'static ClipVolume {
        UNIT_CUBE.get_or_init(Self::build)
    }

    fn build() -> Self {
        let v = CUBE_VERTICES;
        Self {
            vertices: v,
            edges: CUBE_EDGES.map(|(a, b)| Edge::new(v[a], v[b])),
            planes: CUBE_FACES.map(|(a, b, c)| Plane::from_points(v[a], v[b], v[c])),
        }
    }

    pub fn vertices(&self) -> &[Vec3; 8] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge; 12] {
        &self.edges
    }

    pub fn planes(&self) -> &[Plane; 6] {
        &self.planes
    }

    /// Returns true if `point` is inside the cube, widened by `tolerance`.
    pub fn contains(&self, point: Vec3, tolerance: f32) -> bool {
        let lo = tolerant(-HALF_EXTENT, tolerance);
        let hi = tolerant(HALF_EXTENT, tolerance);
        let within = |v: f32| v >= lo && v <= hi;
        within(point.x) && within(point.y) && within(point.z)
    }
}

/// Moves a bound away from zero by `tolerance`, widening the accepted range.
pub fn tolerant(bound: f32, tolerance: f32) -> f32 {
    if bound > 0.0 {
        bound + tolerance
    } else {
        bound - tolerance
    }
}
