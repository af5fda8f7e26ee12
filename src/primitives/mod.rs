//! Geometric building blocks shared by the triangle and clipping code.
//!
//! Every equality-like test takes an explicit `tolerance` rather than reading
//! a global, so callers decide how forgiving the geometry is.

pub mod aabb;
pub mod edge;
pub mod plane;
pub mod ray;

pub use aabb::Aabb;
pub use edge::Edge;
pub use plane::Plane;
pub use ray::Ray;
