//! Clipping triangles against the projector volume.
//!
//! - [`unit_cube`]: the fixed clip volume (vertices, edges, face planes).
//! - [`radial`]: signed angles and rotational ordering of coplanar points.
//! - [`engine`]: per-triangle clipping, fan triangulation, and capped
//!   batch bakes.

pub mod engine;
pub mod radial;
pub mod unit_cube;

pub use engine::{BakeOutput, ClipEngine, ClipScratch, PointTest, MAX_CLIP_POINTS};
pub use radial::{signed_angle, RadialOrder};
pub use unit_cube::{tolerant, ClipVolume, CUBE_VERTICES, HALF_EXTENT};
