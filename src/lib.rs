//! Projected decal geometry on the CPU.
//!
//! A decal projector is a unit cube placed in the world. Triangles of the
//! models it overlaps are mapped into the cube's local space, clipped against
//! it, and re-triangulated into a small mesh that sits just above the
//! receiving surfaces.
//!
//! # Quick Start
//!
//! ```ignore
//! use decal_clip::prelude::*;
//!
//! let floor = Model::from_obj("floor", "floor.obj")?;
//! let mut projector = DecalProjector::default();
//! projector.transform.set_scale_uniform(2.0);
//! let bake = projector.bake(&[floor])?;
//! bake.mesh.write_obj(&mut std::io::stdout())?;
//! ```

pub mod clipper;
pub mod config;
pub mod decal_mesh;
pub mod error;
pub mod math;
pub mod mesh;
pub mod model;
pub mod primitives;
pub mod projector;
pub mod transform;
pub mod triangle;

// Re-export commonly needed types at crate root for convenience
pub use clipper::{BakeOutput, ClipEngine, ClipScratch};
pub use config::{ClipConfig, ConfigError, DecalConfig, OutputSpace};
pub use decal_mesh::DecalMesh;
pub use error::{Error, Result};
pub use mesh::{Face, LoadError, Mesh};
pub use model::Model;
pub use projector::{DecalBake, DecalProjector};
pub use transform::{LocalFrame, Transform};
pub use triangle::Triangle;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use decal_clip::prelude::*;
/// ```
pub mod prelude {
    // Clipping
    pub use crate::clipper::{BakeOutput, ClipEngine, ClipScratch};

    // Configuration
    pub use crate::config::{ClipConfig, DecalConfig, OutputSpace};

    // Scene
    pub use crate::mesh::Mesh;
    pub use crate::model::Model;
    pub use crate::projector::{DecalBake, DecalProjector};
    pub use crate::transform::{LocalFrame, Transform};

    // Geometry
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec3::Vec3;
    pub use crate::primitives::{Aabb, Edge, Plane, Ray};
    pub use crate::triangle::Triangle;

    // Output
    pub use crate::decal_mesh::DecalMesh;
}
