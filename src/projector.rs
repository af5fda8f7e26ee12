//! Decal projectors: gathering scene triangles and baking them into a mesh.
//!
//! A projector is a unit cube placed in the world by its [`Transform`].
//! Baking collects the triangles of every model the cube can touch, maps them
//! into the cube's local space, clips them, and builds a [`DecalMesh`].

use log::{debug, info, warn};

use crate::clipper::{BakeOutput, ClipEngine, ClipScratch, CUBE_VERTICES, MAX_CLIP_POINTS};
use crate::config::DecalConfig;
use crate::decal_mesh::DecalMesh;
use crate::error::Result;
use crate::model::Model;
use crate::primitives::Aabb;
use crate::transform::{LocalFrame, Transform};
use crate::triangle::Triangle;

/// Pose differences below this do not trigger a rebake.
const POSE_EPSILON: f32 = 1e-4;

/// Result of [`DecalProjector::bake`].
#[derive(Clone, Debug, Default)]
pub struct DecalBake {
    pub mesh: DecalMesh,
    /// Source triangles that reached the clipper.
    pub gathered: usize,
    /// Triangles in `mesh`.
    pub emitted: usize,
    /// True if the output cap dropped at least one triangle.
    pub truncated: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DecalProjector {
    pub transform: Transform,
    pub config: DecalConfig,
}

impl DecalProjector {
    pub fn new(transform: Transform, config: DecalConfig) -> Self {
        Self { transform, config }
    }

    pub fn frame(&self) -> LocalFrame {
        self.transform.local_frame()
    }

    /// World-space bounds of the projector cube.
    pub fn world_bounds(&self) -> Aabb {
        let frame = self.frame();
        let [first, rest @ ..] = CUBE_VERTICES.map(|v| frame.to_world(v));
        rest.iter()
            .fold(Aabb::new(first, first), |b, &p| Aabb::new(b.min.min(p), b.max.max(p)))
    }

    /// True if the projector could affect `model` at all.
    pub fn affects(&self, model: &Model) -> bool {
        if !self.config.accepts_layer(model.layer()) || model.triangle_count() == 0 {
            return false;
        }
        model
            .world_bounds()
            .is_some_and(|bounds| bounds.intersects(&self.world_bounds()))
    }

    /// Collects the triangles of affected models into `out`, in projector
    /// space, replacing its contents. Returns the number collected.
    ///
    /// Stops at `max_source_triangles`.
    pub fn gather(&self, models: &[Model], out: &mut Vec<Triangle>) -> usize {
        out.clear();
        let frame = self.frame();
        let limit = self.config.max_source_triangles;

        for model in models.iter().filter(|m| self.affects(m)) {
            for triangle in model.world_triangles() {
                if out.len() == limit {
                    warn!(
                        "source triangles exceed the maximum of {}; skipping the rest, starting in model '{}'",
                        limit,
                        model.name()
                    );
                    return out.len();
                }
                out.push(triangle.to_local(&frame));
            }
            debug!("gathered model '{}' ({} triangles so far)", model.name(), out.len());
        }
        out.len()
    }

    /// Gathers, clips, and builds the decal mesh.
    pub fn bake(&self, models: &[Model]) -> Result<DecalBake> {
        self.config.validate()?;

        let mut source = Vec::new();
        let gathered = self.gather(models, &mut source);

        let engine = ClipEngine::new(self.config.clip);
        let capacity = gathered.saturating_mul(MAX_CLIP_POINTS);
        let mut output = BakeOutput::with_capacity(capacity.min(self.config.clip.max_output_triangles));
        if self.config.clip.parallel {
            engine.bake_parallel(&source, gathered, &mut output)?;
        } else {
            engine.bake(&source, gathered, &mut ClipScratch::new(), &mut output)?;
        }

        let mesh = DecalMesh::build(
            output.triangles(),
            self.config.displacement,
            self.config.output_space,
            &self.frame(),
        );
        info!(
            "baked decal: {} source triangles, {} emitted{}",
            gathered,
            mesh.triangle_count(),
            if output.truncated() { " (truncated)" } else { "" }
        );

        Ok(DecalBake {
            emitted: mesh.triangle_count(),
            truncated: output.truncated(),
            gathered,
            mesh,
        })
    }

    /// True if a bake made with `previous` is out of date.
    pub fn needs_rebake(&self, previous: &DecalProjector) -> bool {
        !self.transform.approx_eq(&previous.transform, POSE_EPSILON) || self.config != previous.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec3::Vec3;
    use crate::mesh::Mesh;
    use crate::triangle::triangle_area;
    use approx::assert_relative_eq;

    fn floor() -> Model {
        Model::from_mesh("floor", Mesh::quad("floor", 2.0))
    }

    fn mesh_area(mesh: &DecalMesh) -> f32 {
        mesh.indices()
            .chunks_exact(3)
            .map(|f| {
                let p = mesh.positions();
                triangle_area(p[f[0] as usize], p[f[1] as usize], p[f[2] as usize])
            })
            .sum()
    }

    #[test]
    fn bakes_the_floor_under_the_projector() {
        let bake = DecalProjector::default().bake(&[floor()]).unwrap();
        assert_eq!(bake.gathered, 2);
        assert!(bake.emitted > 0);
        assert!(!bake.truncated);
        // The cube's cross-section at y = 0 is a unit square.
        assert_relative_eq!(mesh_area(&bake.mesh), 1.0, epsilon = 1e-3);
        assert!(bake.mesh.uvs().iter().flatten().all(|c| (-0.01..=1.01).contains(c)));
    }

    #[test]
    fn parallel_bake_matches_sequential() {
        let mut projector = DecalProjector::default();
        projector.transform.set_rotation_xyz(0.3, 0.7, 0.1).set_scale_uniform(1.5);
        let models = [floor(), Model::from_mesh("crate", Mesh::cube("crate", 0.4))];
        let sequential = projector.bake(&models).unwrap();
        projector.config.clip.parallel = true;
        let parallel = projector.bake(&models).unwrap();
        assert_eq!(sequential.mesh, parallel.mesh);
    }

    #[test]
    fn world_bounds_cover_the_scaled_cube() {
        let mut projector = DecalProjector::default();
        projector.transform.set_position_xyz(1.0, 2.0, 3.0).set_scale_uniform(2.0);
        let bounds = projector.world_bounds();
        assert_relative_eq!(bounds.min.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(bounds.max.z, 4.0, epsilon = 1e-5);
    }

    #[test]
    fn skips_models_on_masked_layers() {
        let mut model = floor();
        model.set_layer(3);
        let mut projector = DecalProjector::default();
        projector.config.layer_mask = 0b1;
        let mut source = Vec::new();
        assert_eq!(projector.gather(&[model.clone()], &mut source), 0);

        projector.config.layer_mask = 0b1000;
        assert_eq!(projector.gather(&[model], &mut source), 2);
    }

    #[test]
    fn out_of_range_layer_matches_no_mask() {
        let mut model = floor();
        model.set_layer(99);
        let bake = DecalProjector::default().bake(&[model]).unwrap();
        assert_eq!(bake.gathered, 0);
        assert!(bake.mesh.is_empty());
    }

    #[test]
    fn skips_models_out_of_reach() {
        let mut model = floor();
        model.transform_mut().set_position(Vec3::new(0.0, 10.0, 0.0));
        let bake = DecalProjector::default().bake(&[model]).unwrap();
        assert_eq!(bake.gathered, 0);
        assert!(bake.mesh.is_empty());
    }

    #[test]
    fn gather_stops_at_source_limit() {
        let mut projector = DecalProjector::default();
        projector.config.max_source_triangles = 3;
        let models = [floor(), floor()];
        let mut source = vec![Triangle::new(Vec3::ZERO, Vec3::UP, Vec3::RIGHT)];
        assert_eq!(projector.gather(&models, &mut source), 3);
        assert_eq!(source.len(), 3);
    }

    #[test]
    fn gathered_triangles_are_in_projector_space() {
        let mut projector = DecalProjector::default();
        projector.transform.set_position_xyz(0.0, 0.25, 0.0);
        let mut source = Vec::new();
        projector.gather(&[floor()], &mut source);
        assert!(source
            .iter()
            .flat_map(|t| t.vertices())
            .all(|v| (v.y + 0.25).abs() < 1e-6));
    }

    #[test]
    fn output_cap_marks_truncation() {
        let mut projector = DecalProjector::default();
        projector.config.clip.max_output_triangles = 2;
        let bake = projector.bake(&[floor()]).unwrap();
        assert_eq!(bake.emitted, 2);
        assert!(bake.truncated);
    }

    #[test]
    fn rebake_only_on_change() {
        let previous = DecalProjector::default();
        let mut current = previous;
        assert!(!current.needs_rebake(&previous));
        current.transform.set_position_xyz(1e-6, 0.0, 0.0);
        assert!(!current.needs_rebake(&previous));
        current.transform.set_rotation_xyz(0.0, 0.1, 0.0);
        assert!(current.needs_rebake(&previous));

        let mut reconfigured = previous;
        reconfigured.config.displacement = 0.01;
        assert!(reconfigured.needs_rebake(&previous));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut projector = DecalProjector::default();
        projector.config.clip.error_tolerance = -1.0;
        assert!(projector.bake(&[floor()]).is_err());
    }
}
