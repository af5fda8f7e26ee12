//! Scene objects that can receive decals.
//!
//! A [`Model`] is a collection of [`Mesh`] instances sharing one world
//! transform and one layer. Projectors filter models by layer and by world
//! bounds before clipping any of their triangles.

use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;
use crate::mesh::Mesh;
use crate::primitives::Aabb;
use crate::transform::Transform;
use crate::triangle::Triangle;

/// A 3D model containing one or more meshes.
///
/// Models are loaded from OBJ files and can contain multiple named meshes.
/// All meshes are placed in the world by the model's transform.
#[derive(Clone, Debug)]
pub struct Model {
    name: String,
    meshes: Vec<Mesh>,
    mesh_names: HashMap<String, usize>,
    transform: Transform,
    layer: u32,
}

impl Model {
    /// Create a new empty model with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            meshes: Vec::new(),
            mesh_names: HashMap::new(),
            transform: Transform::default(),
            layer: 0,
        }
    }

    /// Create a model holding a single mesh.
    pub fn from_mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        let mut model = Self::new(name);
        model.add_mesh(mesh);
        model
    }

    /// Load a model from an OBJ file.
    ///
    /// All objects/groups in the OBJ file become separate meshes within this model.
    pub fn from_obj(name: impl Into<String>, file_path: impl AsRef<Path>) -> Result<Self> {
        let meshes = Mesh::load_all_from_obj(file_path)?;
        let mesh_names: HashMap<String, usize> = meshes
            .iter()
            .enumerate()
            .map(|(i, m)| (m.name().to_string(), i))
            .collect();

        Ok(Self {
            name: name.into(),
            meshes,
            mesh_names,
            transform: Transform::default(),
            layer: 0,
        })
    }

    /// Get the model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    // ============ Transform Accessors ============

    /// Get a mutable reference to the model's world transform.
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    // ============ Mesh Access ============

    /// Get a mesh by name.
    pub fn mesh(&self, name: &str) -> Option<&Mesh> {
        self.mesh_names.get(name).map(|&i| &self.meshes[i])
    }

    /// Get the number of meshes in this model.
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Add a mesh to this model.
    pub fn add_mesh(&mut self, mesh: Mesh) {
        let name = mesh.name().to_string();
        let index = self.meshes.len();
        self.meshes.push(mesh);
        self.mesh_names.insert(name, index);
    }

    // ============ Layer ============

    pub fn layer(&self) -> u32 {
        self.layer
    }

    /// Set the layer. Layers from [`LAYER_COUNT`](crate::config::LAYER_COUNT) up are stored as given and
    /// match no layer mask.
    pub fn set_layer(&mut self, layer: u32) -> &mut Self {
        self.layer = layer;
        self
    }

    // ============ Geometry ============

    /// Total number of triangles across all meshes.
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::triangle_count).sum()
    }

    /// Every triangle of every mesh, in world space.
    pub fn world_triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        let frame = self.transform.local_frame();
        self.meshes
            .iter()
            .flat_map(|mesh| mesh.triangles())
            .map(move |t| t.to_world(&frame))
    }

    /// World-space bounds of all vertices, or `None` if there are none.
    pub fn world_bounds(&self) -> Option<Aabb> {
        let frame = self.transform.local_frame();
        Aabb::from_points(
            self.meshes
                .iter()
                .flat_map(|mesh| mesh.vertices().iter())
                .map(|&v| frame.to_world(v)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LAYER_COUNT;
    use crate::math::vec3::Vec3;
    use approx::assert_relative_eq;

    #[test]
    fn meshes_are_found_by_name() {
        let mut model = Model::new("props");
        model.add_mesh(Mesh::cube("crate", 0.5));
        model.add_mesh(Mesh::quad("floor", 1.0));
        assert_eq!(model.mesh_count(), 2);
        assert_eq!(model.mesh("floor").unwrap().triangle_count(), 2);
        assert!(model.mesh("missing").is_none());
        assert_eq!(model.triangle_count(), 14);
    }

    #[test]
    fn world_bounds_follow_transform() {
        let mut model = Model::from_mesh("crate", Mesh::cube("crate", 1.0));
        model
            .transform_mut()
            .set_position_xyz(10.0, 0.0, 0.0)
            .set_scale_uniform(2.0);
        let bounds = model.world_bounds().unwrap();
        assert_relative_eq!(bounds.min.x, 8.0, epsilon = 1e-5);
        assert_relative_eq!(bounds.max.x, 12.0, epsilon = 1e-5);
        assert_relative_eq!(bounds.max.y, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn world_triangles_are_transformed() {
        let mut model = Model::from_mesh("floor", Mesh::quad("floor", 1.0));
        model.transform_mut().set_position(Vec3::new(0.0, 3.0, 0.0));
        assert!(model
            .world_triangles()
            .all(|t| t.vertices().iter().all(|v| (v.y - 3.0).abs() < 1e-6)));
    }

    #[test]
    fn missing_obj_is_a_load_error() {
        let err = Model::from_obj("missing", "does/not/exist.obj").unwrap_err();
        assert!(matches!(err, crate::error::Error::Load(_)));
    }

    #[test]
    fn out_of_range_layer_is_kept_as_given() {
        let mut model = Model::new("empty");
        model.set_layer(LAYER_COUNT + 67);
        assert_eq!(model.layer(), 99);
        assert!(model.world_bounds().is_none());
    }
}
