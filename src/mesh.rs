//! Indexed triangle meshes that decals are projected onto.

use std::io::BufRead;
use std::path::Path;

use thiserror::Error;

use crate::math::vec3::Vec3;
use crate::primitives::Aabb;
use crate::triangle::Triangle;

/// A triangle as three zero-based indices into a mesh's vertex list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    pub a: u32,
    pub b: u32,
    pub c: u32,
}

impl Face {
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self { a, b, c }
    }
}

/// Errors from building or loading a mesh.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to load OBJ: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("OBJ contains no meshes: {0}")]
    Empty(String),

    #[error("face {face} references vertex {index}, but the mesh has {count} vertices")]
    IndexOutOfRange { face: usize, index: u32, count: usize },
}

// Unit cube, counter-clockwise when seen from outside.
const CUBE_VERTICES: [Vec3; 8] = [
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
];

const CUBE_FACES: [Face; 12] = [
    // Back (-z)
    Face::new(0, 2, 1),
    Face::new(0, 3, 2),
    // Front (+z)
    Face::new(4, 5, 6),
    Face::new(4, 6, 7),
    // Left (-x)
    Face::new(0, 4, 7),
    Face::new(0, 7, 3),
    // Right (+x)
    Face::new(1, 2, 6),
    Face::new(1, 6, 5),
    // Bottom (-y)
    Face::new(0, 1, 5),
    Face::new(0, 5, 4),
    // Top (+y)
    Face::new(3, 7, 6),
    Face::new(3, 6, 2),
];

#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    name: String,
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
}

impl Mesh {
    /// Creates a mesh, checking that every face index is in range.
    pub fn new(
        name: impl Into<String>,
        vertices: Vec<Vec3>,
        faces: Vec<Face>,
    ) -> Result<Self, LoadError> {
        let count = vertices.len();
        for (i, face) in faces.iter().enumerate() {
            if let Some(&index) = [face.a, face.b, face.c]
                .iter()
                .find(|&&index| index as usize >= count)
            {
                return Err(LoadError::IndexOutOfRange {
                    face: i,
                    index,
                    count,
                });
            }
        }

        Ok(Self {
            name: name.into(),
            vertices,
            faces,
        })
    }

    /// An axis-aligned cube with the given half extent, centred at the origin.
    pub fn cube(name: impl Into<String>, half_extent: f32) -> Self {
        Self {
            name: name.into(),
            vertices: CUBE_VERTICES.iter().map(|&v| v * half_extent).collect(),
            faces: CUBE_FACES.to_vec(),
        }
    }

    /// A flat square in the XZ plane facing +y, with the given half extent.
    pub fn quad(name: impl Into<String>, half_extent: f32) -> Self {
        let h = half_extent;
        Self {
            name: name.into(),
            vertices: vec![
                Vec3::new(-h, 0.0, -h),
                Vec3::new(h, 0.0, -h),
                Vec3::new(h, 0.0, h),
                Vec3::new(-h, 0.0, h),
            ],
            faces: vec![Face::new(0, 2, 1), Face::new(0, 3, 2)],
        }
    }

    /// Load the first mesh of an OBJ file.
    pub fn from_obj(file_path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = file_path.as_ref();
        Self::load_all_from_obj(path)?
            .into_iter()
            .next()
            .ok_or_else(|| LoadError::Empty(path.display().to_string()))
    }

    /// Load every object/group of an OBJ file as a separate mesh.
    pub fn load_all_from_obj(file_path: impl AsRef<Path>) -> Result<Vec<Self>, LoadError> {
        let (models, _materials) = tobj::load_obj(file_path.as_ref(), &Self::load_options())?;
        models.into_iter().map(Self::from_tobj).collect()
    }

    /// Load every object/group from OBJ text. Material libraries are ignored.
    pub fn load_all_from_obj_reader(reader: &mut impl BufRead) -> Result<Vec<Self>, LoadError> {
        let (models, _materials) = tobj::load_obj_buf(reader, &Self::load_options(), |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })?;
        models.into_iter().map(Self::from_tobj).collect()
    }

    fn load_options() -> tobj::LoadOptions {
        tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        }
    }

    fn from_tobj(model: tobj::Model) -> Result<Self, LoadError> {
        let vertices = model
            .mesh
            .positions
            .chunks_exact(3)
            .map(|p| Vec3::new(p[0], p[1], p[2]))
            .collect();
        let faces = model
            .mesh
            .indices
            .chunks_exact(3)
            .map(|f| Face::new(f[0], f[1], f[2]))
            .collect();
        Self::new(model.name, vertices, faces)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    /// Triangles in mesh-local space.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.faces.iter().map(move |face| {
            Triangle::new(
                self.vertices[face.a as usize],
                self.vertices[face.b as usize],
                self.vertices[face.c as usize],
            )
        })
    }

    /// Local-space bounds, or `None` for a mesh without vertices.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const OBJ_TEXT: &str = "\
o plate
v -1 0 -1
v 1 0 -1
v 1 0 1
v -1 0 1
f 1 3 2
f 1 4 3
o wedge
v 0 0 0
v 1 0 0
v 0 1 0
f 5 6 7
";

    #[test]
    fn cube_faces_point_outward() {
        let cube = Mesh::cube("cube", 1.0);
        assert_eq!(cube.triangle_count(), 12);
        for t in cube.triangles() {
            assert!(t.normal().dot(t.centroid()) > 0.0);
        }
    }

    #[test]
    fn quad_faces_up() {
        let quad = Mesh::quad("floor", 2.0);
        let total: f32 = quad.triangles().map(|t| t.area()).sum();
        assert_relative_eq!(total, 16.0);
        assert!(quad.triangles().all(|t| t.normal() == Vec3::UP));
    }

    #[test]
    fn new_rejects_out_of_range_faces() {
        let err = Mesh::new("bad", vec![Vec3::ZERO; 3], vec![Face::new(0, 1, 3)]).unwrap_err();
        assert!(matches!(err, LoadError::IndexOutOfRange { index: 3, .. }));
    }

    #[test]
    fn loads_objects_from_obj_text() {
        let meshes = Mesh::load_all_from_obj_reader(&mut OBJ_TEXT.as_bytes()).unwrap();
        assert_eq!(meshes.len(), 2);
        assert_eq!(meshes[0].name(), "plate");
        assert_eq!(meshes[0].triangle_count(), 2);
        assert_eq!(meshes[1].vertices().len(), 3);
        let bounds = meshes[0].bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(-1.0, 0.0, -1.0));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Mesh::from_obj("does/not/exist.obj").is_err());
    }
}
