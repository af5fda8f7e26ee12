//! Renderable mesh built from clipped decal triangles.

use std::io::Write;

use crate::config::MAX_OUTPUT_TRIANGLES_LIMIT;
use crate::error::Result;
use crate::math::vec3::Vec3;
use crate::transform::LocalFrame;
use crate::triangle::Triangle;

pub use crate::config::OutputSpace;

/// Flat-shaded triangle soup: every triangle owns its three vertices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecalMesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    uvs: Vec<[f32; 2]>,
    indices: Vec<u32>,
}

impl DecalMesh {
    /// Builds the mesh from triangles in projector-local space.
    ///
    /// Each triangle is pushed `displacement` along its normal. Texture
    /// coordinates come from the local x/z position, so the projector's cube
    /// maps onto `[0, 1]^2`. Triangles past
    /// [`MAX_OUTPUT_TRIANGLES_LIMIT`] are ignored so every index fits `u32`.
    pub fn build(
        triangles: &[Triangle],
        displacement: f32,
        space: OutputSpace,
        frame: &LocalFrame,
    ) -> Self {
        let triangles = &triangles[..triangles.len().min(MAX_OUTPUT_TRIANGLES_LIMIT)];
        let mut mesh = Self::with_capacity(triangles.len());
        for triangle in triangles {
            let local = triangle.offset(displacement);
            let placed = match space {
                OutputSpace::ProjectorLocal => local,
                OutputSpace::World => local.to_world(frame),
            };
            let normal = placed.normal();
            for (position, uv_source) in placed.vertices().into_iter().zip(local.vertices()) {
                mesh.indices.push(mesh.positions.len() as u32);
                mesh.positions.push(position);
                mesh.normals.push(normal);
                mesh.uvs.push(decal_uv(uv_source));
            }
        }
        mesh
    }

    fn with_capacity(triangles: usize) -> Self {
        let vertices = triangles * 3;
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            uvs: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(vertices),
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn uvs(&self) -> &[[f32; 2]] {
        &self.uvs
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Writes the mesh as Wavefront OBJ.
    pub fn write_obj(&self, writer: &mut impl Write) -> Result<()> {
        writeln!(writer, "o decal")?;
        for p in &self.positions {
            writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
        }
        for [u, v] in &self.uvs {
            writeln!(writer, "vt {} {}", u, v)?;
        }
        for n in &self.normals {
            writeln!(writer, "vn {} {} {}", n.x, n.y, n.z)?;
        }
        for face in self.indices.chunks_exact(3) {
            // OBJ indices are one-based.
            let (a, b, c) = (face[0] + 1, face[1] + 1, face[2] + 1);
            writeln!(writer, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn decal_uv(local: Vec3) -> [f32; 2] {
    [local.x + 0.5, local.z + 0.5]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Transform;
    use approx::assert_relative_eq;

    fn floor_triangle() -> Triangle {
        Triangle::new(
            Vec3::new(-0.5, 0.0, -0.5),
            Vec3::new(0.5, 0.0, 0.5),
            Vec3::new(0.5, 0.0, -0.5),
        )
    }

    #[test]
    fn uvs_span_the_projector_footprint() {
        let mesh = DecalMesh::build(
            &[floor_triangle()],
            0.0,
            OutputSpace::ProjectorLocal,
            &LocalFrame::identity(),
        );
        assert_eq!(mesh.uvs(), &[[0.0, 0.0], [1.0, 1.0], [1.0, 0.0]]);
        assert_eq!(mesh.indices(), &[0, 1, 2]);
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn displacement_follows_the_normal() {
        let t = floor_triangle();
        let mesh = DecalMesh::build(&[t], 0.01, OutputSpace::ProjectorLocal, &LocalFrame::identity());
        for (p, n) in mesh.positions().iter().zip(mesh.normals()) {
            assert_relative_eq!(p.y, 0.01, epsilon = 1e-6);
            assert_eq!(*n, t.normal());
        }
    }

    #[test]
    fn world_space_output_uses_the_frame() {
        let mut transform = Transform::new();
        transform.set_position_xyz(0.0, 5.0, 0.0).set_scale_uniform(4.0);
        let mesh = DecalMesh::build(
            &[floor_triangle()],
            0.0,
            OutputSpace::World,
            &transform.local_frame(),
        );
        assert_relative_eq!(mesh.positions()[1].x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(mesh.positions()[1].y, 5.0, epsilon = 1e-5);
        // Texture coordinates still come from projector space.
        assert_eq!(mesh.uvs()[1], [1.0, 1.0]);
    }

    #[test]
    fn writes_obj_faces() {
        let mesh = DecalMesh::build(
            &[floor_triangle(), floor_triangle()],
            0.0,
            OutputSpace::ProjectorLocal,
            &LocalFrame::identity(),
        );
        let mut buffer = Vec::new();
        mesh.write_obj(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 6);
        assert!(text.contains("f 4/4/4 5/5/5 6/6/6"));
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_is_an_io_error() {
        let mesh = DecalMesh::build(
            &[floor_triangle()],
            0.0,
            OutputSpace::ProjectorLocal,
            &LocalFrame::identity(),
        );
        let err = mesh.write_obj(&mut FailingWriter).unwrap_err();
        assert!(matches!(err, crate::error::Error::Io(_)));
    }

    #[test]
    fn empty_input_gives_empty_mesh() {
        let mesh = DecalMesh::build(&[], 0.1, OutputSpace::World, &LocalFrame::identity());
        assert!(mesh.is_empty());
    }
}
