//! Clipping triangles against the unit cube.
//!
//! For each source triangle the engine collects the points of the triangle
//! that lie inside the cube:
//!
//! 1. triangle vertices inside the (tolerance-widened) cube,
//! 2. where triangle edges cross cube faces,
//! 3. where cube edges cross the triangle's face.
//!
//! Those points bound a convex polygon. They are sorted around the triangle
//! normal and fan-triangulated from their centroid, so a polygon with `k`
//! boundary points becomes `k` triangles with the source's orientation.

use log::{debug, warn};
use rayon::prelude::*;
use smallvec::SmallVec;

use super::radial::RadialOrder;
use super::unit_cube::ClipVolume;
use crate::config::ClipConfig;
use crate::error::{Error, Result};
use crate::math::vec3::Vec3;
use crate::primitives::{Edge, Plane, Ray};
use crate::triangle::Triangle;

/// Upper bound on intersection points for one source triangle: 3 vertices,
/// 3 triangle edges x 6 cube faces, 12 cube edges x 1 triangle plane.
pub const MAX_CLIP_POINTS: usize = 3 + 3 * 6 + 12;

/// Which region a candidate intersection point must fall in to be kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointTest {
    /// Triangle edge crossing a cube face: keep if inside the cube.
    UnitCube,
    /// Cube edge crossing the triangle plane: keep if inside the triangle.
    Triangle,
}

/// Reusable per-triangle working memory.
///
/// Owned by the caller so repeated bakes don't allocate. Contents are reset
/// at the start of every triangle and carry no meaning between calls.
#[derive(Debug, Clone)]
pub struct ClipScratch {
    points: Vec<Vec3>,
    fan: Vec<Triangle>,
}

impl Default for ClipScratch {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipScratch {
    pub fn new() -> Self {
        Self {
            points: Vec::with_capacity(MAX_CLIP_POINTS),
            fan: Vec::with_capacity(MAX_CLIP_POINTS),
        }
    }

    fn clear(&mut self) {
        self.points.clear();
        self.fan.clear();
    }

    /// Adds a point unless it is non-finite or within `tolerance` of a point
    /// already collected.
    fn add_point(&mut self, point: Vec3, tolerance: f32) {
        if !point.is_finite() {
            return;
        }
        if self.points.iter().any(|p| p.distance(point) < tolerance) {
            return;
        }
        self.points.push(point);
    }

    fn centroid(&self) -> Vec3 {
        let mut sum = Vec3::ZERO;
        for &p in &self.points {
            sum += p;
        }
        sum / self.points.len() as f32
    }
}

/// Triangles produced by one bake, plus whether the cap cut it short.
///
/// Reusable across bakes; every bake clears it first.
#[derive(Debug, Clone, Default)]
pub struct BakeOutput {
    triangles: Vec<Triangle>,
    truncated: bool,
}

impl BakeOutput {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
            truncated: false,
        }
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// True if at least one triangle was dropped because of the cap.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    pub fn clear(&mut self) {
        self.triangles.clear();
        self.truncated = false;
    }

    /// Appends a fan while respecting `cap`. Returns false once something
    /// had to be dropped.
    fn append_capped(&mut self, fan: &[Triangle], cap: usize) -> bool {
        let room = cap.saturating_sub(self.triangles.len());
        if fan.len() > room {
            self.triangles.extend_from_slice(&fan[..room]);
            self.truncated = true;
            return false;
        }
        self.triangles.extend_from_slice(fan);
        true
    }
}

/// Clips triangles in projector-local space against the unit cube.
#[derive(Debug, Clone)]
pub struct ClipEngine {
    volume: &'static ClipVolume,
    config: ClipConfig,
}

impl Default for ClipEngine {
    fn default() -> Self {
        Self::new(ClipConfig::default())
    }
}

impl ClipEngine {
    pub fn new(config: ClipConfig) -> Self {
        Self {
            volume: ClipVolume::unit(),
            config,
        }
    }

    /// Tolerant cube containment.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.volume.contains(point, self.config.error_tolerance)
    }

    /// Clips one triangle. The cap does not apply.
    pub fn clip_triangle(&self, triangle: &Triangle) -> Vec<Triangle> {
        let mut scratch = ClipScratch::new();
        self.clip_fan(triangle, &mut scratch).to_vec()
    }

    /// Clips one triangle using caller-owned scratch, appending the result to
    /// `out`. Returns the number of triangles appended. The cap does not
    /// apply.
    pub fn clip_triangle_into(
        &self,
        triangle: &Triangle,
        scratch: &mut ClipScratch,
        out: &mut Vec<Triangle>,
    ) -> usize {
        let fan = self.clip_fan(triangle, scratch);
        out.extend_from_slice(fan);
        fan.len()
    }

    /// Clips the first `count` triangles of `source`, in order, into
    /// `output`, stopping at `max_output_triangles`.
    ///
    /// Fails without touching `output` if `count` exceeds `source.len()`.
    pub fn bake(
        &self,
        source: &[Triangle],
        count: usize,
        scratch: &mut ClipScratch,
        output: &mut BakeOutput,
    ) -> Result<()> {
        let source = checked_prefix(source, count)?;
        output.clear();

        let cap = self.config.max_output_triangles;
        for triangle in source {
            let fan = self.clip_fan(triangle, scratch);
            if !output.append_capped(fan, cap) {
                break;
            }
        }

        self.report(source.len(), output);
        Ok(())
    }

    /// Same result as [`ClipEngine::bake`], with source triangles clipped on
    /// the rayon pool.
    ///
    /// Each worker owns its scratch. Fans are gathered per source index and
    /// then appended in input order, so the cap cuts at exactly the same
    /// triangle as the sequential bake. Work past the cap is wasted rather
    /// than skipped.
    pub fn bake_parallel(
        &self,
        source: &[Triangle],
        count: usize,
        output: &mut BakeOutput,
    ) -> Result<()> {
        let source = checked_prefix(source, count)?;
        output.clear();

        let fans: Vec<SmallVec<[Triangle; 8]>> = source
            .par_iter()
            .map_init(ClipScratch::new, |scratch, triangle| {
                SmallVec::from_slice(self.clip_fan(triangle, scratch))
            })
            .collect();

        let cap = self.config.max_output_triangles;
        for fan in &fans {
            if !output.append_capped(fan, cap) {
                break;
            }
        }

        self.report(source.len(), output);
        Ok(())
    }

    fn report(&self, source_count: usize, output: &BakeOutput) {
        debug!(
            "clipped {} source triangles into {} triangles",
            source_count,
            output.len()
        );
        if output.truncated() {
            warn!(
                "decal triangles exceed the maximum of {}; output truncated",
                self.config.max_output_triangles
            );
        }
    }

    /// Computes the clipped fan for one triangle into `scratch.fan`.
    fn clip_fan<'s>(&self, triangle: &Triangle, scratch: &'s mut ClipScratch) -> &'s [Triangle] {
        let tolerance = self.config.error_tolerance;
        scratch.clear();

        let mut inside = 0;
        for vertex in triangle.vertices() {
            if self.contains_point(vertex) {
                scratch.add_point(vertex, tolerance);
                inside += 1;
            }
        }

        // Entirely inside: pass through untouched.
        if inside == 3 {
            scratch.fan.push(*triangle);
            return &scratch.fan;
        }

        self.clip_edges_to_planes(
            triangle,
            triangle.edges(),
            self.volume.planes(),
            PointTest::UnitCube,
            scratch,
        );
        self.clip_edges_to_planes(
            triangle,
            self.volume.edges(),
            std::slice::from_ref(triangle.plane()),
            PointTest::Triangle,
            scratch,
        );

        // Fewer than 3 distinct points is a point or segment of contact.
        if scratch.points.len() < 3 {
            return &scratch.fan;
        }

        let middle = scratch.centroid();
        RadialOrder::starting_at(scratch.points[0], middle, triangle.normal())
            .sort(&mut scratch.points);

        let count = scratch.points.len();
        for i in 0..count {
            let fan_triangle =
                Triangle::new(middle, scratch.points[i], scratch.points[(i + 1) % count]);
            if fan_triangle.is_finite() {
                scratch.fan.push(fan_triangle);
            }
        }
        &scratch.fan
    }

    /// Intersects every edge with every plane and keeps the hits that lie on
    /// the edge and pass `test`.
    fn clip_edges_to_planes(
        &self,
        triangle: &Triangle,
        edges: &[Edge],
        planes: &[Plane],
        test: PointTest,
        scratch: &mut ClipScratch,
    ) {
        let tolerance = self.config.error_tolerance;
        for edge in edges {
            let ray = Ray::between(edge.vertex0(), edge.vertex1());
            for plane in planes {
                let Some(dist) = plane.raycast(&ray, tolerance) else {
                    continue;
                };

                let point = ray.point_at(dist);
                if !edge.contains(point, tolerance) {
                    continue;
                }

                let keep = match test {
                    PointTest::UnitCube => self.volume.contains(point, tolerance),
                    PointTest::Triangle => triangle.contains(point, tolerance),
                };
                if keep {
                    scratch.add_point(point, tolerance);
                }
            }
        }
    }
}

fn checked_prefix(source: &[Triangle], count: usize) -> Result<&[Triangle]> {
    source.get(..count).ok_or(Error::InvalidInput {
        count,
        len: source.len(),
    })
}
