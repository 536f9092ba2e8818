//! CPU-side geometry: the scene's primitive shapes before GPU upload.
//!
//! [`RawGeometry`] is a plain vertex/index list. The scene keeps one per
//! shape in its geometry library and many nodes share it; the renderer
//! uploads each entry once (see [`MeshCache`](crate::MeshCache)).
//!
//! All primitives are centered on the origin and wound counter-clockwise
//! when seen from outside.
//!
//! ```
//! use vitrine::RawGeometry;
//!
//! let cube = RawGeometry::cuboid(1.0, 1.0, 1.0, 1, 1, 1);
//! assert_eq!(cube.vertices.len(), 24);
//! assert_eq!(cube.indices.len(), 36);
//! ```

use crate::mesh::Vertex3d;
use glam::Vec3;
use std::collections::BTreeSet;

/// Vertex and triangle index data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawGeometry {
    pub vertices: Vec<Vertex3d>,
    /// Triangle list, three indices per triangle.
    pub indices: Vec<u32>,
}

impl RawGeometry {
    pub fn new(vertices: Vec<Vertex3d>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// A box of the given size with `(ws, hs, ds)` grid segments along
    /// width, height and depth. Each face is its own vertex grid so normals
    /// stay flat.
    pub fn cuboid(width: f32, height: f32, depth: f32, ws: u32, hs: u32, ds: u32) -> Self {
        let (ws, hs, ds) = (ws.max(1), hs.max(1), ds.max(1));
        let h = Vec3::new(width, height, depth) * 0.5;
        let mut geometry = Self::default();

        // (origin corner, u edge, v edge, u segments, v segments); u x v is the face normal
        let faces = [
            (Vec3::new(h.x, -h.y, h.z), Vec3::NEG_Z * depth, Vec3::Y * height, ds, hs),
            (Vec3::new(-h.x, -h.y, -h.z), Vec3::Z * depth, Vec3::Y * height, ds, hs),
            (Vec3::new(-h.x, h.y, h.z), Vec3::X * width, Vec3::NEG_Z * depth, ws, ds),
            (Vec3::new(-h.x, -h.y, -h.z), Vec3::X * width, Vec3::Z * depth, ws, ds),
            (Vec3::new(-h.x, -h.y, h.z), Vec3::X * width, Vec3::Y * height, ws, hs),
            (Vec3::new(h.x, -h.y, -h.z), Vec3::NEG_X * width, Vec3::Y * height, ws, hs),
        ];

        for (origin, u, v, su, sv) in faces {
            geometry.push_grid(origin, u, v, su, sv);
        }
        geometry
    }

    /// A UV sphere with `segments` divisions around the equator and `rings`
    /// from pole to pole.
    pub fn sphere(radius: f32, segments: u32, rings: u32) -> Self {
        let (segments, rings) = (segments.max(3), rings.max(2));
        let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
        let mut indices = Vec::with_capacity((segments * rings * 6) as usize);

        for ring in 0..=rings {
            let phi = std::f32::consts::PI * ring as f32 / rings as f32;
            let (ring_radius, y) = phi.sin_cos();

            for seg in 0..=segments {
                let theta = std::f32::consts::TAU * seg as f32 / segments as f32;
                let normal = Vec3::new(ring_radius * theta.cos(), y, ring_radius * theta.sin());
                vertices.push(Vertex3d::new(
                    (normal * radius).into(),
                    normal.into(),
                    [seg as f32 / segments as f32, ring as f32 / rings as f32],
                ));
            }
        }

        for ring in 0..rings {
            for seg in 0..segments {
                let a = ring * (segments + 1) + seg;
                let b = a + 1;
                let c = a + segments + 1;
                let d = c + 1;
                indices.extend_from_slice(&[a, b, c, b, d, c]);
            }
        }

        Self::new(vertices, indices)
    }

    /// A flat-shaded regular tetrahedron with the given circumradius.
    pub fn tetrahedron(radius: f32) -> Self {
        let corners = [
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
        ]
        .map(|c| c.normalize() * radius);

        let mut geometry = Self::default();
        for [i, j, k] in [[2, 1, 0], [0, 3, 2], [1, 3, 0], [2, 3, 1]] {
            let (mut a, mut b, c) = (corners[i], corners[j], corners[k]);
            // Orient each face away from the center
            if (b - a).cross(c - a).dot(a + b + c) < 0.0 {
                std::mem::swap(&mut a, &mut b);
            }
            geometry.push_triangle(a, b, c);
        }
        geometry
    }

    /// Append a subdivided parallelogram spanned by `u` and `v` from
    /// `origin`, facing `u x v`.
    fn push_grid(&mut self, origin: Vec3, u: Vec3, v: Vec3, su: u32, sv: u32) {
        let normal: [f32; 3] = u.cross(v).normalize_or_zero().into();
        let base = self.vertices.len() as u32;

        for j in 0..=sv {
            for i in 0..=su {
                let (fu, fv) = (i as f32 / su as f32, j as f32 / sv as f32);
                let p = origin + u * fu + v * fv;
                self.vertices.push(Vertex3d::new(p.into(), normal, [fu, 1.0 - fv]));
            }
        }

        let row = su + 1;
        for j in 0..sv {
            for i in 0..su {
                let a = base + j * row + i;
                let b = a + 1;
                let c = a + row;
                let d = c + 1;
                self.indices.extend_from_slice(&[a, b, d, a, d, c]);
            }
        }
    }

    /// Append a flat-shaded triangle.
    pub(crate) fn push_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let normal: [f32; 3] = (b - a).cross(c - a).normalize_or_zero().into();
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&[
            Vertex3d::new(a.into(), normal, [0.0, 0.0]),
            Vertex3d::new(b.into(), normal, [1.0, 0.0]),
            Vertex3d::new(c.into(), normal, [0.5, 1.0]),
        ]);
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    /// Append a flat quad with corners in counter-clockwise order around
    /// `normal`.
    pub(crate) fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        let n: [f32; 3] = normal.into();
        let base = self.vertices.len() as u32;
        let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        for (corner, uv) in corners.into_iter().zip(uvs) {
            self.vertices.push(Vertex3d::new(corner.into(), n, uv));
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounding box as `(min, max)`.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.vertices.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), v| {
                let p = Vec3::from(v.position);
                (min.min(p), max.max(p))
            },
        )
    }

    pub fn center(&self) -> Vec3 {
        let (min, max) = self.bounds();
        (min + max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        let (min, max) = self.bounds();
        max - min
    }

    pub fn translate(&mut self, offset: Vec3) {
        for v in &mut self.vertices {
            v.position = (Vec3::from(v.position) + offset).into();
        }
    }

    /// Moves the bounding-box center to the origin.
    pub fn recenter(&mut self) {
        if self.vertices.is_empty() {
            return;
        }
        let center = self.center();
        self.translate(-center);
    }

    /// Unique triangle edges as a line list (pairs of vertex indices),
    /// sorted for stable output.
    pub fn edges(&self) -> Vec<u32> {
        let mut unique = BTreeSet::new();
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                unique.insert((a.min(b), a.max(b)));
            }
        }
        unique.into_iter().flat_map(|(a, b)| [a, b]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Every non-degenerate triangle faces away from the origin.
    fn assert_outward(geometry: &RawGeometry) {
        for tri in geometry.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]]
                .map(|i| Vec3::from(geometry.vertices[i as usize].position));
            let normal = (b - a).cross(c - a);
            if normal.length() < 1e-6 {
                continue;
            }
            assert!(normal.dot(a + b + c) > 0.0, "inward triangle {:?}", tri);
        }
    }

    #[test]
    fn cuboid_segment_counts() {
        let geometry = RawGeometry::cuboid(1.0, 1.0, 1.0, 1, 20, 45);
        // ±X: 46x21, ±Y: 2x46, ±Z: 2x21 vertex grids
        assert_eq!(geometry.vertices.len(), 2 * (46 * 21 + 2 * 46 + 2 * 21));
        assert_eq!(geometry.triangle_count(), 2 * 2 * (45 * 20 + 45 + 20));
        assert_outward(&geometry);
    }

    #[test]
    fn cuboid_bounds_match_size() {
        let geometry = RawGeometry::cuboid(2.0, 1.0, 4.0, 2, 2, 2);
        let (min, max) = geometry.bounds();
        assert_eq!(min, Vec3::new(-1.0, -0.5, -2.0));
        assert_eq!(max, Vec3::new(1.0, 0.5, 2.0));
    }

    #[test]
    fn sphere_vertices_on_radius() {
        let geometry = RawGeometry::sphere(0.5, 32, 16);
        assert_eq!(geometry.vertices.len(), 33 * 17);
        for v in &geometry.vertices {
            assert_relative_eq!(Vec3::from(v.position).length(), 0.5, epsilon = 1e-5);
        }
        assert_outward(&geometry);
    }

    #[test]
    fn tetrahedron_is_flat_and_outward() {
        let geometry = RawGeometry::tetrahedron(0.5);
        assert_eq!(geometry.vertices.len(), 12);
        assert_eq!(geometry.triangle_count(), 4);
        assert_outward(&geometry);
    }

    #[test]
    fn recenter_moves_bounds_to_origin() {
        let mut geometry = RawGeometry::cuboid(1.0, 1.0, 1.0, 1, 1, 1);
        geometry.translate(Vec3::new(3.0, -2.0, 7.0));
        geometry.recenter();
        let center = geometry.center();
        assert_relative_eq!(center.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(center.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(center.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn edges_are_unique() {
        let mut geometry = RawGeometry::default();
        geometry.push_quad(
            [Vec3::ZERO, Vec3::X, Vec3::X + Vec3::Y, Vec3::Y],
            Vec3::Z,
        );
        // four sides plus the shared diagonal
        assert_eq!(geometry.edges().len(), 5 * 2);
    }
}
