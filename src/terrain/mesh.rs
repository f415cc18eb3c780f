//! Terrain patch mesh: heights grid, vertex emission, triangulation.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rayon::prelude::*;

use super::heightfield::HeightField;
use crate::params::TerrainParams;

/// Vertex data for the terrain mesh (position + normal + UV coordinates).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Terrain patch mesh rebuilt in place on every regeneration.
///
/// The index buffer encodes topology only: it depends on the grid resolution
/// alone and is generated once. Rebuilds resample the height field and
/// rewrite the vertex array; neither buffer is ever partially visible to the
/// renderer.
pub struct TerrainMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    /// Row-major N×N elevation scratch, pooled across rebuilds so neighbor
    /// lookups during normal computation never resample the field.
    heights: Vec<f32>,
}

impl TerrainMesh {
    /// Build the initial mesh for the given parameters.
    pub fn new(params: &TerrainParams, field: &HeightField) -> Self {
        let mut mesh = Self {
            vertices: Vec::new(),
            indices: build_indices(params.grid_n),
            heights: Vec::new(),
        };
        mesh.rebuild(params, field);
        mesh
    }

    /// Resample the height field at the current offset and rewrite the
    /// vertex array. The index buffer is untouched.
    pub fn rebuild(&mut self, params: &TerrainParams, field: &HeightField) {
        let n = params.grid_n;
        if n == 0 {
            self.vertices.clear();
            self.heights.clear();
            return;
        }

        let spacing = params.cell_spacing_m;

        // Grid population is embarrassingly parallel: the sampler is pure
        // and rows share nothing.
        self.heights.resize(n * n, 0.0);
        self.heights
            .par_chunks_mut(n)
            .enumerate()
            .for_each(|(z, row)| {
                let world_z = z as f32 * spacing;
                for (x, height) in row.iter_mut().enumerate() {
                    *height = field.sample(
                        x as f32 * spacing,
                        world_z,
                        params.offset,
                        params.amplitude_m,
                        params.base_frequency,
                    );
                }
            });

        // Emit vertices in the same row-major order as the heights grid so
        // z*n + x indexes both.
        self.vertices.clear();
        self.vertices.reserve(n * n);
        let half = (n as i32) / 2;
        let uv_denom = n.saturating_sub(1).max(1) as f32;

        for z in 0..n {
            for x in 0..n {
                let h = self.heights[z * n + x];

                // Central differences, clamped to the center sample at the
                // patch boundary.
                let hl = if x > 0 { self.heights[z * n + x - 1] } else { h };
                let hr = if x < n - 1 { self.heights[z * n + x + 1] } else { h };
                let hd = if z > 0 { self.heights[(z - 1) * n + x] } else { h };
                let hu = if z < n - 1 { self.heights[(z + 1) * n + x] } else { h };

                // The y term is an empirical flatness constant, not a true
                // partial derivative; changing it changes the shading
                // character of the whole patch.
                let normal = Vec3::new(hl - hr, 2.0 * spacing, hd - hu).normalize();

                self.vertices.push(Vertex {
                    position: [
                        (x as i32 - half) as f32 * spacing,
                        h,
                        (z as i32 - half) as f32 * spacing,
                    ],
                    normal: normal.to_array(),
                    uv: [x as f32 / uv_denom, z as f32 / uv_denom],
                });
            }
        }
    }
}

/// Two triangles per cell, `(i0,i2,i1)` then `(i1,i2,i3)`.
///
/// The winding matches the normal convention above; front faces stay
/// consistent across rebuilds because this never depends on runtime
/// parameters.
fn build_indices(n: usize) -> Vec<u32> {
    if n < 2 {
        return Vec::new();
    }

    let mut indices = Vec::with_capacity((n - 1) * (n - 1) * 6);
    for z in 0..n - 1 {
        for x in 0..n - 1 {
            let i0 = (z * n + x) as u32;
            let i1 = i0 + 1;
            let i2 = ((z + 1) * n + x) as u32;
            let i3 = i2 + 1;

            indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
        }
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn params(n: usize) -> TerrainParams {
        TerrainParams {
            grid_n: n,
            cell_spacing_m: 1.0,
            amplitude_m: 30.0,
            base_frequency: 0.02,
            offset: Vec2::ZERO,
            noise_seed: 42,
        }
    }

    #[test]
    fn test_vertex_layout_is_8_floats() {
        assert_eq!(std::mem::size_of::<Vertex>(), 8 * 4);
    }

    #[test]
    fn test_vertex_and_index_counts() {
        let field = HeightField::new(42);
        for n in [2, 3, 4, 8, 33] {
            let mesh = TerrainMesh::new(&params(n), &field);
            assert_eq!(mesh.vertices.len(), n * n);
            assert_eq!(mesh.indices.len(), 6 * (n - 1) * (n - 1));
        }
    }

    #[test]
    fn test_degenerate_grid_has_no_triangles() {
        let field = HeightField::new(42);
        let mesh = TerrainMesh::new(&params(1), &field);
        assert_eq!(mesh.vertices.len(), 1);
        assert!(mesh.indices.is_empty());
    }

    #[test]
    fn test_normals_are_unit_length() {
        let field = HeightField::new(42);
        let mesh = TerrainMesh::new(&params(16), &field);
        for vertex in &mesh.vertices {
            let len = Vec3::from_array(vertex.normal).length();
            assert!((len - 1.0).abs() < 1e-4, "normal length {}", len);
        }
    }

    #[test]
    fn test_indices_invariant_under_noise_parameters() {
        let field = HeightField::new(42);
        let a = TerrainMesh::new(&params(8), &field);

        let mut p = params(8);
        p.offset = Vec2::new(123.0, -77.5);
        p.amplitude_m = 3.0;
        p.base_frequency = 0.4;
        let b = TerrainMesh::new(&p, &field);

        let a_bytes: &[u8] = bytemuck::cast_slice(&a.indices);
        let b_bytes: &[u8] = bytemuck::cast_slice(&b.indices);
        assert_eq!(a_bytes, b_bytes);
    }

    #[test]
    fn test_rebuild_leaves_indices_untouched() {
        let field = HeightField::new(42);
        let mut p = params(8);
        let mut mesh = TerrainMesh::new(&p, &field);
        let before = mesh.indices.clone();

        p.offset = Vec2::new(50.0, 50.0);
        mesh.rebuild(&p, &field);
        assert_eq!(mesh.indices, before);
        assert_eq!(mesh.vertices.len(), 64);
    }

    #[test]
    fn test_integer_division_centering() {
        // For even N the left extent is one cell longer than the right.
        let field = HeightField::new(42);
        let mesh = TerrainMesh::new(&params(4), &field);
        assert_eq!(mesh.vertices[0].position[0], -2.0);
        assert_eq!(mesh.vertices[3].position[0], 1.0);
        assert_eq!(mesh.vertices[0].position[2], -2.0);
    }

    #[test]
    fn test_cell_zero_winding() {
        let field = HeightField::new(42);
        let mesh = TerrainMesh::new(&params(4), &field);
        // i0=0, i1=1, i2=4, i3=5 with row stride 4.
        assert_eq!(&mesh.indices[..6], &[0, 4, 1, 1, 4, 5]);
    }

    #[test]
    fn test_corner_normals_use_clamped_neighbors() {
        let field = HeightField::new(42);
        let p = params(3);
        let mesh = TerrainMesh::new(&p, &field);

        // Recompute the (0,0) corner normal by hand: left and down neighbors
        // are out of bounds, so both clamp to the center sample.
        let h = |x: usize, z: usize| {
            field.sample(
                x as f32 * p.cell_spacing_m,
                z as f32 * p.cell_spacing_m,
                p.offset,
                p.amplitude_m,
                p.base_frequency,
            )
        };
        let center = h(0, 0);
        let expected = Vec3::new(
            center - h(1, 0),
            2.0 * p.cell_spacing_m,
            center - h(0, 1),
        )
        .normalize();

        let got = Vec3::from_array(mesh.vertices[0].normal);
        assert!((got - expected).length() < 1e-6);
    }

    #[test]
    fn test_uvs_span_unit_square() {
        let field = HeightField::new(42);
        let mesh = TerrainMesh::new(&params(5), &field);
        assert_eq!(mesh.vertices[0].uv, [0.0, 0.0]);
        assert_eq!(mesh.vertices[4].uv, [1.0, 0.0]);
        assert_eq!(mesh.vertices[24].uv, [1.0, 1.0]);
        assert_eq!(mesh.vertices[12].uv, [0.5, 0.5]);
    }
}
