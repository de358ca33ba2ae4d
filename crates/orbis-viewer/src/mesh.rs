//! Sphere mesh generation.
//!
//! The mesh is a latitude/longitude tessellation of the unit sphere, built
//! once at startup and never mutated. Triangles are shared through an index
//! list; the degenerate triangle at each pole is skipped.

use std::f32::consts::PI;

use bytemuck::{Pod, Zeroable};

/// Latitude ring count (from the +z pole to the -z pole).
pub const LAT_SEGMENTS: u32 = 36;

/// Longitude segment count (full turn).
pub const LON_SEGMENTS: u32 = 72;

/// Vertex layout shared with the WGSL shader.
///
///  offset  0  position   [f32; 3]   loc 0
///  offset 12  normal     [f32; 3]   loc 1
///  offset 24  tex_coord  [f32; 2]   loc 2
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3, // normal
        2 => Float32x2  // tex_coord
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Host-side sphere geometry (vertices + triangle index list).
#[derive(Debug, Clone)]
pub struct SphereMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    /// Tessellates the unit sphere on the fixed 36×72 grid.
    ///
    /// Rows run from the +z pole (`theta = 0`) to the -z pole (`theta = π`);
    /// each row holds `LON_SEGMENTS + 1` vertices so the seam at `phi = 2π`
    /// duplicates the `phi = 0` column with its own texture coordinate.
    /// For a unit sphere the normal equals the position.
    pub fn unit() -> Self {
        let rows = LAT_SEGMENTS + 1;
        let cols = LON_SEGMENTS + 1;

        let mut vertices = Vec::with_capacity((rows * cols) as usize);
        for i in 0..rows {
            let theta = PI * i as f32 / LAT_SEGMENTS as f32;
            let (s_theta, c_theta) = theta.sin_cos();

            for j in 0..cols {
                let phi = 2.0 * PI * j as f32 / LON_SEGMENTS as f32;
                let (s_phi, c_phi) = phi.sin_cos();

                let p = [s_theta * c_phi, s_theta * s_phi, c_theta];
                vertices.push(Vertex {
                    position: p,
                    normal: p,
                    tex_coord: [
                        j as f32 / LON_SEGMENTS as f32,
                        1.0 - i as f32 / LAT_SEGMENTS as f32,
                    ],
                });
            }
        }

        let mut indices = Vec::new();
        for i in 0..LAT_SEGMENTS {
            for j in 0..LON_SEGMENTS {
                let base = i * cols + j;

                // Upper triangle collapses on the first ring (base is a pole
                // point there), lower triangle on the last.
                if i != 0 {
                    indices.extend_from_slice(&[base, base + cols, base + 1]);
                }
                if i != LAT_SEGMENTS - 1 {
                    indices.extend_from_slice(&[base + 1, base + cols, base + cols + 1]);
                }
            }
        }

        SphereMesh { vertices, indices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_count_matches_grid() {
        let mesh = SphereMesh::unit();
        assert_eq!(
            mesh.vertices.len(),
            ((LAT_SEGMENTS + 1) * (LON_SEGMENTS + 1)) as usize
        );
        assert_eq!(mesh.vertices.len(), 37 * 73);
    }

    #[test]
    fn index_count_skips_pole_triangles() {
        let mesh = SphereMesh::unit();
        // Interior formula minus one degenerate triangle per cell at each pole.
        let expected = LAT_SEGMENTS * LON_SEGMENTS * 6 - 2 * LON_SEGMENTS * 3;
        assert_eq!(mesh.indices.len(), expected as usize);
        assert_eq!(mesh.indices.len(), 15_120);
    }

    #[test]
    fn indices_are_in_bounds() {
        let mesh = SphereMesh::unit();
        let n = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
    }

    #[test]
    fn pole_rows_sit_on_the_z_axis() {
        let mesh = SphereMesh::unit();
        let cols = (LON_SEGMENTS + 1) as usize;

        for v in &mesh.vertices[..cols] {
            assert!(v.position[0].abs() < 1e-6);
            assert!(v.position[1].abs() < 1e-6);
            assert!((v.position[2] - 1.0).abs() < 1e-6);
        }
        for v in &mesh.vertices[mesh.vertices.len() - cols..] {
            assert!(v.position[0].abs() < 1e-6);
            assert!(v.position[1].abs() < 1e-6);
            assert!((v.position[2] + 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn normals_are_unit_positions() {
        let mesh = SphereMesh::unit();
        for v in &mesh.vertices {
            let [x, y, z] = v.position;
            let len = (x * x + y * y + z * z).sqrt();
            assert!((len - 1.0).abs() < 1e-5);
            assert_eq!(v.normal, v.position);
        }
    }

    #[test]
    fn tex_coords_cover_the_unit_square() {
        let mesh = SphereMesh::unit();
        for v in &mesh.vertices {
            assert!((0.0..=1.0).contains(&v.tex_coord[0]));
            assert!((0.0..=1.0).contains(&v.tex_coord[1]));
        }
        // v runs from 1 at the +z pole down to 0 at the -z pole.
        assert_eq!(mesh.vertices.first().unwrap().tex_coord[1], 1.0);
        assert_eq!(mesh.vertices.last().unwrap().tex_coord[1], 0.0);
    }
}
