// Mesh buffers produced by the track builder, plus the GPU-ready form.
//
// Two layers:
//   MeshBuffers (positions, triangle indices, UVs) → to_render_mesh() → RenderMesh → GPU
// Normals are not stored on MeshBuffers; they are recomputed from the winding.

use glam::{Vec2, Vec3};

// ============================================================================
// GPU VERTEX
// ============================================================================

/// GPU-ready vertex with position, normal and texture coordinate.
///   @location(0) position: vec3<f32>
///   @location(1) normal:   vec3<f32>
///   @location(2) uv:       vec2<f32>
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TrackVertex {
    pub position: [f32; 3],
    pub normal:   [f32; 3],
    pub uv:       [f32; 2],
}

impl TrackVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TrackVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

// ============================================================================
// MESH BUFFERS
// ============================================================================

/// Triangle-list geometry for one mesh: one UV per position, three indices per triangle.
/// Faces use CCW winding viewed from outside.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<Vec3>,
    pub indices:   Vec<u32>,
    pub uvs:       Vec<Vec2>,
}

impl MeshBuffers {
    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            indices:   Vec::with_capacity(indices),
            uvs:       Vec::with_capacity(vertices),
        }
    }

    /// Add a vertex with its UV and return its index.
    pub fn add_vertex(&mut self, pos: Vec3, uv: Vec2) -> u32 {
        let idx = self.positions.len() as u32;
        self.positions.push(pos);
        self.uvs.push(uv);
        idx
    }

    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    pub fn vertex_count(&self) -> usize { self.positions.len() }
    pub fn index_count(&self) -> usize { self.indices.len() }
    pub fn triangle_count(&self) -> usize { self.indices.len() / 3 }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Unnormalized face normal (magnitude = 2 × area) of triangle `tri`.
    pub fn face_normal(&self, tri: usize) -> Vec3 {
        let base = tri * 3;
        let a = self.positions[self.indices[base] as usize];
        let b = self.positions[self.indices[base + 1] as usize];
        let c = self.positions[self.indices[base + 2] as usize];
        (b - a).cross(c - a)
    }

    /// Convert to a GPU-ready RenderMesh with smooth (area-weighted) normals.
    ///
    /// Vertices stay shared across triangles, so a vertex on the edge of the
    /// track box gets the blend of the faces meeting there.
    pub fn to_render_mesh(&self) -> RenderMesh {
        let mut normal_accum: Vec<Vec3> = vec![Vec3::ZERO; self.vertex_count()];

        for tri in 0..self.triangle_count() {
            // Cross product magnitude encodes 2×area (area-weighting)
            let weighted_normal = self.face_normal(tri);
            for &i in &self.indices[tri * 3..tri * 3 + 3] {
                normal_accum[i as usize] += weighted_normal;
            }
        }

        let vertices = self.positions.iter()
            .zip(normal_accum.iter())
            .zip(self.uvs.iter())
            .map(|((pos, n), uv)| TrackVertex {
                position: pos.to_array(),
                normal:   n.normalize_or_zero().to_array(),
                uv:       uv.to_array(),
            })
            .collect();

        RenderMesh { vertices, indices: self.indices.clone() }
    }
}

// ============================================================================
// RENDER MESH
// ============================================================================

/// Upload vertex_bytes() to a VERTEX buffer, index_bytes() to an INDEX buffer (Uint32).
#[derive(Debug, Clone)]
pub struct RenderMesh {
    pub vertices: Vec<TrackVertex>,
    pub indices:  Vec<u32>,
}

impl RenderMesh {
    /// Cast vertex slice to raw bytes for wgpu buffer upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Cast index slice to raw bytes for wgpu buffer upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn index_count(&self) -> usize { self.indices.len() }
}
