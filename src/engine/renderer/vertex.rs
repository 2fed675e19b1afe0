// Vertex structure for 2D sprite rendering

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3, Vec4};

/// Index pattern for one quad built by [`Vertex::quad`]
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Vertex for 2D sprite rendering
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in world space (z for layering)
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    /// Tint (RGBA)
    pub color: [f32; 4],
}

impl Vertex {
    pub fn new(position: Vec3, tex_coords: Vec2, color: Vec4) -> Self {
        Self {
            position: position.to_array(),
            tex_coords: tex_coords.to_array(),
            color: color.to_array(),
        }
    }

    /// Corners of a unit quad pushed through `transform`
    ///
    /// Order is bottom-left, bottom-right, top-right, top-left in a Y-up
    /// world. Texture space is Y-down, so the bottom edge samples `uv_max.y`.
    pub fn quad(transform: Mat4, uv_min: Vec2, uv_max: Vec2, color: Vec4) -> [Vertex; 4] {
        let corner = |x: f32, y: f32| transform.transform_point3(Vec3::new(x, y, 0.0));
        [
            Vertex::new(corner(-0.5, -0.5), Vec2::new(uv_min.x, uv_max.y), color),
            Vertex::new(corner(0.5, -0.5), uv_max, color),
            Vertex::new(corner(0.5, 0.5), Vec2::new(uv_max.x, uv_min.y), color),
            Vertex::new(corner(-0.5, 0.5), uv_min, color),
        ]
    }

    /// Get the vertex buffer layout descriptor
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Tex Coords
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // Color
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}
