// Sprite batching and the sprite render pipeline

use super::{Camera, CameraUniform, TextureHandle, TextureManager, Vertex};
use crate::engine::assets::Frame;
use crate::engine::renderer::vertex::QUAD_INDICES;
use anyhow::Result;
use glam::{Mat4, UVec2, Vec2, Vec3, Vec4};
use std::ops::Range;
use wgpu::util::DeviceExt;

/// Sprites the vertex buffer holds before it has to grow
const INITIAL_SPRITE_CAPACITY: usize = 64;

/// A 2D sprite for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    /// Center in world space
    pub position: Vec2,
    /// Rotation in radians
    pub rotation: f32,
    pub scale: Vec2,
    /// Size in world units (pixels at zoom 1)
    pub size: Vec2,
    /// Color tint (RGBA, 1.0 = full color)
    pub color: Vec4,
    /// Texture handle (None = white texture)
    pub texture: Option<TextureHandle>,
    /// Top-left texture coordinate of the source region
    pub uv_min: Vec2,
    /// Bottom-right texture coordinate of the source region
    pub uv_max: Vec2,
    /// Z-order for layering (higher = drawn on top)
    pub z_order: f32,
}

impl Sprite {
    /// Untextured quad
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
            scale: Vec2::ONE,
            size,
            color: Vec4::ONE,
            texture: None,
            uv_min: Vec2::ZERO,
            uv_max: Vec2::ONE,
            z_order: 0.0,
        }
    }

    /// Whole texture stretched over `size`
    pub fn with_texture(position: Vec2, size: Vec2, texture: TextureHandle) -> Self {
        Self {
            texture: Some(texture),
            ..Self::new(position, size)
        }
    }

    /// One frame of a sheet, drawn at the frame's pixel size
    pub fn from_frame(texture: TextureHandle, frame: Frame, sheet_size: UVec2, position: Vec2) -> Self {
        Self {
            texture: Some(texture),
            uv_min: frame.uv_min(sheet_size.x, sheet_size.y),
            uv_max: frame.uv_max(sheet_size.x, sheet_size.y),
            ..Self::new(position, frame.size())
        }
    }

    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    pub fn with_z_order(mut self, z_order: f32) -> Self {
        self.z_order = z_order;
        self
    }

    pub fn transform_matrix(&self) -> Mat4 {
        let translation = Mat4::from_translation(Vec3::new(self.position.x, self.position.y, 0.0));
        let rotation = Mat4::from_rotation_z(self.rotation);
        let scale = Mat4::from_scale(Vec3::new(
            self.size.x * self.scale.x,
            self.size.y * self.scale.y,
            1.0,
        ));

        translation * rotation * scale
    }

    /// Half extents of the axis-aligned box around the sprite
    fn half_extent(&self) -> Vec2 {
        let half = (self.size * self.scale).abs() * 0.5;
        if self.rotation == 0.0 {
            half
        } else {
            Vec2::splat(half.length())
        }
    }

    pub fn vertices(&self) -> [Vertex; 4] {
        Vertex::quad(self.transform_matrix(), self.uv_min, self.uv_max, self.color)
    }
}

/// Run of consecutive sprites sharing one texture
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteBatch {
    pub texture: TextureHandle,
    pub indices: Range<u32>,
}

/// CPU side of a frame: vertices, indices and the draw calls over them
#[derive(Debug, Default)]
pub struct BatchedGeometry {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub batches: Vec<SpriteBatch>,
}

impl BatchedGeometry {
    /// Build geometry in submission order, merging runs with equal textures
    ///
    /// Sprites are stably ordered by z-order first, so equal z keeps the order
    /// they were queued in. Untextured sprites draw with `white`.
    pub fn build(sprites: &[Sprite], white: TextureHandle) -> Self {
        let mut ordered: Vec<&Sprite> = sprites.iter().collect();
        ordered.sort_by(|a, b| a.z_order.total_cmp(&b.z_order));

        let mut geometry = Self::default();
        for sprite in ordered {
            let texture = sprite.texture.unwrap_or(white);
            let base = geometry.vertices.len() as u32;
            let first_index = geometry.indices.len() as u32;

            geometry.vertices.extend_from_slice(&sprite.vertices());
            geometry.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
            let end = geometry.indices.len() as u32;

            match geometry.batches.last_mut() {
                Some(batch) if batch.texture == texture => batch.indices.end = end,
                _ => geometry.batches.push(SpriteBatch {
                    texture,
                    indices: first_index..end,
                }),
            }
        }
        geometry
    }
}

/// Sprite renderer batching quads by texture
pub struct SpriteRenderer {
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    capacity: usize,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    sprites: Vec<Sprite>,
    batches: Vec<SpriteBatch>,
}

impl SpriteRenderer {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        texture_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Result<Self> {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sprite Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sprite.wgsl").into()),
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sprite Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, texture_bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sprite Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[Vertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Negative scale mirrors a sprite, so keep both faces
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let (vertex_buffer, index_buffer) = create_geometry_buffers(device, INITIAL_SPRITE_CAPACITY);

        let camera_uniform = CameraUniform {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
        };

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        Ok(Self {
            render_pipeline,
            vertex_buffer,
            index_buffer,
            capacity: INITIAL_SPRITE_CAPACITY,
            camera_buffer,
            camera_bind_group,
            sprites: Vec::new(),
            batches: Vec::new(),
        })
    }

    pub fn add_sprite(&mut self, sprite: Sprite) {
        self.sprites.push(sprite);
    }

    pub fn clear(&mut self) {
        self.sprites.clear();
        self.batches.clear();
    }

    /// Upload the camera and this frame's geometry
    ///
    /// Sprites entirely outside the viewport are skipped.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        camera: &Camera,
        textures: &TextureManager,
    ) {
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[CameraUniform::new(camera)]),
        );

        let viewport = camera.viewport_bounds();
        let visible: Vec<Sprite> = self
            .sprites
            .iter()
            .filter(|s| viewport.intersects_rect(s.position, s.half_extent()))
            .cloned()
            .collect();

        let geometry = BatchedGeometry::build(&visible, textures.white());
        if visible.len() > self.capacity {
            self.capacity = visible.len().next_power_of_two();
            let (vertex_buffer, index_buffer) = create_geometry_buffers(device, self.capacity);
            self.vertex_buffer = vertex_buffer;
            self.index_buffer = index_buffer;
        }

        if !geometry.vertices.is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&geometry.vertices));
            queue.write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&geometry.indices));
        }
        self.batches = geometry.batches;
    }

    /// Record the draw calls built by the last `prepare`
    pub fn render<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        textures: &'a TextureManager,
    ) {
        if self.batches.is_empty() {
            return;
        }

        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

        for batch in &self.batches {
            let Some(texture) = textures.get(batch.texture) else {
                log::warn!("Skipping sprites with unknown texture {:?}", batch.texture);
                continue;
            };
            render_pass.set_bind_group(1, &texture.bind_group, &[]);
            render_pass.draw_indexed(batch.indices.clone(), 0, 0..1);
        }
    }
}

fn create_geometry_buffers(device: &wgpu::Device, sprites: usize) -> (wgpu::Buffer, wgpu::Buffer) {
    let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Vertex Buffer"),
        size: (sprites * 4 * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Index Buffer"),
        size: (sprites * QUAD_INDICES.len() * std::mem::size_of::<u32>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    (vertex_buffer, index_buffer)
}
