// Rendering system using wgpu

mod camera;
mod sprite;
pub mod texture;
mod vertex;

pub use camera::{follow_step, Camera, CameraUniform};
pub use sprite::{Sprite, SpriteRenderer};
pub use texture::{TextureHandle, TextureManager};
pub use vertex::Vertex;

#[allow(unused_imports)]
pub use camera::Viewport;
#[allow(unused_imports)]
pub use sprite::{BatchedGeometry, SpriteBatch};

use anyhow::{anyhow, Result};
use glam::{Vec2, Vec4};
use image::RgbaImage;
use log::{info, warn};
use std::sync::Arc;
use winit::window::Window;

/// Whatever a scene draws into
///
/// A frame is `clear`, any number of `set_view`/`draw_sprite` calls, then
/// `present`. Sprites are drawn in submission order.
pub trait DrawTarget {
    /// Start a new frame filled with `color` (linear RGBA)
    fn clear(&mut self, color: Vec4);

    /// Center the view on a world position
    fn set_view(&mut self, center: Vec2);

    fn draw_sprite(&mut self, sprite: Sprite);

    /// Show the frame
    fn present(&mut self) -> Result<()>;
}

/// Main renderer responsible for initializing wgpu and coordinating rendering
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    sprite_renderer: SpriteRenderer,
    texture_manager: TextureManager,
    camera: Camera,
    clear_color: wgpu::Color,
}

impl Renderer {
    /// Create a new renderer for the given window
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow!("Failed to find suitable GPU adapter"))?;

        info!("Using GPU: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("Surface reports no supported formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);

        let texture_manager = TextureManager::new(&device, &queue)?;
        let sprite_renderer =
            SpriteRenderer::new(&device, surface_format, texture_manager.bind_group_layout())?;
        let camera = Camera::new(Vec2::ZERO, size.width as f32, size.height as f32);

        info!(
            "Renderer initialized with {}x{} resolution",
            size.width, size.height
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            sprite_renderer,
            texture_manager,
            camera,
            clear_color: wgpu::Color::BLACK,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.camera
                .resize(new_size.width as f32, new_size.height as f32);
            info!("Renderer resized to {}x{}", new_size.width, new_size.height);
        }
    }

    /// Upload a CPU image as a new texture
    pub fn upload_image(&mut self, image: &RgbaImage, label: &str) -> Result<TextureHandle> {
        self.texture_manager
            .load_image(&self.device, &self.queue, image, label)
    }

    /// Replace the pixels behind `handle`
    pub fn replace_image(&mut self, handle: TextureHandle, image: &RgbaImage, label: &str) -> Result<()> {
        self.texture_manager
            .replace_image(&self.device, &self.queue, handle, image, label)
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.sprite_renderer
            .prepare(&self.device, &self.queue, &self.camera, &self.texture_manager);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.sprite_renderer
                .render(&mut render_pass, &self.texture_manager);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl DrawTarget for Renderer {
    fn clear(&mut self, color: Vec4) {
        self.clear_color = wgpu::Color {
            r: color.x as f64,
            g: color.y as f64,
            b: color.z as f64,
            a: color.w as f64,
        };
        self.sprite_renderer.clear();
    }

    fn set_view(&mut self, center: Vec2) {
        self.camera.set_position(center);
    }

    fn draw_sprite(&mut self, sprite: Sprite) {
        self.sprite_renderer.add_sprite(sprite);
    }

    fn present(&mut self) -> Result<()> {
        // Minimized: nothing to draw into
        if self.size.width == 0 || self.size.height == 0 {
            self.sprite_renderer.clear();
            return Ok(());
        }

        let result = self.render();
        self.sprite_renderer.clear();

        match result {
            Ok(()) => Ok(()),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost or outdated, reconfiguring");
                self.resize(self.size);
                Ok(())
            }
            Err(wgpu::SurfaceError::OutOfMemory) => Err(anyhow!("GPU out of memory")),
            Err(e) => {
                warn!("Dropped frame: {e:?}");
                Ok(())
            }
        }
    }
}
