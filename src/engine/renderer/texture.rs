// GPU textures for decoded sheets and rasterized maps

use anyhow::{anyhow, bail, Result};
use image::RgbaImage;
use log::info;

/// Handle to an uploaded texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(usize);

impl TextureHandle {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }
}

/// Refuse images the device cannot hold in a single 2D texture
pub fn check_texture_size(label: &str, width: u32, height: u32, max_dimension: u32) -> Result<()> {
    if width == 0 || height == 0 {
        bail!("cannot upload empty image '{label}'");
    }
    if width > max_dimension || height > max_dimension {
        bail!(
            "image '{label}' is {width}x{height} pixels, larger than the {max_dimension} pixel texture limit of this GPU"
        );
    }
    Ok(())
}

/// An uploaded texture with its bind group
pub struct Texture {
    texture: wgpu::Texture,
    pub bind_group: wgpu::BindGroup,
}

impl Texture {
    /// Upload RGBA pixels
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        image: &RgbaImage,
        label: &str,
    ) -> Result<Self> {
        let (width, height) = image.dimensions();
        check_texture_size(label, width, height, device.limits().max_texture_dimension_2d)?;

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.as_raw(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Pixel art: never blend neighbouring texels
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        Ok(Self {
            texture,
            bind_group,
        })
    }

    /// Size in pixels
    pub fn size(&self) -> (u32, u32) {
        (self.texture.width(), self.texture.height())
    }

    /// 1x1 solid color texture
    pub fn from_color(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        color: [u8; 4],
        label: &str,
    ) -> Result<Self> {
        let image = RgbaImage::from_pixel(1, 1, image::Rgba(color));
        Self::from_rgba(device, queue, layout, &image, label)
    }
}

/// Owns every uploaded texture plus the layout their bind groups share
pub struct TextureManager {
    textures: Vec<Texture>,
    bind_group_layout: wgpu::BindGroupLayout,
    white: TextureHandle,
}

impl TextureManager {
    /// Create the manager and its white fallback texture
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Result<Self> {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let white = Texture::from_color(device, queue, &bind_group_layout, [255; 4], "White")?;

        Ok(Self {
            textures: vec![white],
            bind_group_layout,
            white: TextureHandle(0),
        })
    }

    /// Upload an image and hand back its handle
    pub fn load_image(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &RgbaImage,
        label: &str,
    ) -> Result<TextureHandle> {
        let texture = Texture::from_rgba(device, queue, &self.bind_group_layout, image, label)?;
        let handle = TextureHandle(self.textures.len());
        self.textures.push(texture);
        Ok(handle)
    }

    /// Swap the pixels behind an existing handle (hot reload)
    pub fn replace_image(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        handle: TextureHandle,
        image: &RgbaImage,
        label: &str,
    ) -> Result<()> {
        if handle == self.white || handle.0 >= self.textures.len() {
            return Err(anyhow!("no replaceable texture at index {}", handle.0));
        }
        let texture = Texture::from_rgba(device, queue, &self.bind_group_layout, image, label)?;
        let (old_width, old_height) = self.textures[handle.0].size();
        let (width, height) = texture.size();
        info!("Replaced texture '{label}': {old_width}x{old_height} -> {width}x{height}");
        self.textures[handle.0] = texture;
        Ok(())
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&Texture> {
        self.textures.get(handle.0)
    }

    /// Texture used by untextured sprites
    pub fn white(&self) -> TextureHandle {
        self.white
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }
}
