//! Per-object texture residency
//!
//! Every adoption creates a fresh texture sized to the incoming image and
//! writes all of its bytes before the texture is ever bound, so the render
//! pass can never sample a half-written upload. The superseded texture is
//! released when its `ObjectTexture` is dropped.

use crate::core::error::Error;

/// Pixel format of all object textures; adoption reorders decoded RGBA
/// bytes into this order before upload
pub const OBJECT_TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8UnormSrgb;

/// A GPU-resident object texture
pub struct ObjectTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl ObjectTexture {
    /// Create a texture of the given size and fill it with `bgra` bytes
    ///
    /// Rejects zero dimensions and byte buffers that do not match
    /// `width * height * 4`; the caller keeps displaying its previous
    /// texture in that case.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        width: u32,
        height: u32,
        bgra: &[u8],
    ) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::Gpu(format!("invalid texture size {width}x{height}")));
        }
        let expected = width as usize * height as usize * 4;
        if bgra.len() != expected {
            return Err(Error::Gpu(format!(
                "texture data is {} bytes, expected {expected} for {width}x{height}",
                bgra.len()
            )));
        }

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("object_texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: OBJECT_TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bgra,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: None,
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Ok(Self { texture, view })
    }
}
