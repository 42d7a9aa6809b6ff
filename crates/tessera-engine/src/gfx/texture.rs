use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::render::RenderCtx;

use super::error::GfxError;

/// Layout of caller-provided pixel data. Both are 8 bits per channel.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PixelFormat {
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }
}

/// A sampled 2D texture with its bind group (group 1) ready for drawing.
///
/// Cheap to clone; clones share the GPU texture.
#[derive(Clone)]
pub struct Texture {
    inner: Arc<TextureInner>,
}

struct TextureInner {
    label: String,
    width: u32,
    height: u32,
    // Kept alive by the view and bind group too; held for `width`/`height` queries.
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("label", &self.inner.label)
            .field("width", &self.inner.width)
            .field("height", &self.inner.height)
            .finish()
    }
}

impl Texture {
    /// Uploads tightly packed pixels (rows top to bottom).
    ///
    /// RGB data is expanded to RGBA. Addressing repeats; filtering is linear.
    pub fn create_2d(
        ctx: &RenderCtx<'_>,
        pixels: &[u8],
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Result<Texture, GfxError> {
        let rgba = to_rgba(pixels, width, height, format)?;
        let res = ctx.resources;
        Ok(Self::upload(
            ctx.device,
            ctx.queue,
            res.texture_layout(),
            res.linear_sampler(),
            &rgba,
            width,
            height,
            "texture",
        ))
    }

    /// Decodes a PNG or JPEG image and uploads it.
    pub fn from_image_bytes(ctx: &RenderCtx<'_>, bytes: &[u8]) -> Result<Texture, GfxError> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = image.dimensions();
        log::info!("decoded texture image: {width}x{height}");
        Self::create_2d(ctx, image.as_raw(), width, height, PixelFormat::Rgba8)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    pub(crate) fn bind_group(&self) -> &wgpu::BindGroup {
        &self.inner.bind_group
    }

    /// Creates the GPU texture, uploads `rgba`, and binds it with `sampler`.
    ///
    /// `rgba` must already be validated against `width * height * 4`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        rgba: &[u8],
        width: u32,
        height: u32,
        label: &str,
    ) -> Texture {
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
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

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
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        log::debug!("texture {label:?} uploaded: {width}x{height}");

        Texture {
            inner: Arc::new(TextureInner {
                label: label.to_string(),
                width,
                height,
                _texture: texture,
                bind_group,
            }),
        }
    }
}

/// Validates the pixel buffer size and expands RGB to RGBA (alpha 255).
pub fn to_rgba(
    pixels: &[u8],
    width: u32,
    height: u32,
    format: PixelFormat,
) -> Result<Cow<'_, [u8]>, GfxError> {
    if width == 0 || height == 0 {
        return Err(GfxError::EmptyTexture { width, height });
    }

    let expected = width as usize * height as usize * format.bytes_per_pixel();
    if pixels.len() != expected {
        return Err(GfxError::TextureSize {
            format,
            width,
            height,
            expected,
            actual: pixels.len(),
        });
    }

    Ok(match format {
        PixelFormat::Rgba8 => Cow::Borrowed(pixels),
        PixelFormat::Rgb8 => Cow::Owned(
            pixels
                .chunks_exact(3)
                .flat_map(|px| [px[0], px[1], px[2], 0xff])
                .collect(),
        ),
    })
}
