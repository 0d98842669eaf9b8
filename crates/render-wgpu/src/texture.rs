use mamba_render::{TextureHandle, TextureId};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to load texture {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("{actual} bytes of pixel data, expected {expected} for {width}x{height} RGBA")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("{width}x{height} texture exceeds the device limit of {max}")]
    TooLarge { width: u32, height: u32, max: u32 },
}

/// How texel values are interpreted when sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// Images authored for display.
    Srgb,
    /// Data textures such as distance fields.
    Linear,
}

impl ColorSpace {
    fn format(self) -> wgpu::TextureFormat {
        match self {
            Self::Srgb => wgpu::TextureFormat::Rgba8UnormSrgb,
            Self::Linear => wgpu::TextureFormat::Rgba8Unorm,
        }
    }
}

/// Decoded RGBA8 image, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixels {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

pub fn decode(path: &Path) -> Result<Pixels, TextureError> {
    let image = image::open(path).map_err(|source| TextureError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = image.into_rgba8();
    Ok(Pixels {
        width: rgba.width(),
        height: rgba.height(),
        data: rgba.into_raw(),
    })
}

/// Reverse row order so texture coordinate v = 0 is the bottom of the image.
pub fn flip_rows(data: &[u8], width: u32, height: u32) -> Vec<u8> {
    let stride = width as usize * 4;
    let mut out = Vec::with_capacity(data.len());
    for row in (0..height as usize).rev() {
        out.extend_from_slice(&data[row * stride..(row + 1) * stride]);
    }
    out
}

/// Reject dimensions the device cannot create.
pub fn check_dimensions(width: u32, height: u32, max: u32) -> Result<(), TextureError> {
    if width > max || height > max {
        return Err(TextureError::TooLarge { width, height, max });
    }
    Ok(())
}

/// A sampled 2D texture. Uniquely owned; the GPU texture is released on drop.
pub struct Texture {
    id: TextureId,
    view: Arc<wgpu::TextureView>,
    texture: wgpu::Texture,
}

impl Texture {
    /// Upload RGBA8 pixels given top row first.
    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pixels: &Pixels,
        color_space: ColorSpace,
        label: &str,
    ) -> Result<Self, TextureError> {
        let expected = pixels.width as usize * pixels.height as usize * 4;
        if pixels.data.len() != expected || expected == 0 {
            return Err(TextureError::SizeMismatch {
                width: pixels.width,
                height: pixels.height,
                expected,
                actual: pixels.data.len(),
            });
        }
        check_dimensions(
            pixels.width,
            pixels.height,
            device.limits().max_texture_dimension_2d,
        )?;
        Ok(Self::create(device, queue, pixels, color_space, label))
    }

    pub fn load(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
    ) -> Result<Self, TextureError> {
        let pixels = decode(path)?;
        let label = path.display().to_string();
        Self::from_rgba8(device, queue, &pixels, ColorSpace::Srgb, &label)
    }

    /// Like [`Self::load`], but degrades to a 1x1 white texture on failure.
    pub fn load_or_white(device: &wgpu::Device, queue: &wgpu::Queue, path: &Path) -> Self {
        match Self::load(device, queue, path) {
            Ok(texture) => {
                tracing::debug!("loaded texture {}", path.display());
                texture
            }
            Err(e) => {
                tracing::error!("{e}; using a white texture instead");
                Self::white(device, queue)
            }
        }
    }

    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let pixels = Pixels {
            width: 1,
            height: 1,
            data: vec![255; 4],
        };
        Self::create(device, queue, &pixels, ColorSpace::Srgb, "white_texture")
    }

    fn create(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pixels: &Pixels,
        color_space: ColorSpace,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: pixels.width,
            height: pixels.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: color_space.format(),
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
            &flip_rows(&pixels.data, pixels.width, pixels.height),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * pixels.width),
                rows_per_image: Some(pixels.height),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            id: TextureId::next(),
            view: Arc::new(view),
            texture,
        }
    }

    pub fn width(&self) -> u32 {
        self.texture.width()
    }

    pub fn height(&self) -> u32 {
        self.texture.height()
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

impl TextureHandle for Texture {
    type Binding = Arc<wgpu::TextureView>;

    fn id(&self) -> TextureId {
        self.id
    }

    fn binding(&self) -> Arc<wgpu::TextureView> {
        self.view.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_reverses_rows() {
        // 1x3 image, one RGBA pixel per row.
        let data = [1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3];
        assert_eq!(flip_rows(&data, 1, 3), [3, 3, 3, 3, 2, 2, 2, 2, 1, 1, 1, 1]);
    }

    #[test]
    fn decode_png_to_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        let img = image::RgbImage::from_fn(2, 3, |x, y| image::Rgb([x as u8, y as u8, 7]));
        img.save(&path).unwrap();

        let pixels = decode(&path).unwrap();
        assert_eq!((pixels.width, pixels.height), (2, 3));
        assert_eq!(pixels.data.len(), 2 * 3 * 4);
        // Second pixel of the first row, alpha filled in.
        assert_eq!(&pixels.data[4..8], &[1, 0, 7, 255]);
    }

    #[test]
    fn decode_failure_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();

        let err = decode(&path).unwrap_err();
        assert!(matches!(err, TextureError::Decode { .. }));
        assert!(err.to_string().contains("broken.png"));
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        assert!(check_dimensions(8192, 8192, 8192).is_ok());
        assert!(check_dimensions(1, 1, 8192).is_ok());

        let err = check_dimensions(9000, 10, 8192).unwrap_err();
        assert!(matches!(
            err,
            TextureError::TooLarge {
                width: 9000,
                height: 10,
                max: 8192
            }
        ));
        assert!(matches!(
            check_dimensions(10, 8193, 8192),
            Err(TextureError::TooLarge { .. })
        ));
    }
}
