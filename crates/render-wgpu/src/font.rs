use crate::texture::{ColorSpace, Pixels, Texture, TextureError};
use mamba_render::atlas::load_atlas;
use mamba_render::{Font, FontError};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum FontLoadError {
    #[error(transparent)]
    Font(#[from] FontError),
    #[error("failed to upload font atlas: {0}")]
    Upload(#[from] TextureError),
}

/// Build the SDF atlas for the font at `path` and upload it.
///
/// The atlas holds distances, not colors, so it is sampled linearly.
pub fn load_font(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    path: &Path,
) -> Result<Font<Texture>, FontLoadError> {
    let (bitmap, geometry) = load_atlas(path)?;
    let pixels = Pixels {
        width: bitmap.width,
        height: bitmap.height,
        data: bitmap.pixels,
    };
    let label = format!("font_atlas:{}", path.display());
    let atlas = Texture::from_rgba8(device, queue, &pixels, ColorSpace::Linear, &label)?;
    tracing::info!(
        "loaded font {} ({} glyphs, {}x{} atlas)",
        path.display(),
        geometry.len(),
        pixels.width,
        pixels.height
    );
    Ok(Font::new(atlas, geometry))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_errors_pass_through_unchanged() {
        let err: FontLoadError = FontError::NoGlyphs.into();
        assert_eq!(err.to_string(), FontError::NoGlyphs.to_string());
    }
}
