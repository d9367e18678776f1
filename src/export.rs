use std::io::Cursor;

use image::{
    ExtendedColorType, ImageEncoder,
    codecs::{jpeg::JpegEncoder, png::PngEncoder, webp::WebPEncoder},
};

use crate::{
    core::OutputFormat,
    error::{ReframeError, ReframeResult},
    surface::Surface,
};

/// Encoder quality for lossy output. PNG ignores it; WebP is encoded
/// lossless by the `image` crate, so in practice it applies to JPEG.
pub const LOSSY_QUALITY: f32 = 0.92;

/// Everything the download collaborator needs to offer the file.
#[derive(Clone, Debug)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: &'static str,
}

/// Encode a rendered surface. No partial output: a failing encoder yields
/// an error and nothing else.
pub fn encode(surface: &Surface, format: OutputFormat) -> ReframeResult<Vec<u8>> {
    let mut buf = Vec::new();
    let (w, h) = (surface.width(), surface.height());

    match format {
        OutputFormat::Png => {
            let rgba = surface.to_straight_rgba();
            PngEncoder::new(Cursor::new(&mut buf))
                .write_image(&rgba, w, h, ExtendedColorType::Rgba8)
                .map_err(|err| ReframeError::encode(format!("encode png: {err}")))?;
        }
        OutputFormat::Jpeg => {
            // Dropping alpha from the premultiplied buffer flattens
            // transparency to black, the same as a canvas JPEG export.
            let rgb = premul_to_rgb(surface.data());
            let quality = (LOSSY_QUALITY * 100.0).round() as u8;
            JpegEncoder::new_with_quality(Cursor::new(&mut buf), quality)
                .write_image(&rgb, w, h, ExtendedColorType::Rgb8)
                .map_err(|err| ReframeError::encode(format!("encode jpeg: {err}")))?;
        }
        OutputFormat::Webp => {
            let rgba = surface.to_straight_rgba();
            WebPEncoder::new_lossless(Cursor::new(&mut buf))
                .write_image(&rgba, w, h, ExtendedColorType::Rgba8)
                .map_err(|err| ReframeError::encode(format!("encode webp: {err}")))?;
        }
    }

    Ok(buf)
}

/// `{source-base-name}-{width}x{height}.{ext}`, base defaulting to "image".
pub fn export_file_name(
    source_name: Option<&str>,
    width: u32,
    height: u32,
    format: OutputFormat,
) -> String {
    let base = source_name
        .map(strip_extension)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "image".to_string());
    format!("{base}-{width}x{height}.{}", format.extension())
}

fn premul_to_rgb(premul_rgba: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(premul_rgba.len() / 4 * 3);
    for px in premul_rgba.chunks_exact(4) {
        out.extend_from_slice(&px[0..3]);
    }
    out
}

fn strip_extension(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => name.to_string(),
    }
}
