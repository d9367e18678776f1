use image::imageops::FilterType;

use crate::{
    core::{BackgroundMode, MAX_TARGET_DIM, MIN_TARGET_DIM, Rgb, TargetSpec},
    layout::resolve_placement,
    source::SourceImage,
    surface::Surface,
};

/// 1-logical-px frame drawn around interactive previews. Export renders
/// never carry it.
pub const PREVIEW_BORDER_COLOR: Rgb = Rgb {
    r: 0x88,
    g: 0x88,
    b: 0x88,
};

/// Render `source` onto a canvas described by `spec`.
///
/// The dimension clamp is authoritative: it is written back into `spec` so
/// UI and stored state always match what was actually rendered. All
/// geometry is computed in logical (unscaled) coordinates and uniformly
/// scaled by `pixel_density`, so the same placement produces sharp output
/// on high-density displays. Never fails: out-of-range numeric input is
/// clamped, not rejected.
#[tracing::instrument(skip(source))]
pub fn render(
    source: Option<&SourceImage>,
    spec: &mut TargetSpec,
    pixel_density: f64,
    for_export: bool,
) -> Surface {
    spec.width = spec.width.clamp(MIN_TARGET_DIM, MAX_TARGET_DIM);
    spec.height = spec.height.clamp(MIN_TARGET_DIM, MAX_TARGET_DIM);

    let density = if pixel_density.is_finite() && pixel_density > 0.0 {
        pixel_density
    } else {
        1.0
    };

    let logical_w = f64::from(spec.width);
    let logical_h = f64::from(spec.height);
    let mut surface = Surface::new(
        (logical_w * density).round() as u32,
        (logical_h * density).round() as u32,
    );

    if spec.background == BackgroundMode::Color {
        surface.fill(spec.background_rgb());
    }

    if let Some(src) = source {
        draw_source(&mut surface, src, spec, logical_w, logical_h, density);
    }

    if !for_export {
        let thickness = (density.round() as u32).max(1);
        surface.stroke_border(thickness, PREVIEW_BORDER_COLOR);
    }

    surface
}

/// Export render: exactly `width × height` physical pixels, no density
/// multiplier and no preview border, so the downloaded file's dimensions
/// match the entered target regardless of display density.
pub fn render_for_export(source: Option<&SourceImage>, spec: &mut TargetSpec) -> Surface {
    render(source, spec, 1.0, true)
}

fn draw_source(
    surface: &mut Surface,
    src: &SourceImage,
    spec: &TargetSpec,
    logical_w: f64,
    logical_h: f64,
    density: f64,
) {
    let placement = resolve_placement(
        f64::from(src.width),
        f64::from(src.height),
        logical_w,
        logical_h,
        spec.fit,
    );

    let draw_w = ((placement.width() * density).round() as u32).max(1);
    let draw_h = ((placement.height() * density).round() as u32).max(1);
    let dst_x = (placement.x0 * density).round() as i64;
    let dst_y = (placement.y0 * density).round() as i64;

    let Some(pixels) =
        image::RgbaImage::from_raw(src.width, src.height, src.rgba8_premul.as_ref().clone())
    else {
        return; // malformed source buffer, nothing to draw
    };

    if draw_w == src.width && draw_h == src.height {
        surface.blit_over(pixels.as_raw(), draw_w, draw_h, dst_x, dst_y);
        return;
    }

    let resampled = image::imageops::resize(&pixels, draw_w, draw_h, FilterType::Triangle);
    surface.blit_over(resampled.as_raw(), draw_w, draw_h, dst_x, dst_y);
}
