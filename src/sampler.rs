use crate::{core::Rgb, surface::Surface};

/// Map an on-screen pointer position (CSS pixels) to surface pixel indices.
///
/// The ratio `surface_px / displayed_css_px` absorbs both the pixel-density
/// multiplier and any CSS scaling of the displayed element. Coordinates are
/// floored to integer indices and clamped to the surface bounds; a
/// degenerate displayed size falls back to a 1:1 mapping.
pub fn pointer_to_pixel(
    pointer: (f64, f64),
    surface_w: u32,
    surface_h: u32,
    displayed: (f64, f64),
) -> (u32, u32) {
    let ratio_x = axis_ratio(surface_w, displayed.0);
    let ratio_y = axis_ratio(surface_h, displayed.1);

    let x = (pointer.0 * ratio_x).floor().max(0.0) as u32;
    let y = (pointer.1 * ratio_y).floor().max(0.0) as u32;
    (x.min(surface_w.saturating_sub(1)), y.min(surface_h.saturating_sub(1)))
}

fn axis_ratio(surface_px: u32, displayed_css: f64) -> f64 {
    if displayed_css.is_finite() && displayed_css > 0.0 {
        f64::from(surface_px) / displayed_css
    } else {
        1.0
    }
}

/// Read the color under the pointer. Alpha is discarded: a picked color is
/// always treated as a fully opaque background.
pub fn sample_color(surface: &Surface, pointer: (f64, f64), displayed: (f64, f64)) -> Rgb {
    let (x, y) = pointer_to_pixel(pointer, surface.width(), surface.height(), displayed);
    let px = surface.pixel_straight(x, y).unwrap_or([0, 0, 0, 0]);
    Rgb {
        r: px[0],
        g: px[1],
        b: px[2],
    }
}
