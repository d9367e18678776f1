use kurbo::Rect;

use crate::core::FitMode;

/// Scale factor that makes `src` fit entirely inside `target` (letterbox).
pub fn contain_scale(src_w: f64, src_h: f64, target_w: f64, target_h: f64) -> f64 {
    (target_w / src_w).min(target_h / src_h)
}

/// Scale factor that makes `src` cover all of `target` (crop at overflow).
pub fn cover_scale(src_w: f64, src_h: f64, target_w: f64, target_h: f64) -> f64 {
    (target_w / src_w).max(target_h / src_h)
}

/// Placement of the scaled source inside the target canvas, in logical
/// coordinates. Both modes preserve aspect ratio and center the result;
/// under [`FitMode::Fill`] the origin goes negative, which is the crop.
pub fn resolve_placement(
    src_w: f64,
    src_h: f64,
    target_w: f64,
    target_h: f64,
    mode: FitMode,
) -> Rect {
    let src_w = src_w.max(1.0);
    let src_h = src_h.max(1.0);

    let scale = match mode {
        FitMode::Fit => contain_scale(src_w, src_h, target_w, target_h),
        FitMode::Fill => cover_scale(src_w, src_h, target_w, target_h),
    };

    let draw_w = src_w * scale;
    let draw_h = src_h * scale;
    let x0 = (target_w - draw_w) / 2.0;
    let y0 = (target_h - draw_h) / 2.0;
    Rect::new(x0, y0, x0 + draw_w, y0 + draw_h)
}
