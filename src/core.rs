/// Inclusive bounds for requested output dimensions. A UI sanity bound, not
/// a mathematical necessity; both ends are enforced by [`clamp_target_dim`].
pub const MIN_TARGET_DIM: u32 = 1;
pub const MAX_TARGET_DIM: u32 = 8000;

/// Normalize a requested dimension: round to nearest, clamp into
/// `[MIN_TARGET_DIM, MAX_TARGET_DIM]`. Non-finite input maps to the minimum.
pub fn clamp_target_dim(requested: f64) -> u32 {
    if !requested.is_finite() {
        return MIN_TARGET_DIM;
    }
    requested
        .round()
        .clamp(f64::from(MIN_TARGET_DIM), f64::from(MAX_TARGET_DIM)) as u32
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Jpeg,
    Webp,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Webp => "webp",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Webp => "image/webp",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Scale-to-contain: the whole source stays visible, uncovered margins
    /// show the background.
    Fit,
    /// Scale-to-cover: the target is fully covered, source overflow is
    /// cropped at the edges.
    Fill,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundMode {
    Transparent,
    Color,
}

/// Straight (non-premultiplied) RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
    };

    /// Parse `#rrggbb` or `#rgb` (case-insensitive). Anything else is `None`.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let digits = s.trim().strip_prefix('#')?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            6 => {
                let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
                let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
                let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
                Some(Self { r, g, b })
            }
            3 => {
                let expand = |d: &str| -> Option<u8> {
                    let v = u8::from_str_radix(d, 16).ok()?;
                    Some(v * 17)
                };
                Some(Self {
                    r: expand(&digits[0..1])?,
                    g: expand(&digits[1..2])?,
                    b: expand(&digits[2..3])?,
                })
            }
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Output parameters for one render: canvas size, encoding, fit policy and
/// background. `width`/`height` are always clamped integers in
/// `[MIN_TARGET_DIM, MAX_TARGET_DIM]`; the compositor writes its clamp back
/// here so UI and stored state match what was actually rendered.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TargetSpec {
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub fit: FitMode,
    pub background: BackgroundMode,
    pub background_color: String, // "#rrggbb"
}

impl Default for TargetSpec {
    fn default() -> Self {
        Self {
            width: MIN_TARGET_DIM,
            height: MIN_TARGET_DIM,
            format: OutputFormat::Png,
            fit: FitMode::Fit,
            background: BackgroundMode::Transparent,
            background_color: Rgb::WHITE.to_hex(),
        }
    }
}

impl TargetSpec {
    /// The effective fill color: parsed background color, white when the
    /// string is empty or unparsable.
    pub fn background_rgb(&self) -> Rgb {
        Rgb::parse_hex(&self.background_color).unwrap_or(Rgb::WHITE)
    }
}
