#![forbid(unsafe_code)]

pub mod compositor;
pub mod core;
pub mod error;
pub mod export;
pub mod layout;
pub mod preset;
pub mod sampler;
pub mod session;
pub mod source;
pub mod store;
pub mod surface;

pub use crate::compositor::{PREVIEW_BORDER_COLOR, render, render_for_export};
pub use crate::core::{
    BackgroundMode, FitMode, MAX_TARGET_DIM, MIN_TARGET_DIM, OutputFormat, Rgb, TargetSpec,
    clamp_target_dim,
};
pub use crate::error::{ReframeError, ReframeResult};
pub use crate::export::{ExportArtifact, LOSSY_QUALITY, encode, export_file_name};
pub use crate::layout::{contain_scale, cover_scale, resolve_placement};
pub use crate::preset::{Preset, PresetCollection};
pub use crate::sampler::{pointer_to_pixel, sample_color};
pub use crate::session::Session;
pub use crate::source::{SourceImage, decode_source};
pub use crate::store::{
    JsonFileStore, KeyValueStore, MemoryStore, PRESETS_STORAGE_KEY, PresetStore, file_preset_store,
};
pub use crate::surface::Surface;
