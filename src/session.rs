use crate::{
    compositor,
    core::{BackgroundMode, FitMode, OutputFormat, Rgb, TargetSpec, clamp_target_dim},
    error::ReframeResult,
    export::{self, ExportArtifact},
    preset::PresetCollection,
    sampler,
    source::{SourceImage, decode_source},
    store::{KeyValueStore, PresetStore},
    surface::Surface,
};

/// Live editing state: the loaded source, the current target spec, and the
/// preview surface kept in sync with them.
///
/// There is no implicit dependency tracking: every setter clamps its input,
/// updates the spec, and unconditionally re-renders the preview. A new
/// image load replaces the source wholesale and supersedes any interest in
/// a prior one.
pub struct Session<S: KeyValueStore> {
    source: Option<SourceImage>,
    spec: TargetSpec,
    pixel_density: f64,
    dims_set: bool,
    preview: Surface,
    presets: PresetStore<S>,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(store: S) -> Self {
        let mut spec = TargetSpec::default();
        let preview = compositor::render(None, &mut spec, 1.0, false);
        Self {
            source: None,
            spec,
            pixel_density: 1.0,
            dims_set: false,
            preview,
            presets: PresetStore::load(store),
        }
    }

    pub fn spec(&self) -> &TargetSpec {
        &self.spec
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    pub fn preview(&self) -> &Surface {
        &self.preview
    }

    pub fn presets(&self) -> &PresetCollection {
        self.presets.presets()
    }

    /// Decode and adopt a new source image. On the first load (or until a
    /// dimension is set explicitly) the target defaults to the image's
    /// natural dimensions, clamped. Decode failure leaves every piece of
    /// state untouched.
    pub fn load_image(&mut self, bytes: &[u8], file_name: Option<&str>) -> ReframeResult<()> {
        let src = decode_source(bytes, file_name)?;
        if !self.dims_set {
            self.spec.width = clamp_target_dim(f64::from(src.width));
            self.spec.height = clamp_target_dim(f64::from(src.height));
            self.dims_set = true;
        }
        tracing::debug!(width = src.width, height = src.height, "source image loaded");
        self.source = Some(src);
        self.rerender();
        Ok(())
    }

    pub fn set_target_width(&mut self, requested: f64) {
        self.spec.width = clamp_target_dim(requested);
        self.dims_set = true;
        self.rerender();
    }

    pub fn set_target_height(&mut self, requested: f64) {
        self.spec.height = clamp_target_dim(requested);
        self.dims_set = true;
        self.rerender();
    }

    pub fn set_format(&mut self, format: OutputFormat) {
        self.spec.format = format;
        self.rerender();
    }

    pub fn set_fit(&mut self, fit: FitMode) {
        self.spec.fit = fit;
        self.rerender();
    }

    pub fn set_background(&mut self, background: BackgroundMode) {
        self.spec.background = background;
        self.rerender();
    }

    pub fn set_background_color(&mut self, color: impl Into<String>) {
        self.spec.background_color = color.into();
        self.rerender();
    }

    pub fn set_pixel_density(&mut self, density: f64) {
        self.pixel_density = if density.is_finite() && density > 0.0 {
            density
        } else {
            1.0
        };
        self.rerender();
    }

    /// Sample the preview under the pointer and adopt the result as the
    /// background color (switching to color mode).
    pub fn pick_color(&mut self, pointer: (f64, f64), displayed: (f64, f64)) -> Rgb {
        let picked = sampler::sample_color(&self.preview, pointer, displayed);
        self.spec.background_color = picked.to_hex();
        self.spec.background = BackgroundMode::Color;
        self.rerender();
        picked
    }

    pub fn save_preset(&mut self, name: &str) -> bool {
        self.presets.save(name, &self.spec)
    }

    /// Adopt a stored preset as the current spec. `false` when absent.
    pub fn apply_preset(&mut self, name: &str) -> bool {
        let Some(spec) = self.presets.apply(name) else {
            return false;
        };
        self.spec = spec;
        self.dims_set = true;
        self.rerender();
        true
    }

    pub fn delete_preset(&mut self, name: &str) -> bool {
        self.presets.delete(name)
    }

    /// Render at export resolution and encode. The artifact's dimensions
    /// match the entered target exactly, independent of preview density.
    pub fn export(&mut self) -> ReframeResult<ExportArtifact> {
        let surface = compositor::render_for_export(self.source.as_ref(), &mut self.spec);
        let bytes = export::encode(&surface, self.spec.format)?;
        let file_name = export::export_file_name(
            self.source.as_ref().and_then(|s| s.file_name.as_deref()),
            self.spec.width,
            self.spec.height,
            self.spec.format,
        );
        Ok(ExportArtifact {
            bytes,
            file_name,
            mime_type: self.spec.format.mime_type(),
        })
    }

    fn rerender(&mut self) {
        self.preview = compositor::render(self.source.as_ref(), &mut self.spec, self.pixel_density, false);
    }
}
