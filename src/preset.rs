use crate::core::{BackgroundMode, FitMode, OutputFormat, Rgb, TargetSpec};

fn default_format() -> OutputFormat {
    OutputFormat::Png
}

fn default_fit() -> FitMode {
    FitMode::Fit
}

fn default_background() -> BackgroundMode {
    BackgroundMode::Transparent
}

fn default_background_color() -> String {
    Rgb::WHITE.to_hex()
}

/// Named snapshot of a [`TargetSpec`]. The serde defaults cover presets
/// saved by an older schema that lacked the newer fields.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Preset {
    pub name: String,
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_format")]
    pub format: OutputFormat,
    #[serde(default = "default_fit")]
    pub fit: FitMode,
    #[serde(default = "default_background")]
    pub background: BackgroundMode,
    #[serde(default = "default_background_color")]
    pub background_color: String,
}

impl Preset {
    pub fn from_spec(name: impl Into<String>, spec: &TargetSpec) -> Self {
        Self {
            name: name.into(),
            width: spec.width,
            height: spec.height,
            format: spec.format,
            fit: spec.fit,
            background: spec.background,
            background_color: spec.background_color.clone(),
        }
    }

    /// Reconstruct the spec this preset captured.
    pub fn apply(&self) -> TargetSpec {
        TargetSpec {
            width: self.width,
            height: self.height,
            format: self.format,
            fit: self.fit,
            background: self.background,
            background_color: self.background_color.clone(),
        }
    }
}

/// Ordered preset list. Insertion order is preserved; saving under an
/// existing name replaces that entry in place rather than appending.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PresetCollection(Vec<Preset>);

impl PresetCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a persisted collection. Missing, corrupt, or non-array text
    /// yields an empty collection; persistence is never fatal.
    pub fn from_json(text: &str) -> Self {
        serde_json::from_str(text).unwrap_or_default()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Indexed upsert: replace the preset with the same (trimmed) name at
    /// its existing position, else append. Returns `false` without touching
    /// the collection when the trimmed name is empty.
    pub fn upsert(&mut self, preset: Preset) -> bool {
        let name = preset.name.trim().to_string();
        if name.is_empty() {
            return false;
        }
        let preset = Preset { name, ..preset };
        match self.position(&preset.name) {
            Some(idx) => self.0[idx] = preset,
            None => self.0.push(preset),
        }
        true
    }

    /// Remove every preset matching `name`. Absent names are a silent no-op.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.0.len();
        let probe = name.trim();
        self.0.retain(|p| p.name.trim() != probe);
        self.0.len() != before
    }

    pub fn find(&self, name: &str) -> Option<&Preset> {
        self.position(name).map(|idx| &self.0[idx])
    }

    fn position(&self, name: &str) -> Option<usize> {
        let probe = name.trim();
        self.0.iter().position(|p| p.name.trim() == probe)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(width: u32, height: u32) -> TargetSpec {
        TargetSpec {
            width,
            height,
            ..TargetSpec::default()
        }
    }

    #[test]
    fn upsert_replaces_in_place_preserving_position() {
        let mut c = PresetCollection::new();
        assert!(c.upsert(Preset::from_spec("Social", &spec(800, 420))));
        assert!(c.upsert(Preset::from_spec("Banner", &spec(1200, 300))));
        assert!(c.upsert(Preset::from_spec("Social", &spec(1080, 1080))));

        assert_eq!(c.len(), 2);
        let names: Vec<_> = c.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Social", "Banner"]);
        assert_eq!(c.find("Social").unwrap().width, 1080);
    }

    #[test]
    fn upsert_rejects_blank_names() {
        let mut c = PresetCollection::new();
        assert!(!c.upsert(Preset::from_spec("", &spec(10, 10))));
        assert!(!c.upsert(Preset::from_spec("   ", &spec(10, 10))));
        assert!(c.is_empty());
    }

    #[test]
    fn upsert_trims_the_stored_name() {
        let mut c = PresetCollection::new();
        assert!(c.upsert(Preset::from_spec("  Social ", &spec(10, 10))));
        assert_eq!(c.find("Social").unwrap().name, "Social");
        // A later save under the trimmed-equal name hits the same slot.
        assert!(c.upsert(Preset::from_spec("Social", &spec(20, 20))));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut c = PresetCollection::new();
        c.upsert(Preset::from_spec("social", &spec(10, 10)));
        c.upsert(Preset::from_spec("Social", &spec(20, 20)));
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn remove_missing_is_a_noop() {
        let mut c = PresetCollection::new();
        c.upsert(Preset::from_spec("Keep", &spec(10, 10)));
        assert!(!c.remove("Gone"));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn from_json_swallows_corrupt_text() {
        assert!(PresetCollection::from_json("{not json").is_empty());
        assert!(PresetCollection::from_json("\"a string\"").is_empty());
        assert!(PresetCollection::from_json("42").is_empty());
        assert!(PresetCollection::from_json("[]").is_empty());
    }

    #[test]
    fn apply_roundtrips_every_field() {
        let original = TargetSpec {
            width: 640,
            height: 360,
            format: OutputFormat::Webp,
            fit: FitMode::Fill,
            background: BackgroundMode::Color,
            background_color: "#aabbcc".to_string(),
        };
        let preset = Preset::from_spec("HD", &original);
        assert_eq!(preset.apply(), original);
    }

    #[test]
    fn legacy_json_gets_schema_defaults() {
        let legacy = r#"[{"name":"Old","width":320,"height":240}]"#;
        let c = PresetCollection::from_json(legacy);
        let spec = c.find("Old").unwrap().apply();
        assert_eq!(spec.format, OutputFormat::Png);
        assert_eq!(spec.fit, FitMode::Fit);
        assert_eq!(spec.background, BackgroundMode::Transparent);
        assert_eq!(spec.background_color, "#ffffff");
    }

    #[test]
    fn collection_serializes_as_plain_array() {
        let mut c = PresetCollection::new();
        c.upsert(Preset::from_spec("A", &spec(1, 2)));
        let json = c.to_json().unwrap();
        assert!(json.starts_with('['), "{json}");
        let back = PresetCollection::from_json(&json);
        assert_eq!(back, c);
    }
}
