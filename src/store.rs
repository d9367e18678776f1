use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::TargetSpec,
    error::{ReframeError, ReframeResult},
    preset::{Preset, PresetCollection},
};

/// The single fixed key the serialized preset array lives under.
pub const PRESETS_STORAGE_KEY: &str = "reframe.presets";

/// Durable string key-value storage. The seam for tests and for whatever
/// the embedding application uses (browser storage, a settings file, ...).
pub trait KeyValueStore {
    /// `None` for absent keys and for unreadable backing storage alike.
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> ReframeResult<()>;
}

/// In-memory store; also the degraded mode when durable storage fails.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> ReframeResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One file per key inside a directory.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> ReframeResult<()> {
        fs::create_dir_all(&self.dir).map_err(|err| {
            ReframeError::store(format!("create store dir '{}': {err}", self.dir.display()))
        })?;
        let path = self.path_for(key);
        fs::write(&path, value)
            .map_err(|err| ReframeError::store(format!("write store '{}': {err}", path.display())))?;
        Ok(())
    }
}

/// The preset collection bound to its durable storage. Loaded once at
/// session start; every mutation persists afterward. Storage failures are
/// logged and swallowed, degrading to in-memory presets for the session.
pub struct PresetStore<S: KeyValueStore> {
    store: S,
    presets: PresetCollection,
}

impl<S: KeyValueStore> PresetStore<S> {
    pub fn load(store: S) -> Self {
        let presets = store
            .get(PRESETS_STORAGE_KEY)
            .map(|text| PresetCollection::from_json(&text))
            .unwrap_or_default();
        Self { store, presets }
    }

    pub fn presets(&self) -> &PresetCollection {
        &self.presets
    }

    /// Snapshot the spec under `name`. Returns `false` (and does not
    /// persist) when the trimmed name is empty.
    pub fn save(&mut self, name: &str, spec: &TargetSpec) -> bool {
        if !self.presets.upsert(Preset::from_spec(name, spec)) {
            return false;
        }
        self.persist();
        true
    }

    /// Resolve a preset back into a spec, with schema defaults already
    /// applied for fields the stored entry predates.
    pub fn apply(&self, name: &str) -> Option<TargetSpec> {
        self.presets.find(name).map(Preset::apply)
    }

    pub fn delete(&mut self, name: &str) -> bool {
        if !self.presets.remove(name) {
            return false;
        }
        self.persist();
        true
    }

    fn persist(&mut self) {
        let json = match self.presets.to_json() {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(%err, "preset serialization failed; presets stay in-memory");
                return;
            }
        };
        if let Err(err) = self.store.set(PRESETS_STORAGE_KEY, &json) {
            tracing::warn!(%err, "preset persistence failed; presets stay in-memory");
        }
    }
}

/// Preset store backed by files under `dir`.
pub fn file_preset_store(dir: impl AsRef<Path>) -> PresetStore<JsonFileStore> {
    PresetStore::load(JsonFileStore::new(dir.as_ref()))
}
