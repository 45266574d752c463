//! Asset registry resource.
//!
//! Maps symbolic names to sound, music and texture files relative to the
//! asset root. Registration only records the path; files are checked lazily
//! with [`AssetStore::missing_files`] and loaded by whoever consumes them.
//!
//! Re-registering a name replaces the previous entry (last write wins).

use bevy_ecs::prelude::Resource;
use log::{debug, info, warn};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

/// Kind of resource an entry points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Sound,
    Music,
    Texture,
}

/// A registered resource: its kind and path relative to the asset root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    pub kind: AssetKind,
    pub path: String,
}

/// Registry of every asset the game knows about, keyed by symbolic name.
#[derive(Resource, Debug, Default)]
pub struct AssetStore {
    entries: FxHashMap<String, AssetEntry>,
    disposed: bool,
}

impl AssetStore {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sound effect. Returns the entry it replaced, if any.
    pub fn register_sound(
        &mut self,
        name: impl Into<String>,
        path: impl Into<String>,
    ) -> Option<AssetEntry> {
        self.register(name, AssetKind::Sound, path)
    }

    /// Register a music track. Returns the entry it replaced, if any.
    pub fn register_music(
        &mut self,
        name: impl Into<String>,
        path: impl Into<String>,
    ) -> Option<AssetEntry> {
        self.register(name, AssetKind::Music, path)
    }

    /// Register a texture. Returns the entry it replaced, if any.
    pub fn register_texture(
        &mut self,
        name: impl Into<String>,
        path: impl Into<String>,
    ) -> Option<AssetEntry> {
        self.register(name, AssetKind::Texture, path)
    }

    /// Register an entry of any kind.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        kind: AssetKind,
        path: impl Into<String>,
    ) -> Option<AssetEntry> {
        let name = name.into();
        let entry = AssetEntry {
            kind,
            path: path.into(),
        };
        if self.disposed {
            warn!("Registering asset '{}' after the registry was disposed", name);
        }
        debug!("Registering {:?} '{}' -> {}", entry.kind, name, entry.path);
        let previous = self.entries.insert(name.clone(), entry);
        if let Some(prev) = &previous {
            let current = &self.entries[&name];
            if prev != current {
                warn!(
                    "Asset '{}' re-registered: {:?} {} -> {:?} {}",
                    name, prev.kind, prev.path, current.kind, current.path
                );
            }
        }
        previous
    }

    /// Look up an entry by name.
    pub fn get(&self, name: impl AsRef<str>) -> Option<&AssetEntry> {
        self.entries.get(name.as_ref())
    }

    /// Relative path registered under `name`.
    pub fn path(&self, name: impl AsRef<str>) -> Option<&str> {
        self.get(name).map(|e| e.path.as_str())
    }

    pub fn contains(&self, name: impl AsRef<str>) -> bool {
        self.entries.contains_key(name.as_ref())
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries of the given kind.
    pub fn count(&self, kind: AssetKind) -> usize {
        self.entries.values().filter(|e| e.kind == kind).count()
    }

    /// Names registered under `kind`, sorted.
    pub fn names(&self, kind: AssetKind) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, e)| e.kind == kind)
            .map(|(n, _)| n.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Full path of `name` below `root`.
    pub fn resolve(&self, name: impl AsRef<str>, root: impl AsRef<Path>) -> Option<PathBuf> {
        self.path(name).map(|p| root.as_ref().join(p))
    }

    /// Names whose file does not exist below `root`, sorted.
    pub fn missing_files(&self, root: impl AsRef<Path>) -> Vec<&str> {
        let root = root.as_ref();
        let mut missing: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, e)| !root.join(&e.path).is_file())
            .map(|(n, _)| n.as_str())
            .collect();
        missing.sort_unstable();
        missing
    }

    /// Whether [`AssetStore::dispose_all`] has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Release every entry. Returns how many were released; a second call
    /// releases nothing.
    pub fn dispose_all(&mut self) -> usize {
        let released = self.entries.len();
        self.entries.clear();
        if !self.disposed {
            info!("Disposed {} assets", released);
        }
        self.disposed = true;
        released
    }
}

/// The game's fixed asset table: (name, kind, path relative to the asset root).
pub const DEFAULT_ASSETS: &[(&str, AssetKind, &str)] = &[
    // Sound effects
    ("wrong-answer", AssetKind::Sound, "sounds/wrong-answer.wav"),
    ("correct-answer", AssetKind::Sound, "sounds/correct-answer.wav"),
    ("player-death", AssetKind::Sound, "sounds/player-death.wav"),
    ("button-click", AssetKind::Sound, "sounds/button-click.wav"),
    // Background music
    ("music0", AssetKind::Music, "music/music0.mp3"),
    ("music1", AssetKind::Music, "music/music1.mp3"),
    ("music2", AssetKind::Music, "music/music2.mp3"),
    // Level pack logos
    ("grassyJourney-logo", AssetKind::Texture, "textures/Grassy-Journey.png"),
    ("snowyPlains-logo", AssetKind::Texture, "textures/Snowy-Plains.png"),
    // Screens
    ("options-logo", AssetKind::Texture, "textures/options-logo.png"),
    ("helpscreen", AssetKind::Texture, "textures/helpScreen.png"),
    ("menuBackground", AssetKind::Texture, "textures/bg_castle.png"),
    // Main menu
    ("playButton", AssetKind::Texture, "textures/play.png"),
    ("optionsButton", AssetKind::Texture, "textures/options.png"),
    ("helpButton", AssetKind::Texture, "textures/help.png"),
    ("problematicLogo", AssetKind::Texture, "textures/Problematic.png"),
    // Math screen
    ("mathscreenBackground", AssetKind::Texture, "textures/chalkboard.jpg"),
];

/// Register every entry of [`DEFAULT_ASSETS`].
pub fn register_default_assets(store: &mut AssetStore) {
    for (name, kind, path) in DEFAULT_ASSETS {
        store.register(*name, *kind, *path);
    }
    info!(
        "Registered {} sounds, {} music tracks, {} textures",
        store.count(AssetKind::Sound),
        store.count(AssetKind::Music),
        store.count(AssetKind::Texture)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_has_seventeen_unique_entries() {
        let mut store = AssetStore::new();
        register_default_assets(&mut store);
        assert_eq!(store.len(), 17);
        assert_eq!(store.count(AssetKind::Sound), 4);
        assert_eq!(store.count(AssetKind::Music), 3);
        assert_eq!(store.count(AssetKind::Texture), 10);
    }

    #[test]
    fn test_registering_table_twice_is_idempotent() {
        let mut store = AssetStore::new();
        register_default_assets(&mut store);
        register_default_assets(&mut store);
        assert_eq!(store.len(), 17);
        assert_eq!(store.path("music1"), Some("music/music1.mp3"));
    }

    #[test]
    fn test_last_write_wins() {
        let mut store = AssetStore::new();
        assert!(store.register_sound("click", "a.wav").is_none());
        let prev = store.register_texture("click", "b.png").unwrap();
        assert_eq!(prev.kind, AssetKind::Sound);
        assert_eq!(prev.path, "a.wav");
        let entry = store.get("click").unwrap();
        assert_eq!(entry.kind, AssetKind::Texture);
        assert_eq!(entry.path, "b.png");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_names_sorted_by_kind() {
        let mut store = AssetStore::new();
        register_default_assets(&mut store);
        assert_eq!(store.names(AssetKind::Music), vec!["music0", "music1", "music2"]);
    }

    #[test]
    fn test_resolve_joins_root() {
        let mut store = AssetStore::new();
        store.register_texture("logo", "textures/logo.png");
        assert_eq!(
            store.resolve("logo", "assets"),
            Some(PathBuf::from("assets/textures/logo.png"))
        );
        assert_eq!(store.resolve("nope", "assets"), None);
    }

    #[test]
    fn test_missing_files_reports_absent_paths() {
        let dir = std::env::temp_dir().join("problematic_assetstore_missing");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("sounds")).unwrap();
        std::fs::write(dir.join("sounds/here.wav"), b"RIFF").unwrap();

        let mut store = AssetStore::new();
        store.register_sound("here", "sounds/here.wav");
        store.register_sound("gone", "sounds/gone.wav");
        assert_eq!(store.missing_files(&dir), vec!["gone"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_dispose_all_releases_once() {
        let mut store = AssetStore::new();
        register_default_assets(&mut store);
        assert_eq!(store.dispose_all(), 17);
        assert!(store.is_empty());
        assert!(store.is_disposed());
        assert_eq!(store.dispose_all(), 0);
    }
}
