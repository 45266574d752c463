//! Level definitions and the level manager resource.
//!
//! Levels are grouped into packs described by a single JSON document:
//!
//! ```json
//! { "packs": [
//!     { "id": "grassyJourney", "name": "Grassy Journey", "logo": "grassyJourney-logo",
//!       "levels": [ { "id": 1, "name": "First Steps", "map": "maps/grassy1.tmx" } ] }
//! ] }
//! ```
//!
//! Pack logos refer to textures by their symbolic name, so the asset registry
//! must be filled before levels are loaded.

use crate::resources::assetstore::{AssetKind, AssetStore};
use bevy_ecs::prelude::Resource;
use log::{info, warn};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A single playable level.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Level {
    pub id: u32,
    pub name: String,
    /// Map file relative to the asset root.
    pub map: String,
}

/// A themed group of levels.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LevelPack {
    pub id: String,
    pub name: String,
    /// Texture name of the pack's logo.
    pub logo: String,
    pub levels: Vec<Level>,
}

#[derive(Debug, Deserialize, Serialize)]
struct LevelIndex {
    packs: Vec<LevelPack>,
}

#[derive(Debug)]
pub enum LevelError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    /// The index defines no packs.
    Empty,
    DuplicatePack(String),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::Io { path, source } => {
                write!(f, "cannot read level index {}: {}", path.display(), source)
            }
            LevelError::Parse(e) => write!(f, "invalid level index: {}", e),
            LevelError::Empty => write!(f, "level index defines no packs"),
            LevelError::DuplicatePack(id) => write!(f, "level pack '{}' defined twice", id),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Io { source, .. } => Some(source),
            LevelError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

/// Owns every loaded level pack.
#[derive(Resource, Debug)]
pub struct LevelManager {
    index_path: PathBuf,
    packs: Vec<LevelPack>,
    disposed: bool,
}

impl LevelManager {
    /// Create a manager reading its index from `index_path`.
    pub fn new(index_path: impl Into<PathBuf>) -> Self {
        Self {
            index_path: index_path.into(),
            packs: Vec::new(),
            disposed: false,
        }
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// Load every pack from the index file. Returns the number of levels.
    pub fn load_levels(&mut self, assets: &AssetStore) -> Result<usize, LevelError> {
        let json = std::fs::read_to_string(&self.index_path).map_err(|source| LevelError::Io {
            path: self.index_path.clone(),
            source,
        })?;
        self.load_from_str(&json, assets)
    }

    /// Load every pack from an in-memory index document.
    pub fn load_from_str(&mut self, json: &str, assets: &AssetStore) -> Result<usize, LevelError> {
        let index: LevelIndex = serde_json::from_str(json).map_err(LevelError::Parse)?;
        if index.packs.is_empty() {
            return Err(LevelError::Empty);
        }
        let mut seen = FxHashSet::default();
        for pack in &index.packs {
            if !seen.insert(pack.id.as_str()) {
                return Err(LevelError::DuplicatePack(pack.id.clone()));
            }
            match assets.get(&pack.logo) {
                Some(entry) if entry.kind == AssetKind::Texture => {}
                _ => warn!(
                    "Level pack '{}' uses unregistered logo texture '{}'",
                    pack.id, pack.logo
                ),
            }
        }
        self.packs = index.packs;
        let total = self.total_levels();
        info!("Loaded {} level packs with {} levels", self.packs.len(), total);
        Ok(total)
    }

    pub fn packs(&self) -> &[LevelPack] {
        &self.packs
    }

    pub fn pack(&self, id: &str) -> Option<&LevelPack> {
        self.packs.iter().find(|p| p.id == id)
    }

    /// Level at `index` (zero-based) inside the pack `pack_id`.
    pub fn level(&self, pack_id: &str, index: usize) -> Option<&Level> {
        self.pack(pack_id).and_then(|p| p.levels.get(index))
    }

    pub fn total_levels(&self) -> usize {
        self.packs.iter().map(|p| p.levels.len()).sum()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Drop every loaded pack. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.packs.clear();
        self.disposed = true;
        info!("Level manager disposed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::assetstore::register_default_assets;

    const INDEX: &str = r#"{ "packs": [
        { "id": "grassyJourney", "name": "Grassy Journey", "logo": "grassyJourney-logo",
          "levels": [ { "id": 1, "name": "One", "map": "maps/g1.tmx" },
                      { "id": 2, "name": "Two", "map": "maps/g2.tmx" } ] },
        { "id": "snowyPlains", "name": "Snowy Plains", "logo": "snowyPlains-logo",
          "levels": [ { "id": 1, "name": "Frost", "map": "maps/s1.tmx" } ] }
    ] }"#;

    fn assets() -> AssetStore {
        let mut store = AssetStore::new();
        register_default_assets(&mut store);
        store
    }

    #[test]
    fn test_load_from_str_counts_levels() {
        let mut levels = LevelManager::new("unused.json");
        assert_eq!(levels.load_from_str(INDEX, &assets()).unwrap(), 3);
        assert_eq!(levels.packs().len(), 2);
        assert_eq!(levels.level("grassyJourney", 1).unwrap().name, "Two");
        assert!(levels.level("snowyPlains", 1).is_none());
        assert!(levels.pack("lavaLand").is_none());
    }

    #[test]
    fn test_empty_index_is_rejected() {
        let mut levels = LevelManager::new("unused.json");
        let err = levels.load_from_str(r#"{ "packs": [] }"#, &assets()).unwrap_err();
        assert!(matches!(err, LevelError::Empty));
    }

    #[test]
    fn test_duplicate_pack_is_rejected() {
        let json = r#"{ "packs": [
            { "id": "a", "name": "A", "logo": "x", "levels": [] },
            { "id": "a", "name": "B", "logo": "y", "levels": [] } ] }"#;
        let mut levels = LevelManager::new("unused.json");
        match levels.load_from_str(json, &assets()) {
            Err(LevelError::DuplicatePack(id)) => assert_eq!(id, "a"),
            other => panic!("expected duplicate pack error, got {:?}", other),
        }
        assert!(levels.packs().is_empty());
    }

    #[test]
    fn test_malformed_index_is_parse_error() {
        let mut levels = LevelManager::new("unused.json");
        let err = levels.load_from_str("{ packs: ", &assets()).unwrap_err();
        assert!(matches!(err, LevelError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("problematic_levels_missing.json");
        let _ = std::fs::remove_file(&path);
        let mut levels = LevelManager::new(&path);
        assert!(matches!(levels.load_levels(&assets()), Err(LevelError::Io { .. })));
    }

    #[test]
    fn test_dispose_clears_packs_once() {
        let mut levels = LevelManager::new("unused.json");
        levels.load_from_str(INDEX, &assets()).unwrap();
        levels.dispose();
        levels.dispose();
        assert!(levels.is_disposed());
        assert_eq!(levels.total_levels(), 0);
    }
}
