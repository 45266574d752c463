//! Player preferences resource.
//!
//! Preferences are persisted as an INI file next to the game. Loading is
//! strict: a missing, unreadable or malformed file is an error the caller has
//! to handle. Once loaded, [`Preferences::check_defaults`] back-fills any key
//! the file does not define.
//!
//! # File Format
//!
//! ```ini
//! [audio]
//! music = true
//! sound = true
//! music_volume = 0.5
//! sound_volume = 1.0
//!
//! [progress]
//! unlocked_level = 1
//! ```

use bevy_ecs::prelude::Resource;
use configparser::ini::Ini;
use log::{debug, info};
use std::fmt;
use std::path::{Path, PathBuf};

const DEFAULT_PREFERENCES_PATH: &str = "./preferences.ini";

/// Default value for every known key: (section, key, value).
pub const DEFAULT_PREFERENCES: &[(&str, &str, &str)] = &[
    ("audio", "music", "true"),
    ("audio", "sound", "true"),
    ("audio", "music_volume", "0.5"),
    ("audio", "sound_volume", "1.0"),
    ("progress", "unlocked_level", "1"),
];

/// The preferences file could not be used.
#[derive(Debug)]
pub enum PreferencesError {
    /// The file is missing or could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file was read but is not valid INI.
    Parse { path: PathBuf, message: String },
}

impl fmt::Display for PreferencesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreferencesError::Io { path, source } => {
                write!(f, "cannot read preferences {}: {}", path.display(), source)
            }
            PreferencesError::Parse { path, message } => {
                write!(f, "cannot parse preferences {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for PreferencesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PreferencesError::Io { source, .. } => Some(source),
            PreferencesError::Parse { .. } => None,
        }
    }
}

/// Loaded preferences snapshot plus the file it belongs to.
#[derive(Resource, Debug, Clone)]
pub struct Preferences {
    values: Ini,
    path: PathBuf,
}

impl Default for Preferences {
    fn default() -> Self {
        Self::with_path(DEFAULT_PREFERENCES_PATH)
    }
}

impl Preferences {
    /// Empty preferences bound to `path`. Nothing is read until
    /// [`Preferences::load_preferences`] is called.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            values: Ini::new(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the in-memory snapshot with the contents of the file.
    pub fn load_preferences(&mut self) -> Result<(), PreferencesError> {
        let contents =
            std::fs::read_to_string(&self.path).map_err(|source| PreferencesError::Io {
                path: self.path.clone(),
                source,
            })?;
        let mut values = Ini::new();
        values
            .read(contents)
            .map_err(|message| PreferencesError::Parse {
                path: self.path.clone(),
                message,
            })?;
        self.values = values;
        info!("Loaded preferences from {:?}", self.path);
        Ok(())
    }

    /// Fill in every missing key with its default. Returns how many were added.
    pub fn check_defaults(&mut self) -> usize {
        let mut filled = 0;
        for (section, key, value) in DEFAULT_PREFERENCES {
            if self.values.get(section, key).is_none() {
                debug!("Preference [{}] {} missing, using {}", section, key, value);
                self.values.set(section, key, Some(value.to_string()));
                filled += 1;
            }
        }
        filled
    }

    /// Write the snapshot back to its file.
    pub fn save(&self) -> Result<(), String> {
        self.values
            .write(&self.path)
            .map_err(|e| format!("Failed to save preferences file: {}", e))?;
        info!("Saved preferences to {:?}", self.path);
        Ok(())
    }

    /// Create a preferences file holding only the defaults.
    pub fn write_defaults(path: impl Into<PathBuf>) -> Result<(), String> {
        let mut prefs = Self::with_path(path);
        prefs.check_defaults();
        prefs.save()
    }

    /// Raw string value of a key.
    pub fn get(&self, section: &str, key: &str) -> Option<String> {
        self.values.get(section, key)
    }

    pub fn music_enabled(&self) -> bool {
        self.bool_or_default("audio", "music")
    }

    pub fn sound_enabled(&self) -> bool {
        self.bool_or_default("audio", "sound")
    }

    /// Music volume in `0.0..=1.0`.
    pub fn music_volume(&self) -> f32 {
        self.volume_or_default("audio", "music_volume")
    }

    /// Sound effect volume in `0.0..=1.0`.
    pub fn sound_volume(&self) -> f32 {
        self.volume_or_default("audio", "sound_volume")
    }

    /// Highest level the player may start.
    pub fn unlocked_level(&self) -> u32 {
        self.values
            .getuint("progress", "unlocked_level")
            .ok()
            .flatten()
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or_else(|| default_value("progress", "unlocked_level").parse().unwrap_or(1))
    }

    pub fn set_music_enabled(&mut self, enabled: bool) {
        self.values
            .set("audio", "music", Some(enabled.to_string()));
    }

    /// Store the music volume, clamped. NaN and infinities are ignored.
    pub fn set_music_volume(&mut self, volume: f32) {
        if !volume.is_finite() {
            return;
        }
        self.values.set(
            "audio",
            "music_volume",
            Some(volume.clamp(0.0, 1.0).to_string()),
        );
    }

    pub fn set_unlocked_level(&mut self, level: u32) {
        self.values
            .set("progress", "unlocked_level", Some(level.to_string()));
    }

    fn bool_or_default(&self, section: &str, key: &str) -> bool {
        self.values
            .getbool(section, key)
            .ok()
            .flatten()
            .unwrap_or_else(|| default_value(section, key) == "true")
    }

    fn volume_or_default(&self, section: &str, key: &str) -> f32 {
        self.values
            .getfloat(section, key)
            .ok()
            .flatten()
            .map(|v| v as f32)
            .filter(|v| v.is_finite())
            .unwrap_or_else(|| default_value(section, key).parse().unwrap_or(1.0))
            .clamp(0.0, 1.0)
    }
}

fn default_value(section: &str, key: &str) -> &'static str {
    DEFAULT_PREFERENCES
        .iter()
        .find(|(s, k, _)| *s == section && *k == key)
        .map(|(_, _, v)| *v)
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("problematic_preferences_test");
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = temp_file("does_not_exist.ini");
        let _ = std::fs::remove_file(&path);
        let mut prefs = Preferences::with_path(&path);
        let err = prefs.load_preferences().unwrap_err();
        assert!(matches!(err, PreferencesError::Io { .. }));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_check_defaults_fills_only_missing_keys() {
        let path = temp_file("partial.ini");
        std::fs::write(&path, "[audio]\nmusic = false\nmusic_volume = 0.25\n").unwrap();
        let mut prefs = Preferences::with_path(&path);
        prefs.load_preferences().unwrap();
        assert_eq!(prefs.check_defaults(), 3);
        assert!(!prefs.music_enabled());
        assert!((prefs.music_volume() - 0.25).abs() < 1e-6);
        assert!(prefs.sound_enabled());
        assert_eq!(prefs.unlocked_level(), 1);
        assert_eq!(prefs.check_defaults(), 0);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_getters_fall_back_on_garbage_values() {
        let mut prefs = Preferences::with_path(temp_file("unused.ini"));
        prefs.values.set("audio", "music", Some("maybe".to_string()));
        prefs.values.set("audio", "music_volume", Some("loud".to_string()));
        assert!(prefs.music_enabled());
        assert!((prefs.music_volume() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_non_finite_volumes_fall_back_to_defaults() {
        let mut prefs = Preferences::with_path(temp_file("unused.ini"));
        prefs.values.set("audio", "music_volume", Some("NaN".to_string()));
        prefs.values.set("audio", "sound_volume", Some("inf".to_string()));
        assert!((prefs.music_volume() - 0.5).abs() < 1e-6);
        assert_eq!(prefs.sound_volume(), 1.0);

        prefs.set_music_volume(0.2);
        prefs.set_music_volume(f32::NAN);
        assert!((prefs.music_volume() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_unlocked_level_out_of_range_falls_back() {
        let mut prefs = Preferences::with_path(temp_file("unused.ini"));
        prefs
            .values
            .set("progress", "unlocked_level", Some("4294967296".to_string()));
        assert_eq!(prefs.unlocked_level(), 1);
        prefs
            .values
            .set("progress", "unlocked_level", Some("4294967295".to_string()));
        assert_eq!(prefs.unlocked_level(), u32::MAX);
    }

    #[test]
    fn test_volume_is_clamped() {
        let mut prefs = Preferences::with_path(temp_file("unused.ini"));
        prefs.values.set("audio", "sound_volume", Some("3.0".to_string()));
        assert_eq!(prefs.sound_volume(), 1.0);
        prefs.set_music_volume(-2.0);
        assert_eq!(prefs.music_volume(), 0.0);
    }

    #[test]
    fn test_write_defaults_then_load() {
        let path = temp_file("defaults.ini");
        let _ = std::fs::remove_file(&path);
        Preferences::write_defaults(&path).unwrap();
        let mut prefs = Preferences::with_path(&path);
        prefs.load_preferences().unwrap();
        assert_eq!(prefs.check_defaults(), 0);
        assert_eq!(prefs.get("progress", "unlocked_level").as_deref(), Some("1"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_setters_persist_through_save() {
        let path = temp_file("roundtrip.ini");
        let mut prefs = Preferences::with_path(&path);
        prefs.check_defaults();
        prefs.set_music_enabled(false);
        prefs.set_unlocked_level(7);
        prefs.save().unwrap();

        let mut reloaded = Preferences::with_path(&path);
        reloaded.load_preferences().unwrap();
        assert!(!reloaded.music_enabled());
        assert_eq!(reloaded.unlocked_level(), 7);
        let _ = std::fs::remove_file(&path);
    }
}
