//! Game configuration resource.
//!
//! Manages launch settings loaded from an INI configuration file. Provides
//! defaults for safe startup; a missing file is not an error for callers
//! that choose to ignore it.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 1280
//! height = 720
//! vsync = true
//! target_fps = 60
//!
//! [paths]
//! assets = ./assets
//! preferences = ./preferences.ini
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

/// Default safe values for startup
const DEFAULT_WINDOW_WIDTH: u32 = 1280;
const DEFAULT_WINDOW_HEIGHT: u32 = 720;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_VSYNC: bool = true;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";
const DEFAULT_ASSETS_DIR: &str = "./assets";
const DEFAULT_PREFERENCES_PATH: &str = "./preferences.ini";
const LEVEL_INDEX_FILE: &str = "levels/levels.json";

/// Game configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Window width in pixels.
    pub window_width: u32,
    /// Window height in pixels.
    pub window_height: u32,
    /// Target frames per second.
    pub target_fps: u32,
    /// Enable vertical sync.
    pub vsync: bool,
    /// Root directory every asset path is relative to.
    pub assets_dir: PathBuf,
    /// Persisted player preferences.
    pub preferences_path: PathBuf,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            vsync: DEFAULT_VSYNC,
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            preferences_path: PathBuf::from(DEFAULT_PREFERENCES_PATH),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [window] section
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }
        if let Some(vsync) = config.getbool("window", "vsync").ok().flatten() {
            self.vsync = vsync;
        }

        // [paths] section
        if let Some(assets) = config.get("paths", "assets") {
            self.assets_dir = PathBuf::from(assets);
        }
        if let Some(prefs) = config.get("paths", "preferences") {
            self.preferences_path = PathBuf::from(prefs);
        }

        info!(
            "Loaded config: {}x{} window, fps={}, vsync={}, assets={:?}, preferences={:?}",
            self.window_width,
            self.window_height,
            self.target_fps,
            self.vsync,
            self.assets_dir,
            self.preferences_path
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [window] section
        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));
        config.set("window", "vsync", Some(self.vsync.to_string()));

        // [paths] section
        config.set(
            "paths",
            "assets",
            Some(self.assets_dir.to_string_lossy().into_owned()),
        );
        config.set(
            "paths",
            "preferences",
            Some(self.preferences_path.to_string_lossy().into_owned()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Set window size.
    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_width = width;
        self.window_height = height;
    }

    /// Get the window size.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    /// Location of the level index below the asset root.
    pub fn level_index_path(&self) -> PathBuf {
        self.assets_dir.join(LEVEL_INDEX_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::new();
        assert_eq!(config.window_size(), (1280, 720));
        assert_eq!(config.target_fps, 60);
        assert_eq!(
            config.level_index_path(),
            PathBuf::from("./assets/levels/levels.json")
        );
    }

    #[test]
    fn test_missing_file_keeps_defaults() {
        let mut config = GameConfig::with_path("/nonexistent/problematic/config.ini");
        assert!(config.load_from_file().is_err());
        assert_eq!(config.window_size(), (1280, 720));
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join("problematic_gameconfig_test.ini");
        let mut config = GameConfig::with_path(&path);
        config.set_window_size(800, 600);
        config.assets_dir = PathBuf::from("/opt/problematic/assets");
        config.save_to_file().unwrap();

        let mut loaded = GameConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        assert_eq!(loaded.window_size(), (800, 600));
        assert_eq!(loaded.assets_dir, PathBuf::from("/opt/problematic/assets"));
        let _ = std::fs::remove_file(&path);
    }
}
