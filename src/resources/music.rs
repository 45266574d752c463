//! Background music state.
//!
//! [`MusicManager`] decides *what* should be playing; it never touches an
//! audio device. The host follows [`MusicManager::now_playing`] once per frame
//! (see [`Host::sync_music`](crate::app::Host::sync_music)) and streams
//! the file itself.

use crate::resources::assetstore::{AssetKind, AssetStore};
use crate::resources::preferences::Preferences;
use bevy_ecs::prelude::Resource;
use log::{debug, info, warn};

/// The track that should currently be audible.
#[derive(Debug, Clone, PartialEq)]
pub struct NowPlaying {
    /// Symbolic track name in the [`AssetStore`].
    pub name: String,
    /// Path relative to the asset root.
    pub path: String,
    /// Playback volume in `0.0..=1.0`.
    pub volume: f32,
}

#[derive(Resource, Debug)]
pub struct MusicManager {
    /// (name, path) of every music track, sorted by name.
    tracks: Vec<(String, String)>,
    current: Option<usize>,
    volume: f32,
    enabled: bool,
    disposed: bool,
}

impl MusicManager {
    /// Capture the music tracks registered in `assets`.
    pub fn new(assets: &AssetStore) -> Self {
        let tracks: Vec<(String, String)> = assets
            .names(AssetKind::Music)
            .into_iter()
            .filter_map(|name| assets.path(name).map(|p| (name.to_string(), p.to_string())))
            .collect();
        info!("Music manager ready with {} tracks", tracks.len());
        Self {
            tracks,
            current: None,
            volume: 1.0,
            enabled: true,
            disposed: false,
        }
    }

    /// Follow the audio settings: start a random track if music is on and
    /// nothing plays yet, stop if music is off.
    pub fn apply_preferences(&mut self, prefs: &Preferences) {
        self.enabled = prefs.music_enabled();
        self.set_volume(prefs.music_volume());
        if !self.enabled {
            self.stop();
        } else if self.current.is_none() {
            self.play_random();
        }
    }

    /// Start the named track. Returns false for unknown names or when music
    /// is disabled.
    pub fn play(&mut self, name: &str) -> bool {
        if !self.enabled || self.disposed {
            return false;
        }
        match self.tracks.iter().position(|(n, _)| n == name) {
            Some(index) => {
                self.current = Some(index);
                debug!("Playing music '{}'", name);
                true
            }
            None => false,
        }
    }

    /// Start a random track.
    pub fn play_random(&mut self) -> bool {
        if self.tracks.is_empty() {
            return false;
        }
        let index = fastrand::usize(..self.tracks.len());
        let name = self.tracks[index].0.clone();
        self.play(&name)
    }

    /// Advance to the next track, wrapping around.
    pub fn next_track(&mut self) -> bool {
        if self.tracks.is_empty() {
            return false;
        }
        let next = self.current.map_or(0, |i| (i + 1) % self.tracks.len());
        let name = self.tracks[next].0.clone();
        self.play(&name)
    }

    pub fn stop(&mut self) {
        if self.current.take().is_some() {
            debug!("Music stopped");
        }
    }

    /// Set the volume, clamped to `0.0..=1.0`. NaN and infinities are ignored.
    pub fn set_volume(&mut self, volume: f32) {
        if !volume.is_finite() {
            warn!("Ignoring music volume {}", volume);
            return;
        }
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn now_playing(&self) -> Option<NowPlaying> {
        self.current.map(|i| NowPlaying {
            name: self.tracks[i].0.clone(),
            path: self.tracks[i].1.clone(),
            volume: self.volume,
        })
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Stop playback and forget every track. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.stop();
        self.tracks.clear();
        self.disposed = true;
        info!("Music manager disposed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::assetstore::register_default_assets;

    fn manager() -> MusicManager {
        let mut assets = AssetStore::new();
        register_default_assets(&mut assets);
        MusicManager::new(&assets)
    }

    #[test]
    fn test_new_captures_music_tracks_only() {
        let music = manager();
        assert_eq!(music.track_count(), 3);
        assert!(music.now_playing().is_none());
    }

    #[test]
    fn test_play_unknown_track_fails() {
        let mut music = manager();
        assert!(!music.play("wrong-answer"));
        assert!(music.play("music2"));
        assert_eq!(music.now_playing().unwrap().path, "music/music2.mp3");
    }

    #[test]
    fn test_next_track_wraps() {
        let mut music = manager();
        assert!(music.play("music2"));
        assert!(music.next_track());
        assert_eq!(music.now_playing().unwrap().name, "music0");
    }

    #[test]
    fn test_play_random_picks_a_registered_track() {
        let mut music = manager();
        assert!(music.play_random());
        let name = music.now_playing().unwrap().name;
        assert!(["music0", "music1", "music2"].contains(&name.as_str()));
    }

    #[test]
    fn test_preferences_disable_music() {
        let mut music = manager();
        music.play("music0");
        let mut prefs = Preferences::with_path("unused.ini");
        prefs.check_defaults();
        prefs.set_music_enabled(false);
        music.apply_preferences(&prefs);
        assert!(music.now_playing().is_none());
        assert!(!music.play("music1"));
    }

    #[test]
    fn test_preferences_start_music_with_volume() {
        let mut music = manager();
        let mut prefs = Preferences::with_path("unused.ini");
        prefs.check_defaults();
        prefs.set_music_volume(0.3);
        music.apply_preferences(&prefs);
        let playing = music.now_playing().unwrap();
        assert!((playing.volume - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_non_finite_volume_keeps_previous() {
        let mut music = manager();
        music.set_volume(0.4);
        music.set_volume(f32::NAN);
        assert!((music.volume() - 0.4).abs() < 1e-6);
        music.set_volume(f32::INFINITY);
        assert!((music.volume() - 0.4).abs() < 1e-6);
        music.set_volume(7.0);
        assert_eq!(music.volume(), 1.0);
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let mut music = manager();
        music.play("music1");
        music.dispose();
        music.dispose();
        assert!(music.is_disposed());
        assert!(music.now_playing().is_none());
        assert_eq!(music.track_count(), 0);
        assert!(!music.play_random());
    }
}
