//! Game bootstrap.
//!
//! [`Game`] owns every shared subsystem as a resource of its ECS [`World`]
//! and walks them through the application lifecycle:
//!
//! 1. register all assets
//! 2. construct the level manager and load the levels
//! 3. construct the music manager
//! 4. load the player preferences and fill in defaults
//! 5. switch to the main menu
//!
//! Teardown runs in the opposite direction: music, then levels, then the
//! asset registry. Subsystems are removed from the world as they are
//! released, so each one is released at most once no matter how often
//! teardown is reached.

use crate::app::{Canvas, Disposable, Host, Renderable, Rgba, Startable};
use crate::resources::assetstore::{AssetStore, register_default_assets};
use crate::resources::gameconfig::GameConfig;
use crate::resources::levels::{LevelError, LevelManager};
use crate::resources::lifecycle::{Lifecycle, LifecycleStates};
use crate::resources::music::MusicManager;
use crate::resources::preferences::Preferences;
use crate::screens::Screen;
use crate::screens::menu::MenuScreen;
use bevy_ecs::prelude::*;
use log::{debug, error, info, warn};
use std::fmt;

/// Subsystems released during teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subsystem {
    Music,
    Levels,
    Assets,
}

/// Errors that abort startup.
#[derive(Debug)]
pub enum GameError {
    Levels(LevelError),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Levels(e) => write!(f, "could not load levels: {}", e),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Levels(e) => Some(e),
        }
    }
}

impl From<LevelError> for GameError {
    fn from(e: LevelError) -> Self {
        GameError::Levels(e)
    }
}

pub struct Game {
    world: World,
    screen: Option<Box<dyn Screen>>,
    released: Vec<Subsystem>,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let mut world = World::new();
        world.insert_resource(config);
        world.insert_resource(Lifecycle::new());
        Self {
            world,
            screen: None,
            released: Vec::new(),
        }
    }

    pub fn lifecycle(&self) -> LifecycleStates {
        self.world.resource::<Lifecycle>().get()
    }

    /// Shared state handed to screens.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn config(&self) -> &GameConfig {
        self.world.resource::<GameConfig>()
    }

    pub fn assets(&self) -> Option<&AssetStore> {
        self.world.get_resource::<AssetStore>()
    }

    pub fn levels(&self) -> Option<&LevelManager> {
        self.world.get_resource::<LevelManager>()
    }

    pub fn music(&self) -> Option<&MusicManager> {
        self.world.get_resource::<MusicManager>()
    }

    pub fn preferences(&self) -> Option<&Preferences> {
        self.world.get_resource::<Preferences>()
    }

    /// Name of the screen currently shown.
    pub fn active_screen(&self) -> Option<&'static str> {
        self.screen.as_ref().map(|s| s.name())
    }

    /// Subsystems released so far, in release order.
    pub fn released(&self) -> &[Subsystem] {
        &self.released
    }

    /// Replace the active screen. The previous one is hidden and disposed.
    pub fn set_screen(&mut self, mut screen: Box<dyn Screen>) {
        if let Some(mut previous) = self.screen.take() {
            previous.hide(&mut self.world);
            previous.dispose();
        }
        info!("Switching to screen '{}'", screen.name());
        screen.show(&mut self.world);
        self.screen = Some(screen);
    }

    fn advance(&mut self, next: LifecycleStates) {
        self.world.resource_mut::<Lifecycle>().advance(next);
    }

    fn load_assets(&mut self) {
        let mut assets = AssetStore::new();
        register_default_assets(&mut assets);
        let root = self.config().assets_dir.clone();
        for name in assets.missing_files(&root) {
            warn!("Asset '{}' not found under {:?}", name, root);
        }
        self.world.insert_resource(assets);
    }

    /// Release every subsystem still present, newest first.
    fn teardown(&mut self) {
        if let Some(mut screen) = self.screen.take() {
            screen.hide(&mut self.world);
            screen.dispose();
        }
        if let Some(mut music) = self.world.remove_resource::<MusicManager>() {
            music.dispose();
            self.released.push(Subsystem::Music);
        }
        if let Some(mut levels) = self.world.remove_resource::<LevelManager>() {
            levels.dispose();
            self.released.push(Subsystem::Levels);
        }
        if let Some(mut assets) = self.world.remove_resource::<AssetStore>() {
            assets.dispose_all();
            self.released.push(Subsystem::Assets);
        }
        if self.lifecycle() != LifecycleStates::Disposed {
            self.advance(LifecycleStates::Disposed);
        }
    }
}

impl Startable for Game {
    type Error = GameError;

    fn create(&mut self, host: &mut dyn Host) -> Result<(), GameError> {
        if self.lifecycle() != LifecycleStates::Uninitialized {
            warn!("Game already started ({:?}), ignoring create", self.lifecycle());
            return Ok(());
        }

        self.load_assets();
        self.advance(LifecycleStates::AssetsLoaded);

        let mut levels = LevelManager::new(self.config().level_index_path());
        if let Err(e) = levels.load_levels(self.world.resource::<AssetStore>()) {
            self.teardown();
            return Err(e.into());
        }
        self.world.insert_resource(levels);
        self.advance(LifecycleStates::LevelsLoaded);

        let music = MusicManager::new(self.world.resource::<AssetStore>());
        self.world.insert_resource(music);
        self.advance(LifecycleStates::MusicReady);

        let mut prefs = Preferences::with_path(self.config().preferences_path.clone());
        if let Err(e) = prefs.load_preferences() {
            error!("Error: Could not read the preferences file.");
            error!("{}", e);
            self.teardown();
            host.request_exit();
            return Ok(());
        }
        let filled = prefs.check_defaults();
        if filled > 0 {
            debug!("Filled {} missing preferences", filled);
            if let Err(e) = prefs.save() {
                warn!("{}", e);
            }
        }
        self.world
            .resource_mut::<MusicManager>()
            .apply_preferences(&prefs);
        self.world.insert_resource(prefs);
        self.advance(LifecycleStates::PreferencesReady);

        self.set_screen(Box::new(MenuScreen::new()));
        self.advance(LifecycleStates::Running);
        Ok(())
    }
}

impl Renderable for Game {
    fn render(&mut self, canvas: &mut dyn Canvas, delta: f32) {
        canvas.clear(Rgba::SKY_BLUE);
        if let Some(screen) = self.screen.as_mut() {
            screen.render(&mut self.world, canvas, delta);
        }
    }

    fn after_frame(&mut self, host: &mut dyn Host) {
        let now_playing = self
            .world
            .get_resource::<MusicManager>()
            .and_then(|m| m.now_playing());
        host.sync_music(now_playing.as_ref());
    }
}

impl Disposable for Game {
    fn dispose(&mut self) {
        self.teardown();
    }
}

impl Drop for Game {
    fn drop(&mut self) {
        self.teardown();
    }
}
