//! Problematic main entry point.
//!
//! An educational 2D puzzle platformer written in Rust using:
//! - **raylib** for windowing, graphics, and audio
//! - **bevy_ecs** as the shared state container for the game's subsystems
//!
//! # Main Loop
//!
//! 1. Load `config.ini` and apply command line overrides
//! 2. Open the raylib window and the audio device
//! 3. Hand control to [`problematic::app::run`], which starts the game,
//!    renders until the window closes or an exit is requested, and disposes
//!    every subsystem on the way out
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --assets ./assets
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

mod platform;

use crate::platform::RaylibHost;
use clap::Parser;
use log::{info, warn};
use problematic::game::Game;
use problematic::resources::gameconfig::GameConfig;
use problematic::resources::preferences::Preferences;
use raylib::core::audio::RaylibAudio;
use std::path::PathBuf;

/// Problematic
#[derive(Parser)]
#[command(version, about = "Problematic, a math puzzle platformer.")]
struct Cli {
    /// Configuration file to read window and path settings from.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Asset root directory, overrides the config file.
    #[arg(long, value_name = "DIR")]
    assets: Option<PathBuf>,

    /// Preferences file, overrides the config file.
    #[arg(long, value_name = "PATH")]
    preferences: Option<PathBuf>,

    /// Write a preferences file holding only default values and exit.
    /// Optionally provide a path (default: the configured preferences file).
    #[arg(long, value_name = "PATH")]
    write_default_preferences: Option<Option<PathBuf>>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        info!("{}; using defaults", e);
    }
    if let Some(assets) = cli.assets {
        config.assets_dir = assets;
    }
    if let Some(prefs) = cli.preferences {
        config.preferences_path = prefs;
    }

    // Early-exit: write default preferences and quit (no window/audio needed)
    if let Some(maybe_path) = cli.write_default_preferences {
        let path = maybe_path.unwrap_or_else(|| config.preferences_path.clone());
        if let Err(e) = Preferences::write_defaults(&path) {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        println!("Default preferences written to {}", path.display());
        return;
    }

    info!("Starting Problematic");
    // --------------- Raylib window & audio ---------------
    let (window_width, window_height) = config.window_size();
    let mut builder = raylib::init();
    builder
        .size(window_width as i32, window_height as i32)
        .title("Problematic");
    if config.vsync {
        builder.vsync();
    }
    let (mut rl, thread) = builder.build();
    rl.set_target_fps(config.target_fps);

    let audio = match RaylibAudio::init_audio_device() {
        Ok(device) => Some(device),
        Err(e) => {
            warn!("Audio device unavailable, music disabled: {}", e);
            None
        }
    };

    let mut host = RaylibHost::new(rl, thread, audio.as_ref(), config.assets_dir.clone());
    let mut game = Game::new(config);

    // --------------- Main loop ---------------
    if let Err(e) = problematic::app::run(&mut game, &mut host) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
