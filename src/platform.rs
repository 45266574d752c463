//! Native host backed by raylib.
//!
//! Owns the window and, when an audio device is available, streams the music
//! track the game asks for. All calls happen on the main thread.

use log::{debug, info, warn};
use problematic::app::{Canvas, Host, Rgba};
use problematic::resources::music::NowPlaying;
use raylib::core::audio::{Music, RaylibAudio};
use raylib::prelude::*;
use std::path::PathBuf;

fn to_color(c: Rgba) -> Color {
    let [r, g, b, a] = c.to_u8();
    Color::new(r, g, b, a)
}

struct RaylibCanvas<'a, 'b>(&'a mut RaylibDrawHandle<'b>);

impl Canvas for RaylibCanvas<'_, '_> {
    fn clear(&mut self, color: Rgba) {
        self.0.clear_background(to_color(color));
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, size: i32, color: Rgba) {
        self.0.draw_text(text, x, y, size, to_color(color));
    }

    fn size(&self) -> (i32, i32) {
        (self.0.get_screen_width(), self.0.get_screen_height())
    }
}

pub struct RaylibHost<'a> {
    rl: RaylibHandle,
    thread: RaylibThread,
    audio: Option<&'a RaylibAudio>,
    /// Track being streamed, by symbolic name.
    music: Option<(String, Music<'a>)>,
    /// Last track that failed to load; not retried until another is requested.
    failed_track: Option<String>,
    assets_dir: PathBuf,
    exit_requested: bool,
}

impl<'a> RaylibHost<'a> {
    pub fn new(
        rl: RaylibHandle,
        thread: RaylibThread,
        audio: Option<&'a RaylibAudio>,
        assets_dir: PathBuf,
    ) -> Self {
        Self {
            rl,
            thread,
            audio,
            music: None,
            failed_track: None,
            assets_dir,
            exit_requested: false,
        }
    }

    fn stop_music(&mut self) {
        if let Some((name, music)) = self.music.take() {
            music.stop_stream();
            debug!("[audio] stopped '{}'", name);
        }
    }
}

impl Host for RaylibHost<'_> {
    fn should_close(&self) -> bool {
        self.exit_requested || self.rl.window_should_close()
    }

    fn request_exit(&mut self) {
        if !self.exit_requested {
            info!("Exit requested");
        }
        self.exit_requested = true;
    }

    fn frame_time(&self) -> f32 {
        self.rl.get_frame_time()
    }

    fn draw_frame(&mut self, draw: &mut dyn FnMut(&mut dyn Canvas)) {
        let mut d = self.rl.begin_drawing(&self.thread);
        let mut canvas = RaylibCanvas(&mut d);
        draw(&mut canvas);
    }

    fn sync_music(&mut self, now_playing: Option<&NowPlaying>) {
        let Some(audio) = self.audio else {
            return;
        };
        let Some(wanted) = now_playing else {
            self.stop_music();
            return;
        };

        let current = self.music.as_ref().map(|(name, _)| name.as_str());
        if current != Some(wanted.name.as_str())
            && self.failed_track.as_deref() != Some(wanted.name.as_str())
        {
            self.stop_music();
            let path = self.assets_dir.join(&wanted.path);
            let path = path.to_string_lossy().into_owned();
            match audio.new_music(&path) {
                Ok(music) => {
                    music.play_stream();
                    info!("[audio] playing '{}' from {}", wanted.name, path);
                    self.failed_track = None;
                    self.music = Some((wanted.name.clone(), music));
                }
                Err(e) => {
                    warn!("[audio] cannot load '{}' from {}: {}", wanted.name, path, e);
                    self.failed_track = Some(wanted.name.clone());
                }
            }
        }

        if let Some((_, music)) = &self.music {
            music.set_volume(wanted.volume);
            music.update_stream();
        }
    }
}
