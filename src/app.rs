//! Application capabilities and the event loop that drives them.
//!
//! The hosting environment (a raylib window in the binary, a scripted host in
//! tests) implements [`Host`]. The application implements [`Startable`],
//! [`Renderable`] and [`Disposable`], and [`run`] calls them in order:
//! `create` once, `render` once per frame, `dispose` once.

use crate::resources::music::NowPlaying;
use log::{debug, error};

/// An RGBA color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// Background every frame starts from.
    pub const SKY_BLUE: Rgba = Rgba::new(0.7, 0.7, 1.0, 1.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const DARK_BLUE: Rgba = Rgba::new(0.1, 0.1, 0.4, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// 8-bit channels, rounded.
    pub fn to_u8(self) -> [u8; 4] {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [c(self.r), c(self.g), c(self.b), c(self.a)]
    }
}

/// Drawing surface for a single frame.
pub trait Canvas {
    /// Fill the whole frame buffer with `color`.
    fn clear(&mut self, color: Rgba);
    fn draw_text(&mut self, text: &str, x: i32, y: i32, size: i32, color: Rgba);
    /// Frame buffer size in pixels.
    fn size(&self) -> (i32, i32);
}

/// The environment an application runs in.
pub trait Host {
    /// True once the window was closed or an exit was requested.
    fn should_close(&self) -> bool;
    /// Ask for an orderly shutdown after the current callback returns.
    fn request_exit(&mut self);
    /// Seconds elapsed since the previous frame.
    fn frame_time(&self) -> f32;
    /// Open a frame, hand its canvas to `draw`, and present it.
    fn draw_frame(&mut self, draw: &mut dyn FnMut(&mut dyn Canvas));
    /// Follow the music the application wants to hear. Hosts without an
    /// audio device ignore it.
    fn sync_music(&mut self, _now_playing: Option<&NowPlaying>) {}
}

/// Startup hook, called once before the first frame.
///
/// Errors returned here abort startup; recoverable problems are handled
/// inside and reported through [`Host::request_exit`] instead.
pub trait Startable {
    type Error;

    fn create(&mut self, host: &mut dyn Host) -> Result<(), Self::Error>;
}

/// Per-frame hook. Must not block.
pub trait Renderable {
    fn render(&mut self, canvas: &mut dyn Canvas, delta: f32);

    /// Runs after each presented frame, outside the drawing scope.
    fn after_frame(&mut self, _host: &mut dyn Host) {}
}

/// Shutdown hook. Must be safe to call more than once and after a failed
/// startup.
pub trait Disposable {
    fn dispose(&mut self);
}

/// Drive `app` until the host closes.
///
/// `dispose` always runs exactly once, including when `create` fails; in that
/// case no frame is rendered and the startup error is returned.
pub fn run<A>(app: &mut A, host: &mut dyn Host) -> Result<(), A::Error>
where
    A: Startable + Renderable + Disposable,
    A::Error: std::fmt::Display,
{
    if let Err(e) = app.create(host) {
        error!("Startup failed: {}", e);
        app.dispose();
        return Err(e);
    }

    let mut frames: u64 = 0;
    while !host.should_close() {
        let delta = host.frame_time();
        host.draw_frame(&mut |canvas: &mut dyn Canvas| app.render(canvas, delta));
        app.after_frame(host);
        frames += 1;
    }
    debug!("Event loop finished after {} frames", frames);

    app.dispose();
    Ok(())
}
