//! Screens shown by the game.
//!
//! Exactly one screen is active at a time. Screens get the shared subsystems
//! (asset registry, level manager, music, preferences) through the game's ECS
//! [`World`] on every call instead of holding references to them.
//!
//! - `menu` – title screen shown after startup

use crate::app::Canvas;
use bevy_ecs::prelude::World;

pub mod menu;

/// A full-window view with its own show/render/hide cycle.
pub trait Screen {
    /// Stable identifier, used in logs and tests.
    fn name(&self) -> &'static str;

    /// Called when the screen becomes the active one.
    fn show(&mut self, _world: &mut World) {}

    /// Draw one frame. The frame buffer has already been cleared.
    fn render(&mut self, world: &mut World, canvas: &mut dyn Canvas, delta: f32);

    /// Called when another screen replaces this one.
    fn hide(&mut self, _world: &mut World) {}

    /// Release anything the screen owns. Called once, after `hide`.
    fn dispose(&mut self) {}
}
