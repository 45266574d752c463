//! Problematic library.
//!
//! This module exposes the game's bootstrap, subsystems and screens for use
//! by the binary and by integration tests.

pub mod app;
pub mod game;
pub mod resources;
pub mod screens;
