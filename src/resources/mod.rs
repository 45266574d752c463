//! Shared subsystems stored as resources in the game's ECS world.
//!
//! Each submodule documents the semantics and intended usage of its
//! resource(s).
//!
//! Overview
//! - `assetstore` – symbolic names of every sound, music track and texture
//! - `gameconfig` – window and path settings loaded from `config.ini`
//! - `levels` – level packs loaded from the level index
//! - `lifecycle` – current startup/shutdown stage of the application
//! - `music` – which background track should be playing
//! - `preferences` – persisted player settings with defaults
pub mod assetstore;
pub mod gameconfig;
pub mod levels;
pub mod lifecycle;
pub mod music;
pub mod preferences;
