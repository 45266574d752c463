//! Application lifecycle state.
//!
//! Startup walks through the stages in declaration order and never goes back.
//! [`LifecycleStates::Disposed`] is terminal and reachable from any other
//! state, so an aborted startup can still be torn down.

use bevy_ecs::prelude::Resource;
use log::{info, warn};

/// Discrete stages of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum LifecycleStates {
    #[default]
    Uninitialized,
    AssetsLoaded,
    LevelsLoaded,
    MusicReady,
    PreferencesReady,
    Running,
    Disposed,
}

impl LifecycleStates {
    /// The only state startup may move to from here.
    pub fn successor(self) -> Option<LifecycleStates> {
        use LifecycleStates::*;
        match self {
            Uninitialized => Some(AssetsLoaded),
            AssetsLoaded => Some(LevelsLoaded),
            LevelsLoaded => Some(MusicReady),
            MusicReady => Some(PreferencesReady),
            PreferencesReady => Some(Running),
            Running => Some(Disposed),
            Disposed => None,
        }
    }
}

/// Authoritative current lifecycle state.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Default)]
pub struct Lifecycle {
    current: LifecycleStates,
}

impl Lifecycle {
    /// Create a new state initialized to [`LifecycleStates::Uninitialized`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only access to the current state.
    pub fn get(&self) -> LifecycleStates {
        self.current
    }

    /// Move to `next`. Only the immediate successor is accepted, plus
    /// [`LifecycleStates::Disposed`] from anywhere but itself. Returns whether
    /// the transition happened.
    pub fn advance(&mut self, next: LifecycleStates) -> bool {
        let allowed = self.current.successor() == Some(next)
            || (next == LifecycleStates::Disposed && self.current != LifecycleStates::Disposed);
        if allowed {
            info!("Transitioning from {:?} to {:?}", self.current, next);
            self.current = next;
        } else {
            warn!("Rejected lifecycle transition {:?} -> {:?}", self.current, next);
        }
        allowed
    }

    pub fn is_running(&self) -> bool {
        self.current == LifecycleStates::Running
    }

    pub fn is_disposed(&self) -> bool {
        self.current == LifecycleStates::Disposed
    }
}
