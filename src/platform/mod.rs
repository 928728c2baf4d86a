//! Platform abstraction layer
//!
//! Browser bindings for the presentation layer:
//! - Time (`Date.now()`)
//! - Play-area geometry (bounding rect of the game element)
//! - Storage (LocalStorage)

#[cfg(target_arch = "wasm32")]
pub mod web;

use serde::Serialize;

use crate::identity::UserRecord;
use crate::sim::{GamePhase, GameSession, Target};
use crate::store::UserStore;

/// Everything the presentation layer draws for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub score: u64,
    pub time_left: u32,
    pub targets: &'a [Target],
    pub user: &'a UserRecord,
}

impl<'a> Snapshot<'a> {
    pub fn of<S: UserStore>(session: &'a GameSession<S>) -> Self {
        Self {
            phase: session.phase(),
            score: session.score(),
            time_left: session.time_left(),
            targets: session.targets(),
            user: session.user(),
        }
    }
}
