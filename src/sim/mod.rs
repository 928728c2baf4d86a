//! Round simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Virtual time only (driven through `GameSession::advance_to`)
//! - Seeded RNG only
//! - Stable iteration order (by target ID)
//! - No rendering or platform dependencies

pub mod clock;
pub mod scheduler;
pub mod session;
pub mod spawner;

pub use clock::{Clock, ManualClock};
pub use scheduler::{Scheduler, TimerId};
pub use session::{GameEvent, GamePhase, GameSession};
pub use spawner::{PlayArea, Target, TargetSpawner};
