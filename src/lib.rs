//! Target Rush - a timed click-the-target promo mini-game
//!
//! Core modules:
//! - `sim`: Round simulation (virtual-time scheduler, target spawner, game session)
//! - `ranking`: Leaderboard aggregation over a fixed reference list
//! - `identity`: Sign-in form validation and the user record
//! - `store`: User record persistence (LocalStorage on web, memory elsewhere)
//! - `config`: Data-driven game tuning
//! - `platform`: Browser bindings for the presentation layer

pub mod config;
pub mod daily;
pub mod error;
pub mod identity;
pub mod platform;
pub mod ranking;
pub mod sim;
pub mod store;

pub use config::GameConfig;
pub use error::{ConfigError, IdentityError, SessionError, SignInError, StoreError};
pub use identity::UserRecord;
pub use ranking::{Aggregator, RankPolicy, Ranking, Standing};
pub use store::{MemoryStore, UserStore};

/// Game configuration constants
pub mod consts {
    /// Length of one round in seconds
    pub const ROUND_SECS: u32 = 30;
    /// Round countdown cadence (ms)
    pub const COUNTDOWN_INTERVAL_MS: u64 = 1000;
    /// Target spawn cadence (ms)
    pub const SPAWN_INTERVAL_MS: u64 = 800;

    /// Target size range (px, edge length of the square hit box)
    pub const TARGET_MIN_SIZE: f32 = 40.0;
    pub const TARGET_MAX_SIZE: f32 = 80.0;

    /// Target lifetime range (seconds)
    pub const TARGET_MIN_LIFETIME: f32 = 1.0;
    pub const TARGET_MAX_LIFETIME: f32 = 3.0;

    /// Base value a hit is subtracted from (smaller targets are worth more)
    pub const POINTS_BASE: f32 = 100.0;

    /// Positions 1..=QUALIFIED_CUTOFF are eligible for the reward
    pub const QUALIFIED_CUTOFF: u32 = 10;
    /// Number of standings shown on the podium
    pub const PODIUM_SIZE: usize = 3;
    /// Rank range used for players outside the reference list
    pub const UNRANKED_MIN: u32 = 11;
    pub const UNRANKED_MAX: u32 = 30;
}

/// Points awarded for hitting a target of the given size
#[inline]
pub fn points_for_size(size: f32) -> u32 {
    (consts::POINTS_BASE - size).round().max(0.0) as u32
}
