//! Game tuning
//!
//! Persisted separately from the user record in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::ranking::RankPolicy;

/// Data-driven round and leaderboard tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Round ===
    /// Round length (seconds)
    pub round_secs: u32,
    /// Countdown tick cadence (ms)
    pub countdown_interval_ms: u64,

    // === Targets ===
    /// Spawn cadence (ms)
    pub spawn_interval_ms: u64,
    pub min_size: f32,
    pub max_size: f32,
    /// Lifetime range (seconds)
    pub min_lifetime: f32,
    pub max_lifetime: f32,

    // === Leaderboard ===
    /// Last qualifying position
    pub qualified_cutoff: u32,
    /// Rank range for players missing from the reference list
    pub unranked_min: u32,
    pub unranked_max: u32,
    /// How that rank is picked
    pub rank_policy: RankPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_secs: ROUND_SECS,
            countdown_interval_ms: COUNTDOWN_INTERVAL_MS,

            spawn_interval_ms: SPAWN_INTERVAL_MS,
            min_size: TARGET_MIN_SIZE,
            max_size: TARGET_MAX_SIZE,
            min_lifetime: TARGET_MIN_LIFETIME,
            max_lifetime: TARGET_MAX_LIFETIME,

            qualified_cutoff: QUALIFIED_CUTOFF,
            unranked_min: UNRANKED_MIN,
            unranked_max: UNRANKED_MAX,
            rank_policy: RankPolicy::default(),
        }
    }
}

impl GameConfig {
    /// Check that every range is non-empty and every cadence non-zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.round_secs == 0 {
            return Err(ConfigError::ZeroRound);
        }
        if self.countdown_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("countdown"));
        }
        if self.spawn_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("spawn"));
        }
        check_range("size", self.min_size, self.max_size)?;
        check_range("lifetime", self.min_lifetime, self.max_lifetime)?;
        if self.unranked_min > self.unranked_max {
            return Err(ConfigError::BadRange {
                name: "unranked",
                min: self.unranked_min as f32,
                max: self.unranked_max as f32,
            });
        }
        if self.unranked_min <= self.qualified_cutoff {
            return Err(ConfigError::UnrankedOverlap {
                min: self.unranked_min,
                max: self.unranked_max,
                cutoff: self.qualified_cutoff,
            });
        }
        Ok(())
    }

    /// Parse a stored config and check it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Unreadable(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "target_rush_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Stored config rejected: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                match storage.set_item(Self::STORAGE_KEY, &json) {
                    Ok(()) => log::info!("Config saved"),
                    Err(e) => log::warn!("Config not saved: {:?}", e),
                }
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

fn check_range(name: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if !(min.is_finite() && max.is_finite()) || min <= 0.0 || min > max {
        return Err(ConfigError::BadRange { name, min, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.round_secs, 30);
        assert_eq!(config.spawn_interval_ms, 800);
        assert_eq!(config.rank_policy, RankPolicy::Random);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = GameConfig {
            round_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroRound));

        let config = GameConfig {
            spawn_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroInterval("spawn")));

        let config = GameConfig {
            min_size: 90.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BadRange { name: "size", .. })
        ));

        let config = GameConfig {
            unranked_min: 5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnrankedOverlap { .. })
        ));
    }

    #[test]
    fn test_from_json_rejects_bad_config() {
        assert!(matches!(
            GameConfig::from_json("{round_secs"),
            Err(ConfigError::Unreadable(_))
        ));
        assert_eq!(
            GameConfig::from_json(r#"{"countdown_interval_ms":0}"#),
            Err(ConfigError::ZeroInterval("countdown"))
        );
        assert_eq!(
            GameConfig::from_json(r#"{"round_secs":45}"#).map(|c| c.round_secs),
            Ok(45)
        );
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{"round_secs":60,"rank_policy":"ScoreDerived"}"#).unwrap();
        assert_eq!(config.round_secs, 60);
        assert_eq!(config.rank_policy, RankPolicy::ScoreDerived);
        assert_eq!(config.max_size, TARGET_MAX_SIZE);
    }
}
