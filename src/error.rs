//! Error types
//!
//! Nothing here is fatal to a running round; see `GameSession` for how
//! storage failures during a commit are handled.

use thiserror::Error;

/// Rejected sign-in form input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("an email address is required to register")]
    MissingEmail,
    #[error("`{0}` is not a valid email address")]
    InvalidEmail(String),
}

/// User record store failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("storage rejected the write: {0}")]
    Write(String),
    #[error("failed to encode user record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Either the sign-in form was rejected or the record could not be stored
#[derive(Debug, Error)]
pub enum SignInError {
    #[error(transparent)]
    Invalid(#[from] IdentityError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Invalid game configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Unreadable(String),
    #[error("round length must be at least one second")]
    ZeroRound,
    #[error("{0} interval must be non-zero")]
    ZeroInterval(&'static str),
    #[error("{name} range is empty or negative ({min}..{max})")]
    BadRange {
        name: &'static str,
        min: f32,
        max: f32,
    },
    #[error("unranked range {min}..={max} overlaps the qualified tier (cutoff {cutoff})")]
    UnrankedOverlap { min: u32, max: u32, cutoff: u32 },
}

/// Game session setup failures
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no signed-in user")]
    NotAuthenticated,
    #[error(transparent)]
    Config(#[from] ConfigError),
}
