//! Sign-in and the user record
//!
//! There is no real authentication: a valid form simply produces a fresh
//! record with zero points that the caller hands to a `UserStore`.

use serde::{Deserialize, Serialize};

use crate::error::{IdentityError, SignInError};
use crate::store::UserStore;

/// Avatar service used for generated avatars
const AVATAR_BASE_URL: &str = "https://api.dicebear.com/7.x/avataaars/svg?seed=";

/// The signed-in player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Display name, unique per browser session
    pub username: String,
    /// Only present for registered accounts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Cumulative score over all committed rounds
    pub points: u64,
    /// Standing position (0 = not ranked yet)
    pub rank: u32,
    /// Avatar image URL
    #[serde(default)]
    pub avatar: String,
}

impl UserRecord {
    /// Create a fresh record with zero points
    pub fn new(username: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            avatar: avatar_url(&username),
            username,
            email: None,
            points: 0,
            rank: 0,
        }
    }
}

/// Build the generated avatar URL for a username
pub fn avatar_url(seed: &str) -> String {
    format!("{AVATAR_BASE_URL}{seed}")
}

/// Which form the player submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignInMode {
    #[default]
    Login,
    Register,
}

/// Raw sign-in form fields
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Validate the form and produce the record it signs in as
    pub fn validate(&self, mode: SignInMode) -> Result<UserRecord, IdentityError> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(IdentityError::EmptyUsername);
        }
        if self.password.is_empty() {
            return Err(IdentityError::EmptyPassword);
        }

        let mut record = UserRecord::new(username);
        if mode == SignInMode::Register {
            let email = self.email.trim();
            if email.is_empty() {
                return Err(IdentityError::MissingEmail);
            }
            if !is_email_shaped(email) {
                return Err(IdentityError::InvalidEmail(email.to_string()));
            }
            record.email = Some(email.to_string());
        }
        Ok(record)
    }
}

/// Loose `local@domain.tld` check, same strictness as a browser email input
pub fn is_email_shaped(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || s.contains(char::is_whitespace) {
        return false;
    }
    match domain.find('.') {
        Some(i) => i > 0 && !domain.ends_with('.'),
        None => false,
    }
}

/// Validate the form and persist the resulting record, replacing any previous one
pub fn sign_in<S: UserStore>(
    store: &mut S,
    credentials: &Credentials,
    mode: SignInMode,
) -> Result<UserRecord, SignInError> {
    let record = credentials.validate(mode)?;
    store.set(&record)?;
    log::info!("Signed in as {} ({:?})", record.username, mode);
    Ok(record)
}
