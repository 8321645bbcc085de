use crate::token::{AccessToken, RefreshToken, TokenPair};

use super::UserRecord;

/// Body returned by both login and registration
#[derive(Debug, serde::Serialize, serde::Deserialize, Default)]
pub struct AuthResponse {
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub refresh: Option<String>,
    #[serde(default)]
    pub user: Option<UserRecord>,
}

impl AuthResponse {
    /// Returns `None` if the response does not carry a usable token pair, in
    /// which case no session should be established
    pub fn into_session_parts(self) -> Option<(TokenPair, Option<UserRecord>)> {
        let access = AccessToken::try_from(self.access?).ok()?;
        let refresh = RefreshToken::try_from(self.refresh?).ok()?;
        Some((TokenPair { access, refresh }, self.user))
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct CustomerProfile {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}
