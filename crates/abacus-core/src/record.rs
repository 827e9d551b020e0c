//! The persisted credential record.

use crate::tokens::{AccessToken, RefreshToken};

/// Access token, refresh token and username of the signed-in user.
///
/// The three fields exist together or not at all: a store holds either a
/// complete record or nothing, never a partial session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    access_token: AccessToken,
    refresh_token: RefreshToken,
    username: String,
}

impl CredentialRecord {
    /// Create a new credential record.
    pub fn new(
        access_token: AccessToken,
        refresh_token: RefreshToken,
        username: impl Into<String>,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            username: username.into(),
        }
    }

    /// Returns the access token.
    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    /// Returns the refresh token.
    pub fn refresh_token(&self) -> &RefreshToken {
        &self.refresh_token
    }

    /// Returns the username the session belongs to.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Replace the access token, keeping refresh token and username.
    pub fn with_access_token(self, access_token: AccessToken) -> Self {
        Self {
            access_token,
            ..self
        }
    }
}
