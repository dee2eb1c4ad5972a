//! Session state held for a signed-in user

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::types::User;

/// Session data issued by the auth gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The access token presented as the bearer credential
    pub access_token: String,

    /// The refresh token
    pub refresh_token: String,

    /// The token type, normally "bearer"
    pub token_type: String,

    /// Token lifetime in seconds
    pub expires_in: i64,

    /// Unix timestamp at which the access token expires
    #[serde(default)]
    pub expires_at: Option<i64>,

    /// The signed-in user
    pub user: User,
}

impl Session {
    /// Create a new session expiring `expires_in` seconds from now
    pub fn new(access_token: String, refresh_token: String, user: User, expires_in: i64) -> Self {
        let mut session = Self {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
            expires_in,
            expires_at: None,
            user,
        };
        session.stamp_expiry();
        session
    }

    /// Derive `expires_at` from the wall clock when the gateway omitted it
    pub fn stamp_expiry(&mut self) {
        if self.expires_at.is_none() {
            self.expires_at = Some(Utc::now().timestamp() + self.expires_in);
        }
    }

    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now().timestamp() >= expires_at,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamps_expiry_relative_to_now() {
        let session = Session::new("t".into(), "r".into(), User::default(), 3600);
        assert!(!session.is_expired());
    }

    #[test]
    fn expired_session_is_detected() {
        let mut session = Session::new("t".into(), "r".into(), User::default(), 3600);
        session.expires_at = Some(Utc::now().timestamp() - 1);
        assert!(session.is_expired());
    }
}
