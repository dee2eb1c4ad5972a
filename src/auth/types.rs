//! Types for authentication and the observed auth state

use serde::{Deserialize, Serialize};

/// User data returned by the auth gateway
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    /// The user ID
    pub id: String,

    /// The user's email address
    #[serde(default)]
    pub email: Option<String>,

    /// The user's role
    #[serde(default)]
    pub role: Option<String>,

    /// The creation time
    #[serde(default)]
    pub created_at: Option<String>,

    /// The last sign-in time
    #[serde(default)]
    pub last_sign_in_at: Option<String>,
}

/// Snapshot of the auth state as observed by the rest of the system.
///
/// The gateway owns this state; consumers read snapshots from the watch
/// channel and never mutate it directly. `loading` is true until the
/// initial state has been resolved.
#[derive(Debug, Clone)]
pub struct AuthSnapshot {
    /// Whether the initial auth state is still being resolved
    pub loading: bool,

    /// The signed-in user, if any
    pub user: Option<User>,
}

impl AuthSnapshot {
    /// Whether a user is signed in
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

impl Default for AuthSnapshot {
    fn default() -> Self {
        Self {
            loading: true,
            user: None,
        }
    }
}
