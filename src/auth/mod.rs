//! Authentication against the InvoiceAI auth gateway
//!
//! The gateway is an external token-issuing service; this client signs users
//! in and out, holds the current session, and publishes auth-state snapshots
//! that the rest of the system observes through a watch channel.

mod session;
mod types;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tokio::sync::watch;

use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::Fetch;
use crate::upload::TokenProvider;

pub use session::*;
pub use types::*;

const CLIENT_INFO: &str = "invoiceai-rust/0.2.0";

/// Minimum password length accepted before a sign-up is sent to the gateway
pub const MIN_PASSWORD_LEN: usize = 6;

/// Client for the InvoiceAI auth gateway
pub struct Auth {
    /// The base URL of the InvoiceAI deployment
    url: String,

    /// The API key identifying this client to the gateway
    key: String,

    /// HTTP client used for requests
    client: Client,

    /// The current session
    session: Arc<Mutex<Option<Session>>>,

    /// Publisher for auth-state snapshots
    state: watch::Sender<AuthSnapshot>,

    /// Client options
    options: ClientOptions,
}

impl Auth {
    /// Create a new Auth client
    pub(crate) fn new(url: &str, key: &str, client: Client, options: ClientOptions) -> Self {
        let (state, _) = watch::channel(AuthSnapshot::default());

        Self {
            url: url.to_string(),
            key: key.to_string(),
            client,
            session: Arc::new(Mutex::new(None)),
            state,
            options,
        }
    }

    fn gateway_url(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.url, path)
    }

    /// Sign in a user with email and password
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, Error> {
        let url = self.gateway_url("/token?grant_type=password");

        let mut body = HashMap::new();
        body.insert("email".to_string(), email.to_string());
        body.insert("password".to_string(), password.to_string());

        let response = Fetch::post(&self.client, &url)
            .header("apikey", &self.key)
            .header("X-Client-Info", CLIENT_INFO)
            .json(&body)?
            .execute_raw()
            .await?;

        let session = self.session_or_error(response).await?;
        tracing::debug!(user = %session.user.id, "signed in");
        self.store_session(session.clone());

        Ok(session)
    }

    /// Register a new user with email and password.
    ///
    /// The confirmation and length checks run before any network call; a
    /// failed check surfaces as an [`Error::Auth`] and the gateway is never
    /// contacted.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Session, Error> {
        if password != confirm_password {
            return Err(Error::auth("Passwords do not match"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::auth("Password must be at least 6 characters"));
        }

        let url = self.gateway_url("/signup");

        let mut body = HashMap::new();
        body.insert("email".to_string(), email.to_string());
        body.insert("password".to_string(), password.to_string());

        let response = Fetch::post(&self.client, &url)
            .header("apikey", &self.key)
            .header("X-Client-Info", CLIENT_INFO)
            .json(&body)?
            .execute_raw()
            .await?;

        let session = self.session_or_error(response).await?;
        tracing::debug!(user = %session.user.id, "registered");
        self.store_session(session.clone());

        Ok(session)
    }

    /// Sign out the current user.
    ///
    /// The local session is cleared even when the revoke call fails; the
    /// failure is still reported to the caller.
    pub async fn logout(&self) -> Result<(), Error> {
        let token = {
            let current = self.session.lock().unwrap();
            match current.as_ref() {
                Some(session) => session.access_token.clone(),
                None => return Err(Error::Unauthenticated),
            }
        };

        let url = self.gateway_url("/logout");
        let result = Fetch::post(&self.client, &url)
            .header("apikey", &self.key)
            .header("X-Client-Info", CLIENT_INFO)
            .bearer_auth(&token)
            .execute_raw()
            .await;

        self.clear_session();

        let response = result?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "logout revoke failed");
            return Err(Error::Auth(gateway_message(status, &body)));
        }

        Ok(())
    }

    /// Exchange the refresh token for a new session
    pub async fn refresh_session(&self) -> Result<Session, Error> {
        let refresh_token = {
            let current = self.session.lock().unwrap();
            match current.as_ref() {
                Some(session) => session.refresh_token.clone(),
                None => return Err(Error::Unauthenticated),
            }
        };

        let url = self.gateway_url("/token?grant_type=refresh_token");

        let mut body = HashMap::new();
        body.insert("refresh_token".to_string(), refresh_token);

        let response = Fetch::post(&self.client, &url)
            .header("apikey", &self.key)
            .header("X-Client-Info", CLIENT_INFO)
            .json(&body)?
            .execute_raw()
            .await?;

        let session = self.session_or_error(response).await?;
        self.store_session(session.clone());

        Ok(session)
    }

    /// Fetch the user profile for the current session from the gateway
    pub async fn fetch_user(&self) -> Result<User, Error> {
        let token = self.access_token().await?;

        let url = self.gateway_url("/user");
        let response = Fetch::get(&self.client, &url)
            .header("apikey", &self.key)
            .header("X-Client-Info", CLIENT_INFO)
            .bearer_auth(&token)
            .execute_raw()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Auth(gateway_message(status, &body)));
        }

        let user: User = serde_json::from_str(&body)?;

        {
            let mut current = self.session.lock().unwrap();
            if let Some(session) = current.as_mut() {
                session.user = user.clone();
            }
        }
        self.publish();

        Ok(user)
    }

    /// Return the bearer token for the current session.
    ///
    /// Fails with [`Error::Unauthenticated`] when no session is held. An
    /// expired session is refreshed transparently when the options allow it.
    pub async fn access_token(&self) -> Result<String, Error> {
        let session = self.session.lock().unwrap().clone();

        match session {
            Some(session) if !session.is_expired() => Ok(session.access_token),
            Some(_) if self.options.auto_refresh_token => {
                tracing::debug!("session expired, refreshing");
                let refreshed = self.refresh_session().await?;
                Ok(refreshed.access_token)
            }
            Some(_) => Err(Error::Unauthenticated),
            None => Err(Error::Unauthenticated),
        }
    }

    /// Get the currently signed-in user
    pub fn current_user(&self) -> Option<User> {
        let current = self.session.lock().unwrap();
        current.as_ref().map(|session| session.user.clone())
    }

    /// Get the current session
    pub fn get_session(&self) -> Option<Session> {
        let current = self.session.lock().unwrap();
        current.clone()
    }

    /// Inject a session, e.g. one obtained out of band
    pub fn set_session(&self, session: Session) {
        self.store_session(session);
    }

    /// Subscribe to auth-state changes. The receiver always holds the most
    /// recent snapshot.
    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.state.subscribe()
    }

    /// Current auth-state snapshot
    pub fn snapshot(&self) -> AuthSnapshot {
        self.state.borrow().clone()
    }

    /// Resolve the initial auth state.
    ///
    /// The client keeps no persisted sessions, so unless a session was
    /// injected with [`Auth::set_session`] the first resolved state is
    /// signed out.
    pub fn resolve_initial(&self) {
        self.publish();
    }

    fn store_session(&self, session: Session) {
        {
            let mut current = self.session.lock().unwrap();
            *current = Some(session);
        }
        self.publish();
    }

    fn clear_session(&self) {
        {
            let mut current = self.session.lock().unwrap();
            *current = None;
        }
        self.publish();
    }

    fn publish(&self) {
        let user = {
            let current = self.session.lock().unwrap();
            current.as_ref().map(|session| session.user.clone())
        };
        self.state.send_replace(AuthSnapshot {
            loading: false,
            user,
        });
    }

    async fn session_or_error(&self, response: reqwest::Response) -> Result<Session, Error> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "auth gateway rejected request");
            return Err(Error::Auth(gateway_message(status, &body)));
        }

        let mut session: Session = serde_json::from_str(&body)?;
        session.stamp_expiry();
        Ok(session)
    }
}

#[async_trait]
impl TokenProvider for Auth {
    async fn access_token(&self) -> Result<String, Error> {
        Auth::access_token(self).await
    }
}

/// Extract the human-readable message from a gateway error body. The
/// message is shown to the user verbatim, so prefer the gateway's own
/// wording over a synthesized one.
fn gateway_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error_description", "msg", "message", "error"] {
            if let Some(message) = value.get(key).and_then(|v| v.as_str()) {
                return message.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("request failed with status {}", status.as_u16())
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_message_prefers_error_description() {
        let message = gateway_message(
            StatusCode::BAD_REQUEST,
            r#"{"error": "invalid_grant", "error_description": "Invalid login credentials"}"#,
        );
        assert_eq!(message, "Invalid login credentials");
    }

    #[test]
    fn gateway_message_falls_back_to_body_then_status() {
        assert_eq!(
            gateway_message(StatusCode::BAD_GATEWAY, "upstream unavailable"),
            "upstream unavailable"
        );
        assert_eq!(
            gateway_message(StatusCode::BAD_GATEWAY, "  "),
            "request failed with status 502"
        );
    }
}
