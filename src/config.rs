//! Configuration options for the InvoiceAI client

use std::time::Duration;

/// Configuration options for the InvoiceAI client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Whether an expired session is refreshed transparently when a token
    /// is requested
    pub auto_refresh_token: bool,

    /// Interval between synthesized upload progress steps
    pub progress_tick: Duration,

    /// Pause between a completed response and the settled upload state
    pub settle_delay: Duration,

    /// Currency code assumed when a payload does not declare one
    pub default_currency: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            auto_refresh_token: true,
            progress_tick: Duration::from_millis(200),
            settle_delay: Duration::from_secs(1),
            default_currency: "USD".to_string(),
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set whether expired sessions are refreshed transparently
    pub fn with_auto_refresh_token(mut self, value: bool) -> Self {
        self.auto_refresh_token = value;
        self
    }

    /// Set the interval between synthesized upload progress steps
    pub fn with_progress_tick(mut self, value: Duration) -> Self {
        self.progress_tick = value;
        self
    }

    /// Set the pause between a completed response and the settled upload state
    pub fn with_settle_delay(mut self, value: Duration) -> Self {
        self.settle_delay = value;
        self
    }

    /// Set the currency code assumed when a payload does not declare one
    pub fn with_default_currency(mut self, value: &str) -> Self {
        self.default_currency = value.to_string();
        self
    }
}
