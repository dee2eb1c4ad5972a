//! InvoiceAI Rust Client Library
//!
//! A Rust client for the InvoiceAI invoice-processing platform: it signs
//! users in against the auth gateway, submits invoice documents to the
//! inference endpoint, and keeps the session-local state around both (the
//! upload lifecycle, the processed-invoice history, and the view router
//! the UI layers drive).
//!
//! All document understanding happens server-side; this crate treats the
//! inference endpoint as a black box that turns an uploaded PDF or XML
//! file into an [`invoice::InvoiceData`] payload.

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetch;
pub mod history;
pub mod invoice;
pub mod render;
pub mod router;
pub mod upload;

use std::sync::Arc;

use reqwest::Client;

use crate::auth::Auth;
use crate::config::ClientOptions;
use crate::dashboard::Dashboard;
use crate::upload::{Processor, TokenProvider};

/// The main entry point for the InvoiceAI client
pub struct InvoiceAi {
    /// Base URL of the InvoiceAI deployment
    pub url: String,

    /// API key identifying this client to the auth gateway
    pub key: String,

    /// HTTP client used for requests
    pub http_client: Client,

    /// Auth gateway client, shared with the processors it authenticates
    pub auth: Arc<Auth>,

    /// Client options
    pub options: ClientOptions,
}

impl InvoiceAi {
    /// Create a new InvoiceAI client
    ///
    /// # Arguments
    ///
    /// * `url` - The base URL of the InvoiceAI deployment
    /// * `key` - The API key for the auth gateway
    ///
    /// # Example
    ///
    /// ```
    /// use invoiceai::InvoiceAi;
    ///
    /// let client = InvoiceAi::new("https://api.invoiceai.example", "anon-key");
    /// ```
    pub fn new(url: &str, key: &str) -> Self {
        Self::new_with_options(url, key, ClientOptions::default())
    }

    /// Create a new InvoiceAI client with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use invoiceai::{config::ClientOptions, InvoiceAi};
    ///
    /// let options = ClientOptions::default().with_default_currency("EUR");
    /// let client = InvoiceAi::new_with_options(
    ///     "https://api.invoiceai.example",
    ///     "anon-key",
    ///     options,
    /// );
    /// ```
    pub fn new_with_options(url: &str, key: &str, options: ClientOptions) -> Self {
        let http_client = match options.request_timeout {
            Some(timeout) => Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            None => Client::new(),
        };

        let auth = Arc::new(Auth::new(url, key, http_client.clone(), options.clone()));

        Self {
            url: url.to_string(),
            key: key.to_string(),
            http_client,
            auth,
            options,
        }
    }

    /// The auth gateway client
    pub fn auth(&self) -> Arc<Auth> {
        self.auth.clone()
    }

    /// Create a processor for submitting invoices to the inference endpoint
    pub fn processor(&self) -> Processor {
        Processor::new(
            &self.url,
            self.http_client.clone(),
            self.auth.clone() as Arc<dyn TokenProvider>,
            self.options.clone(),
        )
    }

    /// Create a dashboard session around a new processor
    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(self.processor(), self.options.clone())
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::auth::{Auth, AuthSnapshot, Session, User};
    pub use crate::config::ClientOptions;
    pub use crate::dashboard::Dashboard;
    pub use crate::error::Error;
    pub use crate::invoice::InvoiceData;
    pub use crate::router::{AuthMode, Router, View};
    pub use crate::upload::{InvoiceFile, TokenProvider, UploadState};
    pub use crate::InvoiceAi;
}
