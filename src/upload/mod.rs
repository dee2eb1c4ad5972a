//! Upload controller for submitting invoices to the inference endpoint
//!
//! One multipart POST per invoice, authenticated with a bearer token from
//! the auth gateway. Progress is synthesized on a fixed timer purely for
//! feedback and is observable through a watch channel, together with the
//! rest of the upload lifecycle.

mod types;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{multipart, Client};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::ClientOptions;
use crate::error::Error;
use crate::invoice::InvoiceData;

pub use types::*;

/// Progress ceiling held until the real response arrives
const PROGRESS_HOLD: u8 = 90;

/// Source of bearer tokens for authenticated endpoint calls
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return a token proving the caller's identity, or
    /// [`Error::Unauthenticated`] when none is available
    async fn access_token(&self) -> Result<String, Error>;
}

/// Client that submits invoices to the inference endpoint, one at a time
pub struct Processor {
    /// The base URL of the InvoiceAI deployment
    url: String,

    /// HTTP client used for requests
    client: Client,

    /// Where bearer tokens come from
    tokens: Arc<dyn TokenProvider>,

    /// Publisher for the upload lifecycle
    state: Arc<watch::Sender<UploadState>>,

    /// Guard enforcing a single upload in flight
    in_flight: Arc<AtomicBool>,

    /// Client options
    options: ClientOptions,
}

impl Processor {
    /// Create a new Processor
    pub fn new(
        url: &str,
        client: Client,
        tokens: Arc<dyn TokenProvider>,
        options: ClientOptions,
    ) -> Self {
        let (state, _) = watch::channel(UploadState::default());

        Self {
            url: url.to_string(),
            client,
            tokens,
            state: Arc::new(state),
            in_flight: Arc::new(AtomicBool::new(false)),
            options,
        }
    }

    /// Subscribe to upload-state changes. The receiver always holds the
    /// most recent state.
    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.state.subscribe()
    }

    /// Current upload state
    pub fn state(&self) -> UploadState {
        self.state.borrow().clone()
    }

    /// Submit a single file for processing and return the extracted payload.
    ///
    /// Unsupported media types are rejected before any other work, with no
    /// network call and no state transition. Only one upload may be in
    /// flight per processor; a concurrent call fails fast with
    /// [`Error::UploadInProgress`].
    pub async fn process(&self, file: InvoiceFile) -> Result<InvoiceData, Error> {
        file.ensure_supported()?;

        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(Error::UploadInProgress);
        }
        // Re-arms to Idle and releases the flag on every exit path,
        // including cancellation of this future.
        let _flight = FlightGuard {
            flag: self.in_flight.clone(),
            state: self.state.clone(),
        };

        let file_name = file.name.clone();
        self.state.send_replace(UploadState::Uploading {
            progress: 0,
            file_name: file_name.clone(),
        });

        let ticker = AbortOnDrop(self.spawn_ticker());

        // The token is fetched immediately before the request; without one
        // the endpoint is never contacted.
        let token = match self.tokens.access_token().await {
            Ok(token) => token,
            Err(err) => return Err(self.fail(err)),
        };

        let part = multipart::Part::bytes(file.bytes)
            .file_name(file.name.clone())
            .mime_str(&file.media_type)
            .map_err(|err| self.fail(err.into()))?;
        let form = multipart::Form::new().part("file", part);

        let url = format!("{}/process-invoice", self.url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .multipart(form)
            .send()
            .await
            .map_err(|err| self.fail(err.into()))?;

        // Stop synthesizing progress as soon as the response lands.
        drop(ticker);

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), file = %file_name, "upload rejected");
            let message = status
                .canonical_reason()
                .unwrap_or("upload failed")
                .to_string();
            return Err(self.fail(Error::UploadRejected {
                status: status.as_u16(),
                message,
            }));
        }

        let data = response
            .json::<InvoiceData>()
            .await
            .map_err(|err| self.fail(err.into()))?;

        tracing::debug!(file = %file_name, "invoice processed");
        self.state.send_replace(UploadState::Uploading {
            progress: 100,
            file_name,
        });

        // Cosmetic pause so observers can render the completed bar.
        tokio::time::sleep(self.options.settle_delay).await;
        self.state.send_replace(UploadState::Succeeded);

        Ok(data)
    }

    /// Advance the synthesized progress by 10 per tick, holding at
    /// [`PROGRESS_HOLD`] until the upload settles.
    fn spawn_ticker(&self) -> JoinHandle<()> {
        let state = self.state.clone();
        let tick = self.options.progress_tick;

        tokio::spawn(async move {
            let mut timer = tokio::time::interval(tick);
            timer.tick().await;
            loop {
                timer.tick().await;
                // Atomic read-modify-write so a late tick can never lower a
                // progress value the response path has already raised.
                let advanced = state.send_if_modified(|current| {
                    if let UploadState::Uploading { progress, .. } = current {
                        if *progress < PROGRESS_HOLD {
                            *progress += 10;
                            return true;
                        }
                    }
                    false
                });
                if !advanced {
                    break;
                }
            }
        })
    }

    fn fail(&self, err: Error) -> Error {
        self.state.send_replace(UploadState::Failed {
            message: err.to_string(),
        });
        err
    }
}

struct FlightGuard {
    flag: Arc<AtomicBool>,
    state: Arc<watch::Sender<UploadState>>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.state.send_replace(UploadState::Idle);
        self.flag.store(false, Ordering::SeqCst);
    }
}

struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}
