//! The signed-in workspace: upload flow, session history and the
//! currently displayed result

use tokio::sync::watch;

use crate::config::ClientOptions;
use crate::error::Error;
use crate::history::{History, ProcessedInvoice};
use crate::invoice::InvoiceData;
use crate::render::{build_report, Report};
use crate::upload::{InvoiceFile, Processor, UploadState};

/// Snapshot of the result currently on display.
///
/// A snapshot, not a live reference: deleting the matching history entry
/// leaves the displayed result untouched.
#[derive(Debug, Clone)]
pub struct Selection {
    /// Name of the uploaded file
    pub file_name: String,

    /// The extracted payload
    pub data: InvoiceData,
}

/// Dashboard session around one processor and one session history
pub struct Dashboard {
    processor: Processor,
    history: History,
    selection: Option<Selection>,
    options: ClientOptions,
}

impl Dashboard {
    pub(crate) fn new(processor: Processor, options: ClientOptions) -> Self {
        Self {
            processor,
            history: History::new(),
            selection: None,
            options,
        }
    }

    /// Submit a file, record the extracted payload in the history and
    /// select it for display. On failure the history is left untouched.
    pub async fn process_file(&mut self, file: InvoiceFile) -> Result<&ProcessedInvoice, Error> {
        let file_name = file.name.clone();
        let data = self.processor.process(file).await?;

        self.selection = Some(Selection {
            file_name: file_name.clone(),
            data: data.clone(),
        });

        Ok(self.history.append(&file_name, data))
    }

    /// The session history, newest first
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Delete a history record by id. The displayed result is decoupled
    /// state and survives the delete.
    pub fn delete_record(&mut self, id: &str) -> bool {
        self.history.remove(id)
    }

    /// The result currently on display, if any
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Close the displayed result
    pub fn close_results(&mut self) {
        self.selection = None;
    }

    /// Build the display report for the current selection
    pub fn report(&self) -> Option<Report> {
        self.selection
            .as_ref()
            .map(|s| build_report(&s.data, &s.file_name, &self.options.default_currency))
    }

    /// Current upload state
    pub fn upload_state(&self) -> UploadState {
        self.processor.state()
    }

    /// Subscribe to upload-state changes
    pub fn subscribe_uploads(&self) -> watch::Receiver<UploadState> {
        self.processor.subscribe()
    }

    /// Wipe the session, e.g. on sign-out
    pub fn clear(&mut self) {
        self.history.clear();
        self.selection = None;
    }
}
