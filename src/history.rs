//! In-memory record of invoices processed during the current session

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::invoice::InvoiceData;

/// A processed invoice retained for the session. Records are never mutated;
/// they leave the list only through an explicit delete.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedInvoice {
    /// Opaque id, unique within the session
    pub id: String,

    /// Name of the uploaded file
    pub file_name: String,

    /// The extracted payload
    pub data: InvoiceData,

    /// When the payload was received
    pub received_at: DateTime<Utc>,
}

/// Ordered, newest-first list of processed invoices.
///
/// Ordering is insertion order, not timestamp order. Nothing is persisted;
/// the list lives and dies with the session.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<ProcessedInvoice>,
    seq: u64,
}

impl History {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a processed invoice and return the stored entry.
    ///
    /// Ids are time-derived with a sequence suffix so they stay unique
    /// within the session even when appends share a millisecond.
    pub fn append(&mut self, file_name: &str, data: InvoiceData) -> &ProcessedInvoice {
        let received_at = Utc::now();
        self.seq += 1;
        let id = format!("{}-{}", received_at.timestamp_millis(), self.seq);

        self.entries.insert(
            0,
            ProcessedInvoice {
                id,
                file_name: file_name.to_string(),
                data,
                received_at,
            },
        );
        &self.entries[0]
    }

    /// Remove the record with the given id. Unknown ids are a no-op;
    /// returns whether a record was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Look up a record by id
    pub fn get(&self, id: &str) -> Option<&ProcessedInvoice> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// All records, newest first
    pub fn list(&self) -> &[ProcessedInvoice] {
        &self.entries
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every record, e.g. on sign-out
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str) -> InvoiceData {
        InvoiceData {
            file_name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn lists_newest_first() {
        let mut history = History::new();
        history.append("a.pdf", payload("a.pdf"));
        history.append("b.pdf", payload("b.pdf"));
        history.append("c.pdf", payload("c.pdf"));

        let names: Vec<_> = history.list().iter().map(|e| e.file_name.as_str()).collect();
        assert_eq!(names, ["c.pdf", "b.pdf", "a.pdf"]);
    }

    #[test]
    fn ids_are_unique_within_a_session() {
        let mut history = History::new();
        for i in 0..50 {
            history.append(&format!("{i}.pdf"), InvoiceData::default());
        }

        let mut ids: Vec<_> = history.list().iter().map(|e| e.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn delete_by_id_preserves_order_of_the_rest() {
        let mut history = History::new();
        history.append("a.pdf", payload("a.pdf"));
        let doomed = history.append("b.pdf", payload("b.pdf")).id.clone();
        history.append("c.pdf", payload("c.pdf"));

        assert!(history.get(&doomed).is_some());
        assert!(history.remove(&doomed));
        assert!(history.get(&doomed).is_none());

        let names: Vec<_> = history.list().iter().map(|e| e.file_name.as_str()).collect();
        assert_eq!(names, ["c.pdf", "a.pdf"]);
    }

    #[test]
    fn deleting_unknown_id_is_a_noop() {
        let mut history = History::new();
        history.append("a.pdf", payload("a.pdf"));

        assert!(!history.remove("no-such-id"));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn clear_wipes_everything() {
        let mut history = History::new();
        history.append("a.pdf", payload("a.pdf"));
        history.clear();
        assert!(history.is_empty());
    }
}
