//! The host document model: content, undo/redo history, and the
//! per-document review slot.
//!
//! The review session lives in an explicit `Option` owned by the document,
//! not a process-wide singleton, so at most one session can ever be active
//! per document and the lifecycle is testable in isolation. Finalized
//! reconciliations enter the undo history as a single atomic entry, one per
//! finalize regardless of hunk count.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use redraft_core::DiffSession;
use tracing::debug;

/// One atomic entry in a document's undo history.
#[derive(Debug, Clone)]
pub struct EditRecord {
    /// Full content before the edit.
    pub before: String,
    /// Full content after the edit.
    pub after: String,
    /// Human-readable description (the rewrite summary when available).
    pub label: String,
}

/// Bookkeeping for a diff request that has been issued but not yet answered.
#[derive(Debug)]
pub struct InflightDiff {
    /// Sequence number of the latest issued request for this document.
    pub seq: u64,
    /// Shared with the worker; raise to abandon the computation.
    pub cancel: Arc<AtomicBool>,
}

impl InflightDiff {
    /// Raises the cancellation flag for the worker to observe.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

/// A single open document as the engine sees it.
pub struct Document {
    /// Host-assigned identifier; sessions reference it, never own it.
    pub file_id: String,
    content: String,
    undo_stack: Vec<EditRecord>,
    redo_stack: Vec<EditRecord>,
    /// The active review session, if any. `None` both before a rewrite
    /// arrives and after the session is closed or finalized.
    pub review: Option<DiffSession>,
    /// The latest in-flight diff request, if any.
    pub inflight: Option<InflightDiff>,
}

impl Document {
    /// Opens a document with the given initial content and an empty history.
    pub fn new(file_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            content: content.into(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            review: None,
            inflight: None,
        }
    }

    /// Current document text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Number of entries available to `undo`.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Commits `after` as one atomic edit, pushing a single undo entry and
    /// clearing the redo stack. A content-preserving commit pushes nothing
    /// and returns `false`.
    pub fn commit_edit(&mut self, after: String, label: impl Into<String>) -> bool {
        if after == self.content {
            return false;
        }
        let record = EditRecord {
            before: std::mem::replace(&mut self.content, after.clone()),
            after,
            label: label.into(),
        };
        self.undo_stack.push(record);
        self.redo_stack.clear();
        true
    }

    /// Reverts the most recent edit in one step. Returns `false` with the
    /// history empty.
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(record) => {
                self.content = record.before.clone();
                self.redo_stack.push(record);
                true
            }
            None => false,
        }
    }

    /// Re-applies the most recently undone edit in one step.
    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(record) => {
                self.content = record.after.clone();
                self.undo_stack.push(record);
                true
            }
            None => false,
        }
    }

    /// Cancels any in-flight diff request, leaving the document otherwise
    /// untouched. Called on document close and when a newer request
    /// supersedes the current one.
    pub fn cancel_inflight(&mut self) {
        if let Some(inflight) = self.inflight.take() {
            debug!(file_id = %self.file_id, seq = inflight.seq, "cancelling in-flight diff");
            inflight.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_pushes_one_entry_and_undo_reverts_it() {
        let mut doc = Document::new("a.txt", "one\ntwo\n");
        assert!(doc.commit_edit("one\n2\n".into(), "rewrite"));
        assert_eq!(doc.undo_depth(), 1);
        assert_eq!(doc.content(), "one\n2\n");

        assert!(doc.undo());
        assert_eq!(doc.content(), "one\ntwo\n");
        assert!(doc.redo());
        assert_eq!(doc.content(), "one\n2\n");
    }

    #[test]
    fn identical_commit_is_skipped() {
        let mut doc = Document::new("a.txt", "same");
        assert!(!doc.commit_edit("same".into(), "no-op"));
        assert_eq!(doc.undo_depth(), 0);
        assert!(!doc.undo());
    }

    #[test]
    fn new_commit_clears_the_redo_stack() {
        let mut doc = Document::new("a.txt", "v1");
        doc.commit_edit("v2".into(), "first");
        doc.undo();
        doc.commit_edit("v3".into(), "divergent");
        assert!(!doc.redo(), "redo history is gone after a new commit");
        assert_eq!(doc.content(), "v3");
    }

    #[test]
    fn cancel_inflight_raises_the_shared_flag() {
        let mut doc = Document::new("a.txt", "");
        let cancel = Arc::new(AtomicBool::new(false));
        doc.inflight = Some(InflightDiff {
            seq: 7,
            cancel: Arc::clone(&cancel),
        });
        doc.cancel_inflight();
        assert!(cancel.load(Ordering::Relaxed));
        assert!(doc.inflight.is_none());
    }
}
