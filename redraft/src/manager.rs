//! Per-document session orchestration.
//!
//! `SessionManager` owns the open documents, the request channel to the diff
//! worker, and the monotone request sequence that implements the latest-wins
//! rule: only the result of the most recently issued differencing request is
//! ever installed into a document's session slot; superseded results are
//! discarded unconditionally, never merged.
//!
//! All session-mutation operations are synchronous and single-threaded;
//! they are invoked directly from user interaction, and a document owns at
//! most one active session, so no locking is involved. Operational failures
//! (`SessionNotActive`, `UnknownHunkId`, `NoPendingHunks`, `UnresolvedHunks`)
//! are logged, reported as values, and never tear the session down.

use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crossbeam_channel::Sender;
use redraft_core::{
    reconcile, DiffSession, EngineError, EngineResult, NavDirection, StatusSummary,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::document::{Document, InflightDiff};
use crate::event::{EngineEvent, EventHandler};
use crate::worker::{spawn_diff_worker, DiffRequest};

/// Owns documents and drives their review sessions.
pub struct SessionManager {
    documents: HashMap<String, Document>,
    worker_tx: Sender<DiffRequest>,
    next_seq: u64,
}

impl SessionManager {
    /// Creates a manager with its own diff worker thread.
    ///
    /// Returns the manager plus the event receiver the host loop must drain,
    /// handing each event back via [`SessionManager::apply_event`].
    pub fn new() -> (Self, UnboundedReceiver<EngineEvent>) {
        let handler = EventHandler::new();
        let worker_tx = spawn_diff_worker(handler.tx.clone());
        (
            Self {
                documents: HashMap::new(),
                worker_tx,
                next_seq: 0,
            },
            handler.rx,
        )
    }

    /// Registers a document, leaving any already-open document with the same
    /// id untouched.
    pub fn open_document(&mut self, file_id: impl Into<String>, content: impl Into<String>) {
        let file_id = file_id.into();
        self.documents
            .entry(file_id.clone())
            .or_insert_with(|| Document::new(file_id, content.into()));
    }

    /// Closes a document: cancels any in-flight diff request and destroys
    /// any active session without applying it.
    pub fn close_document(&mut self, file_id: &str) {
        if let Some(mut doc) = self.documents.remove(file_id) {
            doc.cancel_inflight();
            if let Some(mut session) = doc.review.take() {
                session.close();
                info!(file_id = %file_id, session = %session.id, "document closed, review discarded");
            }
        }
    }

    /// Read access to an open document.
    pub fn document(&self, file_id: &str) -> Option<&Document> {
        self.documents.get(file_id)
    }

    /// Mutable access to an open document (undo/redo lives on the document).
    pub fn document_mut(&mut self, file_id: &str) -> Option<&mut Document> {
        self.documents.get_mut(file_id)
    }

    /// The active review session for a document, if any: the hunk list with
    /// live statuses and the focused index, for rendering.
    pub fn session(&self, file_id: &str) -> Option<&DiffSession> {
        self.documents
            .get(file_id)
            .and_then(|doc| doc.review.as_ref())
            .filter(|s| s.is_active)
    }

    /// Starts a review by queueing differencing on the background worker.
    ///
    /// Fails with `AlreadyActive` while the document has an active session.
    /// An in-flight request is superseded: its cancellation flag is raised
    /// and its eventual result will be discarded by the sequence check in
    /// [`SessionManager::apply_event`]. Returns the request sequence number.
    pub fn request_rewrite(
        &mut self,
        file_id: &str,
        modified: String,
        summary: Option<String>,
    ) -> EngineResult<u64> {
        let doc = self.document_for_op(file_id)?;
        if doc.review.as_ref().is_some_and(|s| s.is_active) {
            warn!(file_id = %file_id, "rewrite refused, review already active");
            return Err(EngineError::AlreadyActive);
        }
        doc.cancel_inflight();

        self.next_seq += 1;
        let seq = self.next_seq;
        let cancel = Arc::new(AtomicBool::new(false));
        let doc = self
            .documents
            .get_mut(file_id)
            .ok_or(EngineError::SessionNotActive)?;
        doc.inflight = Some(InflightDiff {
            seq,
            cancel: Arc::clone(&cancel),
        });
        let request = DiffRequest {
            file_id: doc.file_id.clone(),
            seq,
            original: doc.content().to_owned(),
            modified,
            summary,
            cancel,
        };
        if self.worker_tx.send(request).is_err() {
            doc.inflight = None;
            return Err(EngineError::DiffComputationFailed(
                "diff worker is not running".to_owned(),
            ));
        }
        debug!(file_id = %file_id, seq, "diff request queued");
        Ok(seq)
    }

    /// Synchronous variant of [`SessionManager::request_rewrite`] for small
    /// documents: differencing and segmentation run inline and the session
    /// is installed immediately. Returns the new session's id.
    pub fn start_session_sync(
        &mut self,
        file_id: &str,
        modified: String,
        summary: Option<String>,
    ) -> EngineResult<Uuid> {
        let doc = self.document_for_op(file_id)?;
        if doc.review.as_ref().is_some_and(|s| s.is_active) {
            warn!(file_id = %file_id, "rewrite refused, review already active");
            return Err(EngineError::AlreadyActive);
        }
        doc.cancel_inflight();

        let session = DiffSession::compute(
            doc.file_id.clone(),
            doc.content().to_owned(),
            modified,
            summary,
            None,
        )?;
        let id = session.id;
        info!(file_id = %file_id, session = %id, hunks = session.hunks.len(), "review session started");
        doc.review = Some(session);
        Ok(id)
    }

    /// Applies a worker result to the owning document's session slot.
    ///
    /// Results are installed only when (a) the document is still open,
    /// (b) the sequence number is still the latest issued one, and (c) no
    /// session became active in the meantime. Everything else is discarded.
    pub fn apply_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::SessionReady {
                file_id,
                seq,
                session,
            } => {
                let Some(doc) = self.documents.get_mut(&file_id) else {
                    debug!(file_id = %file_id, seq, "document closed, diff result discarded");
                    return;
                };
                if doc.inflight.as_ref().map(|i| i.seq) != Some(seq) {
                    debug!(file_id = %file_id, seq, "superseded diff result discarded");
                    return;
                }
                doc.inflight = None;
                if doc.review.as_ref().is_some_and(|s| s.is_active) {
                    // Requests are refused while a review is active, so this
                    // can only happen if a sync start raced the worker.
                    warn!(file_id = %file_id, seq, "review already active, diff result discarded");
                    return;
                }
                info!(
                    file_id = %file_id,
                    session = %session.id,
                    hunks = session.hunks.len(),
                    "review session started"
                );
                doc.review = Some(*session);
            }
            EngineEvent::SessionAborted {
                file_id,
                seq,
                error,
            } => {
                if let Some(doc) = self.documents.get_mut(&file_id) {
                    if doc.inflight.as_ref().map(|i| i.seq) == Some(seq) {
                        doc.inflight = None;
                    }
                }
                match error {
                    EngineError::Cancelled => {
                        debug!(file_id = %file_id, seq, "diff request cancelled")
                    }
                    error => {
                        warn!(file_id = %file_id, seq, %error, "diff computation failed")
                    }
                }
            }
        }
    }

    /// Moves the review focus to the next/previous pending hunk.
    pub fn navigate(&mut self, file_id: &str, direction: NavDirection) -> EngineResult<usize> {
        let result = self.session_mut(file_id)?.navigate(direction);
        if result == Err(EngineError::NoPendingHunks) {
            debug!(file_id = %file_id, "navigation no-op, nothing pending");
        }
        result
    }

    /// Accepts the hunk with the given id. Idempotent; auto-advances the
    /// focus when the focused hunk is decided.
    pub fn accept(&mut self, file_id: &str, hunk_id: u32) -> EngineResult<()> {
        let result = self.session_mut(file_id)?.accept(hunk_id);
        if let Err(error) = &result {
            warn!(file_id = %file_id, hunk_id, %error, "accept ignored");
        }
        result
    }

    /// Rejects the hunk with the given id. Same rules as `accept`.
    pub fn reject(&mut self, file_id: &str, hunk_id: u32) -> EngineResult<()> {
        let result = self.session_mut(file_id)?.reject(hunk_id);
        if let Err(error) = &result {
            warn!(file_id = %file_id, hunk_id, %error, "reject ignored");
        }
        result
    }

    /// Accepts every hunk and completes the review: the reconciled text is
    /// committed through the undo bridge and the session is destroyed.
    pub fn accept_all(&mut self, file_id: &str) -> EngineResult<String> {
        self.session_mut(file_id)?.accept_all()?;
        self.finalize(file_id)
    }

    /// Rejects every hunk and completes the review. The document keeps its
    /// pre-session content, so no undo entry is pushed.
    pub fn reject_all(&mut self, file_id: &str) -> EngineResult<String> {
        self.session_mut(file_id)?.reject_all()?;
        self.finalize(file_id)
    }

    /// Live decision counts for display.
    pub fn status_summary(&self, file_id: &str) -> EngineResult<StatusSummary> {
        self.session(file_id)
            .map(|s| s.status_summary())
            .ok_or(EngineError::SessionNotActive)
    }

    /// The document text implied by the current decisions, the live
    /// preview. Pending hunks keep their original lines.
    pub fn preview(&self, file_id: &str) -> EngineResult<String> {
        self.session(file_id)
            .map(reconcile::materialize)
            .ok_or(EngineError::SessionNotActive)
    }

    /// Discards the session without applying any change, returning the
    /// document to its pre-session state.
    pub fn close_session(&mut self, file_id: &str) -> EngineResult<()> {
        let doc = self.document_for_op(file_id)?;
        match doc.review.take() {
            Some(mut session) if session.is_active => {
                session.close();
                info!(file_id = %file_id, session = %session.id, "review session closed");
                Ok(())
            }
            _ => {
                warn!(file_id = %file_id, "close ignored, no active session");
                Err(EngineError::SessionNotActive)
            }
        }
    }

    /// Commits the decisions into the document as one atomic undo entry.
    ///
    /// Fails with `UnresolvedHunks` while any hunk is Pending, leaving the
    /// session active; callers must resolve everything or bulk
    /// accept/reject first. One finalize produces at most one undo entry,
    /// regardless of hunk count; a content-preserving result pushes none.
    pub fn finalize(&mut self, file_id: &str) -> EngineResult<String> {
        let doc = self.document_for_op(file_id)?;
        let Some(session) = doc.review.as_mut().filter(|s| s.is_active) else {
            warn!(file_id = %file_id, "finalize ignored, no active session");
            return Err(EngineError::SessionNotActive);
        };

        let label = session
            .summary
            .clone()
            .unwrap_or_else(|| "AI rewrite".to_owned());
        let session_id = session.id;
        let text = match reconcile::finalize(session) {
            Ok(text) => text,
            Err(error) => {
                warn!(file_id = %file_id, session = %session_id, %error, "finalize refused");
                return Err(error);
            }
        };

        doc.review = None;
        let committed = doc.commit_edit(text.clone(), label);
        info!(file_id = %file_id, session = %session_id, committed, "review finalized");
        Ok(text)
    }

    fn document_for_op(&mut self, file_id: &str) -> EngineResult<&mut Document> {
        match self.documents.get_mut(file_id) {
            Some(doc) => Ok(doc),
            None => {
                warn!(file_id = %file_id, "operation on unknown document ignored");
                Err(EngineError::SessionNotActive)
            }
        }
    }

    fn session_mut(&mut self, file_id: &str) -> EngineResult<&mut DiffSession> {
        let doc = self.document_for_op(file_id)?;
        match doc.review.as_mut().filter(|s| s.is_active) {
            Some(session) => Ok(session),
            None => {
                warn!(file_id = %file_id, "operation with no active session ignored");
                Err(EngineError::SessionNotActive)
            }
        }
    }
}
