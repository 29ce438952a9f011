//! Background thread that runs differencing off the interactive path.
//!
//! The LCS alignment is O(N·M) in the worst case, far too heavy to run on
//! the thread that handles user interaction for large documents. All
//! communication is via channels: `DiffRequest` in over crossbeam,
//! `EngineEvent` out over the tokio event bus. Each request carries its own
//! cancellation flag; the manager raises it when the request is superseded
//! or its document closes, and the differencer polls it between table rows.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use redraft_core::{DiffSession, EngineError};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::event::EngineEvent;

/// One differencing job sent from the manager to the worker thread.
#[derive(Debug)]
pub struct DiffRequest {
    /// Document the rewrite belongs to.
    pub file_id: String,
    /// Monotone sequence number; the manager only installs the result that
    /// still carries the latest issued sequence for the document.
    pub seq: u64,
    /// Snapshot of the document content when the request was issued.
    pub original: String,
    /// The full rewritten content from the model.
    pub modified: String,
    /// Optional plain-text description of the rewrite.
    pub summary: Option<String>,
    /// Raised by the manager to abandon the computation.
    pub cancel: Arc<AtomicBool>,
}

/// Spawns the diff worker on a dedicated thread and returns the request
/// sender. The worker exits when every sender clone is dropped.
pub fn spawn_diff_worker(event_tx: UnboundedSender<EngineEvent>) -> Sender<DiffRequest> {
    let (tx, rx) = unbounded();
    std::thread::spawn(move || diff_worker_loop(rx, event_tx));
    tx
}

/// Entry point for the worker thread.
///
/// Loops over incoming `DiffRequest` messages until the channel is closed
/// (sender dropped). Every request is answered with exactly one event:
/// `SessionReady` on success, `SessionAborted` on cancellation or failure.
/// Send errors are ignored: if the receiver is gone the host is shutting
/// down and the result is moot.
pub fn diff_worker_loop(rx: Receiver<DiffRequest>, event_tx: UnboundedSender<EngineEvent>) {
    for request in rx {
        let DiffRequest {
            file_id,
            seq,
            original,
            modified,
            summary,
            cancel,
        } = request;

        // A request can be superseded while still queued; skip the work
        // entirely instead of computing a result nobody will install.
        if cancel.load(Ordering::Relaxed) {
            debug!(file_id = %file_id, seq, "diff request cancelled before start");
            let _ = event_tx.send(EngineEvent::SessionAborted {
                file_id,
                seq,
                error: EngineError::Cancelled,
            });
            continue;
        }

        let event = match DiffSession::compute(
            file_id.clone(),
            original,
            modified,
            summary,
            Some(&cancel),
        ) {
            Ok(session) => EngineEvent::SessionReady {
                file_id,
                seq,
                session: Box::new(session),
            },
            Err(error) => {
                debug!(file_id = %file_id, seq, %error, "diff computation did not complete");
                EngineEvent::SessionAborted {
                    file_id,
                    seq,
                    error,
                }
            }
        };
        let _ = event_tx.send(event);
    }
}
