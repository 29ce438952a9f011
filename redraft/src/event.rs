//! Event bus for the host layer.
//!
//! Results from the background diff worker are normalised into a single
//! `EngineEvent` enum and sent over a tokio unbounded MPSC channel. The host
//! loop receives from this channel and hands each event to
//! [`crate::manager::SessionManager::apply_event`].

use redraft_core::{DiffSession, EngineError};
use tokio::sync::mpsc;

/// All events the host can receive from background work.
///
/// Marked `#[non_exhaustive]` so that new variants (e.g. streaming rewrite
/// progress) do not break exhaustive match arms in existing handlers.
#[derive(Debug)]
#[non_exhaustive]
pub enum EngineEvent {
    /// A computed review session from the diff worker.
    ///
    /// Boxed to keep the enum variant small on the channel; a session holds
    /// both full content snapshots and can be large.
    SessionReady {
        /// Document the session was computed for.
        file_id: String,
        /// The request sequence number this result answers. The manager
        /// installs the session only if this is still the latest issued
        /// sequence for the document.
        seq: u64,
        /// The fully built session, focus unset.
        session: Box<DiffSession>,
    },
    /// Differencing stopped without producing a session, either because its
    /// cancellation flag was raised or because computation failed.
    SessionAborted {
        /// Document the request belonged to.
        file_id: String,
        /// The request sequence number that was abandoned.
        seq: u64,
        /// `Cancelled` for cooperative cancellation, otherwise the failure.
        error: EngineError,
    },
}

/// Holds the sender and receiver ends of the unified event channel.
///
/// The sender (`tx`) is cloned into each background worker; the receiver
/// (`rx`) is owned by the host loop.
pub struct EventHandler {
    /// Send half. Clone this for each background task that produces events.
    pub tx: mpsc::UnboundedSender<EngineEvent>,
    /// Receive half, owned by the host loop; call `.recv().await` to block
    /// until the next event.
    pub rx: mpsc::UnboundedReceiver<EngineEvent>,
}

impl EventHandler {
    /// Creates a new `EventHandler` with a fresh unbounded channel.
    ///
    /// The producer side emits at most one event per issued diff request, so
    /// the channel never grows past the number of requests in flight.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
