//! redraft: host integration for the diff review engine.
//!
//! `redraft-core` computes and reconciles review sessions; this crate
//! supplies everything a host editor needs around that: the document model
//! with its undo/redo history, the background worker that keeps heavy
//! differencing off the interactive thread, the event bus that carries
//! results back, and the [`manager::SessionManager`] that ties them together
//! with the single-active-session and latest-wins rules.
//!
//! # Typical wiring
//!
//! ```no_run
//! use redraft::manager::SessionManager;
//!
//! # async fn run() {
//! let (mut manager, mut events) = SessionManager::new();
//! manager.open_document("notes.md", "original text\n");
//! manager
//!     .request_rewrite("notes.md", "rewritten text\n".to_owned(), None)
//!     .unwrap();
//!
//! // Host loop: drain worker events back into the manager.
//! while let Some(event) = events.recv().await {
//!     manager.apply_event(event);
//!     if manager.session("notes.md").is_some() {
//!         break; // review UI takes over: navigate / accept / reject
//!     }
//! }
//! # }
//! ```

pub mod document;
pub mod event;
pub mod manager;
pub mod worker;

pub use document::{Document, EditRecord, InflightDiff};
pub use event::{EngineEvent, EventHandler};
pub use manager::SessionManager;
pub use worker::{spawn_diff_worker, DiffRequest};

pub use redraft_core::{
    DiffHunk, DiffSession, EngineError, EngineResult, HunkKind, HunkStatus, NavDirection,
    StatusSummary,
};
