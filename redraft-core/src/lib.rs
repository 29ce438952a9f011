//! redraft-core: the diff review engine.
//!
//! Given a document's original content and a full rewritten version produced
//! by an external model, this crate computes a line-level difference,
//! partitions it into independently reviewable hunks, tracks per-hunk
//! accept/reject decisions, and reconciles those decisions into a single
//! final document.
//!
//! Everything in this crate is pure, synchronous, and deterministic. The
//! companion `redraft` crate supplies the host-side pieces: the document
//! model with its undo history, the background diff worker, and the session
//! manager. Talking to model providers, rendering, and persistence are all
//! external collaborators; the engine only ever sees plain original and
//! modified text plus an optional summary string.
//!
//! # Pipeline
//!
//! ```text
//! modified content arrives
//!   → diff::diff_lines        (edit script)
//!   → hunks::segment_hunks    (classified hunks)
//!   → DiffSession             (navigate / accept / reject)
//!   → reconcile::materialize  (live preview)
//!   → reconcile::finalize     (single final document)
//! ```

pub mod diff;
pub mod error;
pub mod hunks;
pub mod reconcile;
mod session;
pub mod types;

pub use diff::{diff_lines, split_lines, EditOp};
pub use error::{EngineError, EngineResult};
pub use hunks::segment_hunks;
pub use reconcile::{finalize, materialize};
pub use types::{DiffHunk, DiffSession, HunkKind, HunkStatus, NavDirection, StatusSummary};
