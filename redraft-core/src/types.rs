//! Owned data types for review sessions and their hunks.
//!
//! All types in this module are fully owned (no borrowed lifetimes) and
//! implement `Send`, so sessions can be built on a background thread and
//! transferred to the host thread that drives the review. Everything derives
//! serde with camelCase renames, so a session round-trips through JSON as a
//! plain structure for persistence and testing.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Classification of a hunk by which side of the change carries lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HunkKind {
    /// Lines exist only in the rewritten content (`original_lines` empty).
    Added,
    /// Lines exist only in the original content (`new_lines` empty).
    Removed,
    /// Both sides carry lines; a replacement region.
    Modified,
}

/// Per-hunk review decision. Mutable until finalize; a hunk may be flipped
/// between `Accepted` and `Rejected` any number of times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HunkStatus {
    /// No decision yet (the initial state of every hunk).
    #[default]
    Pending,
    /// The rewritten lines win at reconciliation.
    Accepted,
    /// The original lines are kept.
    Rejected,
}

/// A contiguous, classified region of change between the original and the
/// rewritten content.
///
/// Hunks carry no reference back to their owning session; operations address
/// them by `id` through the session, which keeps the data model cycle-free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffHunk {
    /// Stable identifier, unique within the session. Ids are assigned in
    /// ascending order by the segmenter when the session is built; hunks are
    /// never created afterwards, so an id is never reused within a session's
    /// lifetime.
    pub id: u32,
    /// First affected line, 0-indexed, in the *original* content's
    /// coordinate space.
    pub start_line: usize,
    /// One past the last affected original line (half-open). Equal to
    /// `start_line` for a pure insertion.
    pub end_line: usize,
    /// Exact original lines covered by `start_line..end_line`.
    pub original_lines: Vec<String>,
    /// Replacement lines; empty for a pure deletion.
    pub new_lines: Vec<String>,
    /// `Added` / `Removed` / `Modified` classification.
    pub kind: HunkKind,
    /// Current review decision, `Pending` by default.
    pub status: HunkStatus,
}

impl DiffHunk {
    /// True while no decision has been recorded for this hunk.
    pub fn is_pending(&self) -> bool {
        self.status == HunkStatus::Pending
    }
}

/// Counts of hunk decisions, for status-bar style display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    /// Hunks still awaiting a decision.
    pub pending: usize,
    /// Hunks whose rewritten lines will be kept.
    pub accepted: usize,
    /// Hunks whose original lines will be kept.
    pub rejected: usize,
}

/// Direction for moving the review focus between pending hunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    /// Move forward, wrapping from the last hunk to the first.
    Next,
    /// Move backward, wrapping from the first hunk to the last.
    Prev,
}

/// One review session over a single document rewrite.
///
/// The content snapshots are immutable once captured; only `hunks[_].status`,
/// `current_hunk_index`, and `is_active` change over the session's lifetime.
/// A document has at most one active session at any time; the host owns that
/// rule via an `Option<DiffSession>` slot, not a global.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSession {
    /// Session identity (UUID v4 text in serialized form). Used for logging
    /// and persistence, never for addressing operations.
    pub id: Uuid,
    /// Identifier of the reviewed document. A reference, not ownership; the
    /// host resolves it.
    pub file_id: String,
    /// Snapshot of the document content when the session started.
    pub original_content: String,
    /// The full rewritten content produced by the model.
    pub modified_content: String,
    /// All change regions, sorted strictly by `start_line`, non-overlapping.
    pub hunks: Vec<DiffHunk>,
    /// Index of the focused hunk, if any. When `Some`, the referenced hunk
    /// is always `Pending`.
    pub current_hunk_index: Option<usize>,
    /// Lowered when the session is closed or finalized.
    pub is_active: bool,
    /// Optional human-readable description of the rewrite, already
    /// normalized to plain text by the provider adapter.
    pub summary: Option<String>,
}
