use thiserror::Error;

/// Every failure the engine can produce. All of these are ordinary values;
/// nothing in the engine panics on malformed input in release builds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Hunks are not sorted or overlap. This is an internal invariant
    /// violation; correct segmentation can never produce it. Asserted in
    /// debug builds; logged and recovered from in release.
    #[error("hunk list out of order at index {index}")]
    InvalidRange {
        /// Index of the first offending hunk in the session's hunk list.
        index: usize,
    },

    /// The given hunk id does not exist in the active session.
    #[error("unknown hunk id {0}")]
    UnknownHunkId(u32),

    /// A session operation was invoked with no active session. Treated as a
    /// logged no-op by the host, never a crash.
    #[error("no active review session")]
    SessionNotActive,

    /// `request_rewrite` was called while the document already has an active
    /// session. The caller must close or finish the existing one first.
    #[error("document already has an active review session")]
    AlreadyActive,

    /// Navigation was requested but every hunk is already resolved.
    #[error("no pending hunks remain")]
    NoPendingHunks,

    /// Differencing observed its cancellation flag and stopped early. The
    /// partial result is discarded; this never reaches the user.
    #[error("diff computation cancelled")]
    Cancelled,

    /// Session construction failed; the document keeps its prior state and
    /// no partially built session is ever observable.
    #[error("diff computation failed: {0}")]
    DiffComputationFailed(String),

    /// `finalize` was called while hunks are still pending. Pending hunks
    /// are never silently treated as rejected.
    #[error("{pending} hunk(s) are still pending review")]
    UnresolvedHunks {
        /// Number of hunks with `HunkStatus::Pending`.
        pending: usize,
    },
}

/// Convenience alias used throughout both crates.
pub type EngineResult<T> = Result<T, EngineError>;
