//! Reconciliation: turns the current hunk decisions back into document text.
//!
//! `materialize` is the live preview: always defined, with Pending treated
//! exactly like Rejected (keep the original lines). That conflation is
//! intentional and limited to previews: `finalize` refuses to run while any
//! hunk is Pending, so an undecided hunk can never be dropped silently.

use tracing::error;

use crate::diff::split_lines;
use crate::error::{EngineError, EngineResult};
use crate::types::{DiffSession, HunkStatus};

/// Computes the document text implied by the current decisions, without
/// finalizing anything.
///
/// Untouched spans between hunks are copied from the original verbatim;
/// Accepted hunks contribute their `new_lines`, everything else keeps
/// `original_lines`. With every hunk Accepted the result is byte-for-byte
/// `modified_content`; with every hunk Rejected (or still Pending) it is
/// byte-for-byte `original_content`.
pub fn materialize(session: &DiffSession) -> String {
    match try_materialize(session) {
        Ok(text) => text,
        Err(err) => {
            // Unreachable from correct segmentation. Keep the preview
            // well-defined anyway and fall back to the original snapshot.
            debug_assert!(false, "hunk invariant violation: {err}");
            error!(session = %session.id, %err, "hunk invariant violation, preview falls back to original");
            session.original_content.clone()
        }
    }
}

/// Commits the decisions into a single final document.
///
/// Fails with `UnresolvedHunks` while any hunk is Pending, leaving the
/// session active and untouched; the caller must resolve everything or bulk
/// accept/reject first. On success the session is destroyed (hunks cleared,
/// `is_active` lowered) and the reconciled text returned.
pub fn finalize(session: &mut DiffSession) -> EngineResult<String> {
    if !session.is_active {
        return Err(EngineError::SessionNotActive);
    }
    let pending = session.pending_count();
    if pending > 0 {
        return Err(EngineError::UnresolvedHunks { pending });
    }
    let text = try_materialize(session)?;
    session.close();
    Ok(text)
}

fn try_materialize(session: &DiffSession) -> EngineResult<String> {
    validate_hunk_order(session)?;

    let original = split_lines(&session.original_content);
    let mut out: Vec<&str> = Vec::with_capacity(original.len());
    let mut cursor = 0usize;

    for hunk in &session.hunks {
        out.extend_from_slice(&original[cursor..hunk.start_line]);
        let emitted = if hunk.status == HunkStatus::Accepted {
            &hunk.new_lines
        } else {
            &hunk.original_lines
        };
        out.extend(emitted.iter().map(String::as_str));
        cursor = hunk.end_line;
    }
    out.extend_from_slice(&original[cursor..]);

    Ok(out.join("\n"))
}

/// Checks that hunks are strictly sorted by `start_line`, pairwise
/// non-overlapping, and inside the original content's line range.
fn validate_hunk_order(session: &DiffSession) -> EngineResult<()> {
    let line_count = split_lines(&session.original_content).len();
    let mut prev_end = 0usize;
    let mut prev_start: Option<usize> = None;

    for (index, hunk) in session.hunks.iter().enumerate() {
        let sorted = prev_start.map_or(true, |p| hunk.start_line > p);
        let in_range = hunk.start_line <= hunk.end_line && hunk.end_line <= line_count;
        if !sorted || !in_range || hunk.start_line < prev_end {
            return Err(EngineError::InvalidRange { index });
        }
        prev_start = Some(hunk.start_line);
        prev_end = hunk.end_line;
    }
    Ok(())
}
