//! The session state machine: construction, focus navigation, and per-hunk
//! decisions.
//!
//! Everything here is synchronous and single-threaded; a document
//! owns at most one active session and the host never invokes operations on
//! it concurrently, so no locking is needed. The host-side manager wraps
//! these methods with logging and document bookkeeping.

use std::sync::atomic::AtomicBool;

use uuid::Uuid;

use crate::diff::{diff_lines, split_lines};
use crate::error::{EngineError, EngineResult};
use crate::hunks::segment_hunks;
use crate::types::{DiffSession, HunkStatus, NavDirection, StatusSummary};

impl DiffSession {
    /// Runs differencing and segmentation and assembles a fresh session with
    /// no focused hunk.
    ///
    /// Construction either fully succeeds or fails with a value; a partially
    /// built session is never observable. `cancel` is forwarded to the
    /// differencer so a background caller can abandon the work.
    pub fn compute(
        file_id: impl Into<String>,
        original_content: String,
        modified_content: String,
        summary: Option<String>,
        cancel: Option<&AtomicBool>,
    ) -> EngineResult<Self> {
        let old_lines = split_lines(&original_content);
        let new_lines = split_lines(&modified_content);
        let script = diff_lines(&old_lines, &new_lines, cancel)?;
        let hunks = segment_hunks(&script, &old_lines, &new_lines);

        Ok(Self {
            id: Uuid::new_v4(),
            file_id: file_id.into(),
            original_content,
            modified_content,
            hunks,
            current_hunk_index: None,
            is_active: true,
            summary,
        })
    }

    /// Moves focus to the nearest Pending hunk in `direction`, skipping
    /// resolved hunks and wrapping around. Returns the new focus index.
    ///
    /// With no focus yet, `Next` starts at the first hunk and `Prev` at the
    /// last. When nothing is Pending the focus is cleared and
    /// `EngineError::NoPendingHunks` reports the (recoverable) no-op.
    pub fn navigate(&mut self, direction: NavDirection) -> EngineResult<usize> {
        if !self.is_active {
            return Err(EngineError::SessionNotActive);
        }
        let found = match direction {
            NavDirection::Next => self.next_pending_after(self.current_hunk_index),
            NavDirection::Prev => self.prev_pending_before(self.current_hunk_index),
        };
        match found {
            Some(idx) => {
                self.current_hunk_index = Some(idx);
                Ok(idx)
            }
            None => {
                self.current_hunk_index = None;
                Err(EngineError::NoPendingHunks)
            }
        }
    }

    /// Records an Accept decision for the hunk with id `hunk_id`.
    ///
    /// Idempotent: accepting an already-accepted hunk changes nothing.
    /// Decisions stay mutable until finalize; a Rejected hunk may be flipped
    /// to Accepted here. If the decided hunk was focused, focus auto-advances
    /// to the next Pending hunk (same skip rule as `navigate(Next)`).
    pub fn accept(&mut self, hunk_id: u32) -> EngineResult<()> {
        self.decide(hunk_id, HunkStatus::Accepted)
    }

    /// Records a Reject decision for the hunk with id `hunk_id`.
    ///
    /// Same idempotence and auto-advance rules as [`DiffSession::accept`].
    pub fn reject(&mut self, hunk_id: u32) -> EngineResult<()> {
        self.decide(hunk_id, HunkStatus::Rejected)
    }

    /// Marks every hunk Accepted and clears the focus.
    pub fn accept_all(&mut self) -> EngineResult<()> {
        self.sweep(HunkStatus::Accepted)
    }

    /// Marks every hunk Rejected and clears the focus.
    pub fn reject_all(&mut self) -> EngineResult<()> {
        self.sweep(HunkStatus::Rejected)
    }

    /// Counts hunks by decision, for display.
    pub fn status_summary(&self) -> StatusSummary {
        let mut summary = StatusSummary::default();
        for hunk in &self.hunks {
            match hunk.status {
                HunkStatus::Pending => summary.pending += 1,
                HunkStatus::Accepted => summary.accepted += 1,
                HunkStatus::Rejected => summary.rejected += 1,
            }
        }
        summary
    }

    /// Number of hunks still awaiting a decision.
    pub fn pending_count(&self) -> usize {
        self.hunks.iter().filter(|h| h.is_pending()).count()
    }

    /// Destroys the session in place: hunks cleared, focus dropped,
    /// `is_active` lowered. The content snapshots are kept so a finalized
    /// result can still be inspected by the host.
    pub fn close(&mut self) {
        self.hunks.clear();
        self.current_hunk_index = None;
        self.is_active = false;
    }

    fn decide(&mut self, hunk_id: u32, status: HunkStatus) -> EngineResult<()> {
        if !self.is_active {
            return Err(EngineError::SessionNotActive);
        }
        let idx = self
            .hunks
            .iter()
            .position(|h| h.id == hunk_id)
            .ok_or(EngineError::UnknownHunkId(hunk_id))?;

        if self.hunks[idx].status == status {
            return Ok(());
        }
        self.hunks[idx].status = status;

        if self.current_hunk_index == Some(idx) {
            self.current_hunk_index = self.next_pending_after(Some(idx));
        }
        Ok(())
    }

    fn sweep(&mut self, status: HunkStatus) -> EngineResult<()> {
        if !self.is_active {
            return Err(EngineError::SessionNotActive);
        }
        for hunk in &mut self.hunks {
            hunk.status = status;
        }
        self.current_hunk_index = None;
        Ok(())
    }

    /// First Pending hunk strictly after `from` in wrap-around order, or the
    /// first Pending hunk overall when `from` is `None`.
    fn next_pending_after(&self, from: Option<usize>) -> Option<usize> {
        let len = self.hunks.len();
        if len == 0 {
            return None;
        }
        let start = from.map(|i| i + 1).unwrap_or(0);
        (0..len)
            .map(|step| (start + step) % len)
            .find(|&idx| self.hunks[idx].is_pending())
    }

    /// Last Pending hunk strictly before `from` in wrap-around order, or the
    /// last Pending hunk overall when `from` is `None`.
    fn prev_pending_before(&self, from: Option<usize>) -> Option<usize> {
        let len = self.hunks.len();
        if len == 0 {
            return None;
        }
        let start = from.unwrap_or(0);
        (1..=len)
            .map(|step| (start + len - step) % len)
            .find(|&idx| self.hunks[idx].is_pending())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_hunk_session() -> DiffSession {
        let original = "a\nb\nc\nd\ne".to_owned();
        let modified = "a\nB\nc\nD\ne\nf".to_owned();
        let session =
            DiffSession::compute("doc-1", original, modified, None, None).unwrap();
        assert_eq!(session.hunks.len(), 3, "fixture expects three hunks");
        session
    }

    #[test]
    fn navigation_skips_resolved_hunks_and_wraps() {
        let mut s = three_hunk_session();
        assert_eq!(s.navigate(NavDirection::Next).unwrap(), 0);

        let first_id = s.hunks[0].id;
        s.accept(first_id).unwrap();
        // Auto-advanced off the resolved hunk already.
        assert_eq!(s.current_hunk_index, Some(1));

        assert_eq!(s.navigate(NavDirection::Next).unwrap(), 2);
        assert_eq!(s.navigate(NavDirection::Next).unwrap(), 1, "wraps past resolved 0");
        assert_eq!(s.navigate(NavDirection::Prev).unwrap(), 2);
    }

    #[test]
    fn navigate_prev_from_no_focus_lands_on_last_pending() {
        let mut s = three_hunk_session();
        assert_eq!(s.navigate(NavDirection::Prev).unwrap(), 2);
    }

    #[test]
    fn navigation_with_nothing_pending_clears_focus() {
        let mut s = three_hunk_session();
        s.accept_all().unwrap();
        assert_eq!(
            s.navigate(NavDirection::Next),
            Err(EngineError::NoPendingHunks)
        );
        assert_eq!(s.current_hunk_index, None);
    }

    #[test]
    fn decisions_are_idempotent_and_reversible() {
        let mut s = three_hunk_session();
        let id = s.hunks[1].id;

        s.accept(id).unwrap();
        let after_once = s.clone();
        s.accept(id).unwrap();
        assert_eq!(s.hunks, after_once.hunks, "second accept is a no-op");
        assert_eq!(s.current_hunk_index, after_once.current_hunk_index);

        s.reject(id).unwrap();
        assert_eq!(s.hunks[1].status, HunkStatus::Rejected, "decision flipped");
    }

    #[test]
    fn deciding_the_focused_hunk_advances_focus() {
        let mut s = three_hunk_session();
        s.navigate(NavDirection::Next).unwrap();
        let id = s.hunks[0].id;
        s.reject(id).unwrap();
        assert_eq!(s.current_hunk_index, Some(1));
        // Focus always references a Pending hunk.
        assert!(s.hunks[1].is_pending());
    }

    #[test]
    fn resolving_the_last_pending_hunk_clears_focus() {
        let mut s = three_hunk_session();
        let ids: Vec<u32> = s.hunks.iter().map(|h| h.id).collect();
        s.navigate(NavDirection::Next).unwrap();
        for id in ids {
            s.accept(id).unwrap();
        }
        assert_eq!(s.current_hunk_index, None);
        assert_eq!(s.pending_count(), 0);
    }

    #[test]
    fn unknown_hunk_id_is_reported_and_changes_nothing() {
        let mut s = three_hunk_session();
        let before = s.clone();
        assert_eq!(s.accept(999), Err(EngineError::UnknownHunkId(999)));
        assert_eq!(s.hunks, before.hunks);
    }

    #[test]
    fn operations_on_a_closed_session_report_not_active() {
        let mut s = three_hunk_session();
        s.close();
        assert!(!s.is_active);
        assert!(s.hunks.is_empty(), "close clears the hunk list");
        assert_eq!(s.accept(0), Err(EngineError::SessionNotActive));
        assert_eq!(
            s.navigate(NavDirection::Next),
            Err(EngineError::SessionNotActive)
        );
    }

    #[test]
    fn status_summary_counts_every_state() {
        let mut s = three_hunk_session();
        let (a, b) = (s.hunks[0].id, s.hunks[1].id);
        s.accept(a).unwrap();
        s.reject(b).unwrap();
        let summary = s.status_summary();
        assert_eq!(
            (summary.pending, summary.accepted, summary.rejected),
            (1, 1, 1)
        );
    }

    #[test]
    fn identical_contents_build_an_empty_session() {
        let s = DiffSession::compute("doc", "same\n".into(), "same\n".into(), None, None)
            .unwrap();
        assert!(s.hunks.is_empty());
        assert!(s.is_active);
    }
}
