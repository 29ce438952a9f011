//! Hunk segmentation: groups the edit script's non-Copy runs into discrete,
//! classified hunks.
//!
//! A run of one or more consecutive Delete/Insert operations becomes one
//! hunk; an adjacent delete run and insert run with no Copy between them
//! merge into a single replacement region. A Copy always terminates the
//! current hunk. Segmentation is deterministic: the same script always
//! produces the same hunks, ids included.

use crate::diff::EditOp;
use crate::types::{DiffHunk, HunkKind, HunkStatus};

/// Accumulates one in-progress hunk during the scan.
struct HunkBuilder {
    start_line: usize,
    original_lines: Vec<String>,
    new_lines: Vec<String>,
}

impl HunkBuilder {
    fn open(start_line: usize) -> Self {
        Self {
            start_line,
            original_lines: Vec::new(),
            new_lines: Vec::new(),
        }
    }

    fn finish(self, id: u32, end_line: usize) -> DiffHunk {
        let kind = if self.original_lines.is_empty() {
            HunkKind::Added
        } else if self.new_lines.is_empty() {
            HunkKind::Removed
        } else {
            HunkKind::Modified
        };
        DiffHunk {
            id,
            start_line: self.start_line,
            end_line,
            original_lines: self.original_lines,
            new_lines: self.new_lines,
            kind,
            status: HunkStatus::Pending,
        }
    }
}

/// Derives the session's hunk list from an edit script.
///
/// `old_lines` / `new_lines` are the same sequences the script was computed
/// from. Ids are assigned 0, 1, 2, … in scan order. `next_old` tracks the
/// next unconsumed original line, which is both the start position of a hunk
/// opened by an Insert (an empty range at that boundary) and the end position
/// of whatever hunk a Copy terminates.
pub fn segment_hunks(script: &[EditOp], old_lines: &[&str], new_lines: &[&str]) -> Vec<DiffHunk> {
    let mut hunks: Vec<DiffHunk> = Vec::new();
    let mut open: Option<HunkBuilder> = None;
    let mut next_old = 0usize;

    for op in script {
        match *op {
            EditOp::Copy { old, .. } => {
                if let Some(builder) = open.take() {
                    let id = hunks.len() as u32;
                    hunks.push(builder.finish(id, next_old));
                }
                next_old = old + 1;
            }
            EditOp::Delete { old } => {
                open.get_or_insert_with(|| HunkBuilder::open(old))
                    .original_lines
                    .push(old_lines[old].to_owned());
                next_old = old + 1;
            }
            EditOp::Insert { new } => {
                open.get_or_insert_with(|| HunkBuilder::open(next_old))
                    .new_lines
                    .push(new_lines[new].to_owned());
            }
        }
    }
    if let Some(builder) = open.take() {
        let id = hunks.len() as u32;
        hunks.push(builder.finish(id, next_old));
    }

    hunks
}
