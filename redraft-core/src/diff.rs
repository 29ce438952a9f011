//! Line-level differencing: aligns two line sequences into a minimal edit
//! script of Copy/Insert/Delete operations.
//!
//! The alignment is a classic longest-common-subsequence dynamic program,
//! O(N·M) over the distinct middle after stripping the common prefix and
//! suffix. The backtrack is tuned so that within any replacement region all
//! deletions are emitted before all insertions, which lets the segmenter
//! build a single `Modified` hunk instead of interleaved add/remove pairs.
//! Given identical inputs the script is always identical, so segmentation
//! determinism depends on this.
//!
//! Differencing can be expensive for large documents, so `diff_lines` accepts
//! a cancellation flag polled once per table row; the host's worker thread
//! raises it when a request is superseded or its document closes.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{EngineError, EngineResult};

/// One step of the edit script. Indices address lines in the original (`old`)
/// and rewritten (`new`) sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    /// The line is unchanged: `old[old] == new[new]`.
    Copy {
        /// Index into the original line sequence.
        old: usize,
        /// Index into the rewritten line sequence.
        new: usize,
    },
    /// `old[old]` is absent from the rewritten content.
    Delete {
        /// Index into the original line sequence.
        old: usize,
    },
    /// `new[new]` is absent from the original content.
    Insert {
        /// Index into the rewritten line sequence.
        new: usize,
    },
}

/// Splits `content` into lines on `'\n'` only, losslessly.
///
/// Joining the result with `'\n'` reproduces the input byte-for-byte: a
/// trailing newline yields a final empty element, `"\r\n"` endings keep their
/// `'\r'` attached, and the empty string becomes a single empty line. Any
/// normalization of line endings is the caller's responsibility.
pub fn split_lines(content: &str) -> Vec<&str> {
    content.split('\n').collect()
}

/// Computes the edit script aligning `old` to `new`.
///
/// Returns `EngineError::Cancelled` if `cancel` is raised mid-computation;
/// the flag is polled once per DP row, so cancellation latency is bounded by
/// one row of work.
pub fn diff_lines(
    old: &[&str],
    new: &[&str],
    cancel: Option<&AtomicBool>,
) -> EngineResult<Vec<EditOp>> {
    let n = old.len();
    let m = new.len();

    // Strip the common prefix and suffix first. Most AI rewrites touch a
    // small region of a large file, so this collapses the quadratic table to
    // the changed middle.
    let mut prefix = 0;
    while prefix < n && prefix < m && old[prefix] == new[prefix] {
        prefix += 1;
    }
    let mut suffix = 0;
    while suffix < n - prefix && suffix < m - prefix && old[n - 1 - suffix] == new[m - 1 - suffix]
    {
        suffix += 1;
    }

    let mid_old = &old[prefix..n - suffix];
    let mid_new = &new[prefix..m - suffix];

    let mut script = Vec::with_capacity(n.max(m));
    for i in 0..prefix {
        script.push(EditOp::Copy { old: i, new: i });
    }
    align_middle(mid_old, mid_new, prefix, cancel, &mut script)?;
    for i in 0..suffix {
        script.push(EditOp::Copy {
            old: n - suffix + i,
            new: m - suffix + i,
        });
    }
    Ok(script)
}

/// LCS table + backtrack over the trimmed middle. `offset` maps middle
/// indices back to full-sequence coordinates on the old side; the new side
/// uses the same prefix length, so the offset is shared.
fn align_middle(
    old: &[&str],
    new: &[&str],
    offset: usize,
    cancel: Option<&AtomicBool>,
    script: &mut Vec<EditOp>,
) -> EngineResult<()> {
    let n = old.len();
    let m = new.len();
    if n == 0 && m == 0 {
        return Ok(());
    }

    let mut table = vec![0u32; (n + 1) * (m + 1)];
    let idx = |i: usize, j: usize| i * (m + 1) + j;

    for i in 1..=n {
        if let Some(flag) = cancel {
            if flag.load(Ordering::Relaxed) {
                return Err(EngineError::Cancelled);
            }
        }
        for j in 1..=m {
            table[idx(i, j)] = if old[i - 1] == new[j - 1] {
                table[idx(i - 1, j - 1)] + 1
            } else {
                table[idx(i - 1, j)].max(table[idx(i, j - 1)])
            };
        }
    }

    // Backtrack from the far corner. On ties the insert branch is taken
    // first; after the final reverse this places every deletion of a mixed
    // region ahead of its insertions.
    let mut ops = Vec::with_capacity(n + m);
    let mut i = n;
    let mut j = m;
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && old[i - 1] == new[j - 1] {
            ops.push(EditOp::Copy {
                old: offset + i - 1,
                new: offset + j - 1,
            });
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || table[idx(i, j - 1)] >= table[idx(i - 1, j)]) {
            ops.push(EditOp::Insert {
                new: offset + j - 1,
            });
            j -= 1;
        } else {
            ops.push(EditOp::Delete {
                old: offset + i - 1,
            });
            i -= 1;
        }
    }
    ops.reverse();
    script.extend(ops);
    Ok(())
}
