//! Line-diff engine boundary.
//!
//! The combined-diff pipeline never talks to a diff library directly; it
//! consumes a stream of hunk and line events through [`DiffSink`].
//! [`diff_lines`] adapts the `similar` crate to that stream: every
//! non-equal diff op becomes one hunk event followed by the region's
//! removed and added lines. Hunks carry no context lines, and trailing
//! equal runs are never delivered.

use similar::{ChangeTag, DiffOp, TextDiff};

use crate::errors::CombineError;

/// Classification of one line event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTag {
    /// Present in the origin, absent from the target.
    Removed,
    /// Present in the target, absent from the origin.
    Added,
    /// Present in both.
    Context,
}

/// Receiver for one diff run.
///
/// `hunk` is called once per change region, in increasing origin order,
/// before that region's line events. Begins are 1-based; a side with a
/// zero count reports the line *preceding* the change instead, following
/// the unified-diff convention.
pub trait DiffSink {
    fn hunk(
        &mut self,
        origin_begin: usize,
        origin_count: usize,
        target_begin: usize,
        target_count: usize,
    ) -> Result<(), CombineError>;

    /// One line inside the current hunk. `text` keeps its terminator when
    /// the underlying buffer has one.
    fn line(&mut self, tag: LineTag, text: &[u8]) -> Result<(), CombineError>;
}

/// Diff `origin` against `target` line by line and feed the events to
/// `sink`. Removed lines of a region are delivered before its added
/// lines.
pub fn diff_lines(
    origin: &[u8],
    target: &[u8],
    sink: &mut impl DiffSink,
) -> Result<(), CombineError> {
    let diff = TextDiff::from_lines(origin, target);

    for op in diff.ops() {
        let (origin_begin, origin_count, target_begin, target_count) = match *op {
            DiffOp::Equal { .. } => continue,
            DiffOp::Delete {
                old_index,
                old_len,
                new_index,
            } => (old_index + 1, old_len, new_index, 0),
            DiffOp::Insert {
                old_index,
                new_index,
                new_len,
            } => (old_index, 0, new_index + 1, new_len),
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => (old_index + 1, old_len, new_index + 1, new_len),
        };
        sink.hunk(origin_begin, origin_count, target_begin, target_count)?;

        for change in diff.iter_changes(op) {
            let tag = match change.tag() {
                ChangeTag::Delete => LineTag::Removed,
                ChangeTag::Insert => LineTag::Added,
                ChangeTag::Equal => LineTag::Context,
            };
            sink.line(tag, change.value())?;
        }
    }

    Ok(())
}
