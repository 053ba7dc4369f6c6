//! Per-target diff consumption.
//!
//! One consumer pass folds a single target's diff events into the shared
//! origin model: removed lines set the target's bit in the line's
//! deletion bitmap, added lines append insertion records at the cursor
//! anchor. Passes run strictly one target at a time, so each pass sees
//! the model exactly as the previous pass left it.

use crate::engine::{DiffSink, LineTag};
use crate::errors::CombineError;

use super::model::{InsertedLine, OriginModel};

/// Sink for one `(origin, target)` diff run, mutating the model on behalf
/// of one target index.
///
/// Cursor invariant: after a hunk boundary, `lno` equals the last origin
/// line already consumed, or the insertion anchor when the hunk removes
/// nothing. Each removed line advances the cursor before marking it;
/// added lines attach at the cursor without moving it.
pub(crate) struct HunkConsumer<'m, 'a> {
    model: &'m mut OriginModel<'a>,
    target: usize,
    lno: usize,
}

impl<'m, 'a> HunkConsumer<'m, 'a> {
    pub(crate) fn new(model: &'m mut OriginModel<'a>, target: usize) -> Self {
        Self {
            model,
            target,
            lno: 1,
        }
    }
}

impl DiffSink for HunkConsumer<'_, '_> {
    fn hunk(
        &mut self,
        origin_begin: usize,
        origin_count: usize,
        _target_begin: usize,
        _target_count: usize,
    ) -> Result<(), CombineError> {
        self.lno = if origin_count == 0 {
            origin_begin
        } else {
            origin_begin.saturating_sub(1)
        };
        Ok(())
    }

    fn line(&mut self, tag: LineTag, text: &[u8]) -> Result<(), CombineError> {
        match tag {
            LineTag::Removed => {
                self.lno += 1;
                let cursor = self.lno;
                let line_count = self.model.line_count();
                let line = self
                    .model
                    .line_mut(cursor)
                    .ok_or(CombineError::CursorOutOfRange { cursor, line_count })?;
                line.removed_by |= 1 << self.target;
            }
            LineTag::Added => {
                let cursor = self.lno;
                let line_count = self.model.line_count();
                let line = self
                    .model
                    .line_mut(cursor)
                    .ok_or(CombineError::CursorOutOfRange { cursor, line_count })?;
                line.inserted.push(InsertedLine {
                    text: text.to_vec(),
                    added_by: 1 << self.target,
                });
            }
            LineTag::Context => {}
        }
        Ok(())
    }
}
