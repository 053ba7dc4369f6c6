//! Error types for the cdiff core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them for callers that want a
//! single error type.

use thiserror::Error;

/// Unified error type for the core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Combine(#[from] CombineError),

    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// Errors from the combined-diff pipeline.
#[derive(Debug, Error)]
pub enum CombineError {
    /// More targets requested than the per-line bitmap can address.
    /// Reported before any diffing starts.
    #[error("cannot diff {requested} targets at once, the limit is {max}")]
    TooManyTargets { requested: usize, max: usize },

    /// The diff engine placed the cursor outside the origin model. This
    /// is a contract violation by the engine, not a recoverable state.
    #[error("diff engine moved the line cursor to {cursor}, origin has {line_count} lines")]
    CursorOutOfRange { cursor: usize, line_count: usize },

    /// Write failure on a streaming output sink.
    #[error("failed to write rendered diff: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the conflict-marker filter. All of them leave the caller's
/// buffer authoritative: no partial rewrite is ever produced.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A conflict marker appeared outside the `<` `|` `=` `>` sequence.
    #[error("conflict marker '{marker}' out of sequence at line {line}")]
    MarkerOutOfSequence { marker: char, line: usize },

    /// Input ended while still inside a conflict block.
    #[error("unterminated conflict block at end of input")]
    UnterminatedBlock,

    /// The combined diff for one block failed.
    #[error(transparent)]
    Combine(#[from] CombineError),
}
