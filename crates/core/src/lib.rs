//! cdiff core library.
//!
//! This crate computes combined (multi-target) line diffs: one origin
//! text is compared against N derived texts, and the result carries one
//! marker column per target in front of every line, `-` where the
//! target removed the origin line and `+` where it inserted one. On top
//! of that sits the conflict-marker filter, which rewrites the conflict
//! blocks of a merged file into the same combined-diff view.

pub mod combine;
pub mod engine;
pub mod errors;
pub mod filter;

// Re-exports for convenience.
pub use combine::{combined_diff, combined_diff_to_writer, OriginModel, TargetMask, MAX_TARGETS};
pub use errors::{CombineError, CoreError, FilterError};
pub use filter::{rewrite_conflicts, Filtered, DEFAULT_MARKER_SIZE};
