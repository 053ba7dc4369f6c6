//! Merge-conflict-marker filter.
//!
//! Scans a merged buffer for `<<<<<<<` / `|||||||` / `=======` /
//! `>>>>>>>` blocks and replaces each one with the combined diff of
//! "ours" and "theirs" against their common base. Context lines pass
//! through verbatim; the marker lines themselves are dropped. The
//! rewrite is two passes over the buffer: a measuring scan that also
//! validates the marker structure, then a filling scan into an
//! exactly-sized buffer. Malformed input fails the whole filter before
//! any output exists, so callers never see a partial rewrite.

use tracing::debug;

use crate::combine::{combined_diff_into, Emit, FillBuf, Measure};
use crate::errors::FilterError;

/// Marker size used when the caller passes 0.
pub const DEFAULT_MARKER_SIZE: usize = 7;

/// Outcome of a successful filter run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filtered {
    /// Every conflict block was replaced by its combined diff.
    Rewritten(Vec<u8>),
    /// The buffer contains no conflict blocks.
    Unchanged,
}

/// Which section of a conflict block the scan cursor is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Context,
    Ours,
    Base,
    Theirs,
}

/// The four marker kinds, by their leading byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    /// `<`: opens the "ours" section.
    OursOpen,
    /// `|`: opens the "base" section.
    BaseOpen,
    /// `=`: opens the "theirs" section.
    TheirsOpen,
    /// `>`: closes the block.
    Close,
}

impl Marker {
    fn byte(self) -> u8 {
        match self {
            Marker::OursOpen => b'<',
            Marker::BaseOpen => b'|',
            Marker::TheirsOpen => b'=',
            Marker::Close => b'>',
        }
    }
}

/// A contiguous run of lines, tracked without copying.
#[derive(Debug, Default, Clone, Copy)]
struct Span {
    begin: usize,
    len: usize,
}

impl Span {
    fn push(&mut self, begin: usize, len: usize) {
        if self.len == 0 {
            self.begin = begin;
        }
        self.len += len;
    }

    fn slice<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        &buf[self.begin..self.begin + self.len]
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Rewrite every conflict block in `input` as a combined diff.
///
/// A `marker_size` of 0 selects [`DEFAULT_MARKER_SIZE`]. Malformed input
/// (a marker out of sequence, or a block still open at end of input)
/// fails without producing any output, leaving the caller's buffer
/// authoritative.
pub fn rewrite_conflicts(input: &[u8], marker_size: usize) -> Result<Filtered, FilterError> {
    let marker_size = if marker_size == 0 {
        DEFAULT_MARKER_SIZE
    } else {
        marker_size
    };

    // Measuring pass: validates the marker structure and sizes the
    // output.
    let mut measure = Measure::default();
    let blocks = scan(input, marker_size, &mut measure)?;
    if blocks == 0 {
        return Ok(Filtered::Unchanged);
    }

    // Filling pass: the identical traversal into an exactly-sized
    // buffer.
    let mut buf = Vec::with_capacity(measure.len);
    let refilled = scan(input, marker_size, &mut FillBuf { buf: &mut buf })?;
    debug_assert_eq!(refilled, blocks);
    debug_assert_eq!(buf.len(), measure.len);

    debug!(blocks, bytes = buf.len(), "conflict blocks rewritten");
    Ok(Filtered::Rewritten(buf))
}

/// One pass over `input`: context lines go to `sink` verbatim, block
/// sections accumulate as spans, and each closing marker renders the
/// block's combined diff (origin = base, targets = ours then theirs)
/// through the same sink. Returns the number of blocks closed.
fn scan<E: Emit>(input: &[u8], marker_size: usize, sink: &mut E) -> Result<usize, FilterError> {
    let mut state = State::Context;
    let mut ours = Span::default();
    let mut base = Span::default();
    let mut theirs = Span::default();
    let mut blocks = 0;

    let mut offset = 0;
    let mut line_no = 0;
    for line in input.split_inclusive(|&b| b == b'\n') {
        line_no += 1;
        let line_begin = offset;
        offset += line.len();

        if let Some(marker) = classify_marker(line, marker_size) {
            state = match (marker, state) {
                (Marker::OursOpen, State::Context) => State::Ours,
                (Marker::BaseOpen, State::Ours) => State::Base,
                (Marker::TheirsOpen, State::Base) => State::Theirs,
                (Marker::Close, State::Theirs) => {
                    let targets = [ours.slice(input), theirs.slice(input)];
                    combined_diff_into(base.slice(input), &targets, sink)?;
                    ours.clear();
                    base.clear();
                    theirs.clear();
                    blocks += 1;
                    State::Context
                }
                (marker, _) => {
                    return Err(FilterError::MarkerOutOfSequence {
                        marker: marker.byte() as char,
                        line: line_no,
                    });
                }
            };
            continue;
        }

        match state {
            State::Context => sink.emit(line)?,
            State::Ours => ours.push(line_begin, line.len()),
            State::Base => base.push(line_begin, line.len()),
            State::Theirs => theirs.push(line_begin, line.len()),
        }
    }

    if state != State::Context {
        return Err(FilterError::UnterminatedBlock);
    }

    Ok(blocks)
}

/// A marker line starts with `marker_size` copies of one marker byte,
/// followed by whitespace or the end of the line.
fn classify_marker(line: &[u8], marker_size: usize) -> Option<Marker> {
    if line.len() < marker_size {
        return None;
    }

    let marker = match line[0] {
        b'<' => Marker::OursOpen,
        b'|' => Marker::BaseOpen,
        b'=' => Marker::TheirsOpen,
        b'>' => Marker::Close,
        _ => return None,
    };

    if !line[..marker_size].iter().all(|&b| b == line[0]) {
        return None;
    }

    match line.get(marker_size) {
        None => Some(marker),
        Some(b) if b.is_ascii_whitespace() => Some(marker),
        Some(_) => None,
    }
}
