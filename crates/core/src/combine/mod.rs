//! Combined multi-target diffs.
//!
//! One origin text is diffed against N targets in caller order. The
//! origin model is built once, mutated by one consumer pass per target,
//! then rendered with N marker columns per line. Column position follows
//! target order, so callers see exactly the order they supplied.

pub mod model;

mod consume;
mod render;

use std::io::Write;

use tracing::debug;

use crate::engine::diff_lines;
use crate::errors::CombineError;

use consume::HunkConsumer;
use render::StreamOut;

pub use model::{InsertedLine, OriginLine, OriginModel, TargetMask, MAX_TARGETS};

pub(crate) use render::{render, Emit, FillBuf, Measure};

/// Build the origin model and run one consumer pass per target, strictly
/// in order.
fn annotate<'a>(origin: &'a [u8], targets: &[&[u8]]) -> Result<OriginModel<'a>, CombineError> {
    if targets.len() > MAX_TARGETS {
        return Err(CombineError::TooManyTargets {
            requested: targets.len(),
            max: MAX_TARGETS,
        });
    }

    let mut model = OriginModel::build(origin);
    debug!(
        targets = targets.len(),
        origin_lines = model.line_count(),
        "origin model built"
    );

    for (index, target) in targets.iter().enumerate() {
        let mut pass = HunkConsumer::new(&mut model, index);
        diff_lines(origin, target, &mut pass)?;
    }

    Ok(model)
}

/// Stream the combined diff of `origin` against `targets` to `out`.
pub fn combined_diff_to_writer(
    origin: &[u8],
    targets: &[&[u8]],
    out: &mut dyn Write,
) -> Result<(), CombineError> {
    let model = annotate(origin, targets)?;
    render(&model, targets.len(), &mut StreamOut { out })
}

/// Compute the combined diff of `origin` against `targets` into a buffer.
///
/// Runs a measuring pass first, then fills an exactly-sized allocation
/// with a second pass over the same model.
pub fn combined_diff(origin: &[u8], targets: &[&[u8]]) -> Result<Vec<u8>, CombineError> {
    let model = annotate(origin, targets)?;

    let mut measure = Measure::default();
    render(&model, targets.len(), &mut measure)?;

    let mut buf = Vec::with_capacity(measure.len);
    render(&model, targets.len(), &mut FillBuf { buf: &mut buf })?;
    debug_assert_eq!(buf.len(), measure.len);

    Ok(buf)
}

/// Render the combined diff through a caller-supplied sink.
///
/// The conflict filter drives both of its passes through this, so block
/// sizes measured in the first pass match the bytes written in the
/// second.
pub(crate) fn combined_diff_into<E: Emit>(
    origin: &[u8],
    targets: &[&[u8]],
    sink: &mut E,
) -> Result<(), CombineError> {
    let model = annotate(origin, targets)?;
    render(&model, targets.len(), sink)
}
