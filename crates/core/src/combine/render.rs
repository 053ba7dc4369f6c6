//! Model serialization.
//!
//! One traversal serves every output mode through the [`Emit`] trait.
//! Because all modes walk the same code path, a measure pass followed by
//! a fill pass produces a buffer of exactly the measured size.

use std::io::Write;

use crate::errors::CombineError;

use super::model::{OriginModel, TargetMask};

/// Byte receiver for one render traversal.
pub(crate) trait Emit {
    fn emit(&mut self, bytes: &[u8]) -> Result<(), CombineError>;
}

/// Size-only pass.
#[derive(Default)]
pub(crate) struct Measure {
    pub(crate) len: usize,
}

impl Emit for Measure {
    fn emit(&mut self, bytes: &[u8]) -> Result<(), CombineError> {
        self.len += bytes.len();
        Ok(())
    }
}

/// Copy pass into a buffer sized by a previous [`Measure`] run.
pub(crate) struct FillBuf<'b> {
    pub(crate) buf: &'b mut Vec<u8>,
}

impl Emit for FillBuf<'_> {
    fn emit(&mut self, bytes: &[u8]) -> Result<(), CombineError> {
        self.buf.extend_from_slice(bytes);
        Ok(())
    }
}

/// Live pass to an output sink.
pub(crate) struct StreamOut<'w, W: Write + ?Sized> {
    pub(crate) out: &'w mut W,
}

impl<W: Write + ?Sized> Emit for StreamOut<'_, W> {
    fn emit(&mut self, bytes: &[u8]) -> Result<(), CombineError> {
        self.out.write_all(bytes).map_err(CombineError::Io)
    }
}

/// Serialize the annotated model: for every line, one marker column per
/// target, then the text verbatim with its original terminator. The
/// sentinel record contributes only its insertions.
pub(crate) fn render<E: Emit>(
    model: &OriginModel<'_>,
    num_targets: usize,
    out: &mut E,
) -> Result<(), CombineError> {
    let mut markers = vec![b' '; num_targets];

    for (lno, line) in model.lines().iter().enumerate() {
        if lno >= 1 {
            set_markers(&mut markers, line.removed_by, b'-');
            out.emit(&markers)?;
            out.emit(model.text(line))?;
        }

        for inserted in &line.inserted {
            set_markers(&mut markers, inserted.added_by, b'+');
            out.emit(&markers)?;
            out.emit(&inserted.text)?;
        }
    }

    Ok(())
}

fn set_markers(columns: &mut [u8], map: TargetMask, marker: u8) {
    for (i, column) in columns.iter_mut().enumerate() {
        *column = if map & (1 << i) != 0 { marker } else { b' ' };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combine::consume::HunkConsumer;
    use crate::engine::diff_lines;

    fn annotated<'a>(origin: &'a [u8], targets: &[&[u8]]) -> OriginModel<'a> {
        let mut model = OriginModel::build(origin);
        for (index, target) in targets.iter().enumerate() {
            let mut pass = HunkConsumer::new(&mut model, index);
            diff_lines(origin, target, &mut pass).unwrap();
        }
        model
    }

    fn rendered(model: &OriginModel<'_>, num_targets: usize) -> Vec<u8> {
        let mut buf = Vec::new();
        render(model, num_targets, &mut FillBuf { buf: &mut buf }).unwrap();
        buf
    }

    #[test]
    fn test_marker_columns_track_target_order() {
        let origin = b"a\nb\n";
        let targets: [&[u8]; 2] = [b"a\n", b"a\nb\nz\n"];
        let model = annotated(origin, &targets);

        assert_eq!(rendered(&model, 2), b"  a\n- b\n +z\n".to_vec());
    }

    #[test]
    fn test_sentinel_insertions_come_first() {
        let origin = b"a\n";
        let targets: [&[u8]; 1] = [b"top\na\n"];
        let model = annotated(origin, &targets);

        assert_eq!(rendered(&model, 1), b"+top\n a\n".to_vec());
    }

    #[test]
    fn test_measure_matches_fill() {
        let origin = b"a\nb\nc\nd\n";
        let targets: [&[u8]; 3] = [b"a\nc\nd\n", b"a\nb\nX\nd\n", b"a\nb\nc\nd\ne"];
        let model = annotated(origin, &targets);

        let mut measure = Measure::default();
        render(&model, 3, &mut measure).unwrap();
        let buf = rendered(&model, 3);

        assert_eq!(measure.len, buf.len());
    }

    #[test]
    fn test_stream_sink_matches_fill() {
        let origin = b"x\ny\n";
        let targets: [&[u8]; 1] = [b"x\nz\n"];
        let model = annotated(origin, &targets);

        let mut streamed = Vec::new();
        render(&model, 1, &mut StreamOut { out: &mut streamed }).unwrap();

        assert_eq!(streamed, rendered(&model, 1));
    }
}
