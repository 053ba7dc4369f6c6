//! End-to-end tests for the combined-diff pipeline and the conflict
//! filter, driven only through the public API.

use cdiff_core::{
    combined_diff, combined_diff_to_writer, rewrite_conflicts, CombineError, FilterError,
    Filtered, MAX_TARGETS,
};

// ===========================================================================
// Combined diff
// ===========================================================================

#[test]
fn combined_diff_annotates_every_target_edit() {
    let origin = b"a\nb\nc\n";
    let targets: [&[u8]; 2] = [b"a\nX\nc\n", b"a\nb\nc\nd\n"];

    let rendered = combined_diff(origin, &targets).unwrap();
    assert_eq!(
        String::from_utf8(rendered).unwrap(),
        "  a\n- b\n+ X\n  c\n +d\n"
    );
}

#[test]
fn blank_columns_mean_common_to_all_targets() {
    let origin = b"keep\nchange\nkeep too\n";
    let targets: [&[u8]; 3] = [
        b"keep\nchanged by 0\nkeep too\n",
        b"keep\nchange\nkeep too\n",
        b"keep\nkeep too\n",
    ];

    let rendered = String::from_utf8(combined_diff(origin, &targets).unwrap()).unwrap();
    let unmarked: Vec<&str> = rendered
        .lines()
        .filter(|l| l.starts_with("   "))
        .map(|l| &l[3..])
        .collect();

    // Only the lines every target left in place have all-blank columns.
    assert_eq!(unmarked, vec!["keep", "keep too"]);
}

#[test]
fn streaming_and_buffer_modes_render_identically() {
    let origin = b"alpha\nbeta\ngamma\ndelta\n";
    let targets: [&[u8]; 2] = [b"alpha\ngamma\ndelta\n", b"alpha\nbeta\ngamma\nomega\n"];

    let buffered = combined_diff(origin, &targets).unwrap();
    let mut streamed = Vec::new();
    combined_diff_to_writer(origin, &targets, &mut streamed).unwrap();

    assert_eq!(streamed, buffered);
}

#[test]
fn target_count_is_capped_at_the_bitmap_width() {
    let target: &[u8] = b"changed\n";

    let at_limit = vec![target; MAX_TARGETS];
    assert!(combined_diff(b"line\n", &at_limit).is_ok());

    let over = vec![target; MAX_TARGETS + 1];
    assert!(matches!(
        combined_diff(b"line\n", &over),
        Err(CombineError::TooManyTargets { .. })
    ));
}

// ===========================================================================
// Conflict filter
// ===========================================================================

#[test]
fn conflict_block_is_replaced_by_its_combined_diff() {
    let input = b"<<<<<<< ours\nA\n||||||| base\nB\n=======\nC\n>>>>>>> theirs\n";

    let out = rewrite_conflicts(input, 0).unwrap();
    let Filtered::Rewritten(bytes) = out else {
        panic!("expected a rewrite");
    };
    let text = String::from_utf8(bytes).unwrap();

    assert_eq!(text, "--B\n+ A\n +C\n");
    assert!(!text.contains("<<<<<<<"));
    assert!(!text.contains(">>>>>>>"));
}

#[test]
fn surrounding_context_is_untouched() {
    let input = b"fn main() {\n<<<<<<< ours\n    ours();\n||||||| base\n    base();\n=======\n    theirs();\n>>>>>>> theirs\n}\n";

    let Filtered::Rewritten(bytes) = rewrite_conflicts(input, 0).unwrap() else {
        panic!("expected a rewrite");
    };
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        "fn main() {\n--    base();\n+     ours();\n +    theirs();\n}\n"
    );
}

#[test]
fn buffer_without_markers_reports_no_change() {
    let input = b"plain\ntext\n";
    assert_eq!(rewrite_conflicts(input, 0).unwrap(), Filtered::Unchanged);
}

#[test]
fn buffer_ending_inside_a_block_is_rejected() {
    for input in [
        &b"<<<<<<< ours\nA\n"[..],
        &b"<<<<<<< ours\nA\n||||||| base\nB\n"[..],
        &b"<<<<<<< ours\nA\n||||||| base\nB\n=======\nC\n"[..],
    ] {
        assert!(matches!(
            rewrite_conflicts(input, 0),
            Err(FilterError::UnterminatedBlock)
        ));
    }
}
