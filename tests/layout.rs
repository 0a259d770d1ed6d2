//! Layout tests - roofs, vertical insets, and position<->pixel mapping
//!
//! The mapping functions never fail: out-of-range positions and stray mouse
//! coordinates clamp to the nearest valid location.

mod common;

use common::{assert_px_eq, doc_of, line_of, sized, METRICS};
use scribe::{Document, Point, Position, ProportionalMetrics};

#[test]
fn test_line_roof_accumulates_heights() {
    let doc = doc_of(&METRICS, &["a", "b", "c"]);
    assert_px_eq(doc.line_roof(0), 0.0, "roof of line 0");
    assert_px_eq(doc.line_roof(1), 14.0, "roof of line 1");
    assert_px_eq(doc.line_roof(2), 28.0, "roof of line 2");
    // Clamped to the last line
    assert_px_eq(doc.line_roof(99), 28.0, "roof clamps");
}

#[test]
fn test_position_to_point_basic() {
    let doc = doc_of(&METRICS, &["Hi", "Bye"]);
    let (pos, pt) = doc.position_to_point(&METRICS, 1, 2);
    assert_eq!(pos, Position::new(1, 2));
    assert_px_eq(pt.x, 16.0, "x of column 2");
    assert_px_eq(pt.y, 14.0, "y of line 1");
}

#[test]
fn test_position_to_point_wraps_left_to_previous_line_end() {
    let doc = doc_of(&METRICS, &["Hi", "Bye"]);
    // Moving left from column 0 of line 1
    let (pos, pt) = doc.position_to_point(&METRICS, 1, -1);
    assert_eq!(pos, Position::new(0, 2));
    assert_px_eq(pt.x, 16.0, "x at end of line 0");
    assert_px_eq(pt.y, 0.0, "y of line 0");
}

#[test]
fn test_position_to_point_wraps_right_to_next_line_start() {
    let doc = doc_of(&METRICS, &["Hi", "Bye"]);
    // Moving right past the end of line 0
    let (pos, pt) = doc.position_to_point(&METRICS, 0, 3);
    assert_eq!(pos, Position::new(1, 0));
    assert_px_eq(pt.x, 0.0, "x at start of line 1");
    assert_px_eq(pt.y, 14.0, "y of line 1");
}

#[test]
fn test_position_to_point_clamps_at_document_edges() {
    let doc = doc_of(&METRICS, &["Hi", "Bye"]);
    // Left of the very first position: clamp in place
    let (pos, pt) = doc.position_to_point(&METRICS, 0, -1);
    assert_eq!(pos, Position::new(0, 0));
    assert_px_eq(pt.x, 0.0, "x at document start");

    // Right of the very last position: clamp to end of last line
    let (pos, pt) = doc.position_to_point(&METRICS, 1, 4);
    assert_eq!(pos, Position::new(1, 3));
    assert_px_eq(pt.x, 24.0, "x at document end");
    assert_px_eq(pt.y, 14.0, "y at document end");

    // Line index clamps too
    let (pos, _) = doc.position_to_point(&METRICS, 99, 0);
    assert_eq!(pos, Position::new(1, 0));
}

#[test]
fn test_point_to_position_scenario_two_lines() {
    // Fixed metrics: height 14, width 8 per char. y=20 lands inside line 1.
    let doc = doc_of(&METRICS, &["Hi", "Bye"]);
    let (pos, pt) = doc.point_to_position(&METRICS, Point::new(0.0, 20.0));
    assert_eq!(pos, Position::new(1, 0));
    assert_px_eq(pt.x, 0.0, "snapped x");
    assert_px_eq(pt.y, 14.0, "snapped y");
}

#[test]
fn test_point_to_position_clamps_above_and_below() {
    let doc = doc_of(&METRICS, &["Hi", "Bye"]);
    let (above, _) = doc.point_to_position(&METRICS, Point::new(9.0, -50.0));
    assert_eq!(above, Position::new(0, 1));

    // A click below the last line clamps to the end of the last line
    let (below, pt) = doc.point_to_position(&METRICS, Point::new(0.0, 500.0));
    assert_eq!(below, Position::new(1, 3));
    assert_px_eq(pt.x, 24.0, "x at end of last line");
    assert_px_eq(pt.y, 14.0, "y of last line");
}

#[test]
fn test_point_to_position_midpoint_snapping() {
    let doc = doc_of(&METRICS, &["abcd"]);
    // Up to a character's midpoint the caret lands before it
    let (pos, _) = doc.point_to_position(&METRICS, Point::new(11.0, 0.0));
    assert_eq!(pos, Position::new(0, 1));
    let (pos, _) = doc.point_to_position(&METRICS, Point::new(12.0, 0.0));
    assert_eq!(pos, Position::new(0, 1));
    // Past the midpoint it advances
    let (pos, _) = doc.point_to_position(&METRICS, Point::new(12.5, 0.0));
    assert_eq!(pos, Position::new(0, 2));
}

#[test]
fn test_round_trip_away_from_boundaries() {
    let doc = doc_of(&METRICS, &["Hello", "wide world", "x"]);
    for line in 0..doc.line_count() {
        for column in 0..=doc.line(line).len() {
            let (pos, pt) = doc.position_to_point(&METRICS, line as isize, column as isize);
            assert_eq!(pos, Position::new(line, column));
            let (back, snapped) = doc.point_to_position(&METRICS, pt);
            assert_eq!(back, pos, "round trip for line {} column {}", line, column);
            assert_px_eq(snapped.x, pt.x, "snapped x matches");
            assert_px_eq(snapped.y, pt.y, "snapped y matches");
        }
    }
}

#[test]
fn test_vertical_inset_centers_small_text() {
    let pm = ProportionalMetrics::new(0.5, 1.0);
    let mut doc = doc_of(&pm, &["a"]);
    doc.insert_char(&pm, Position::new(0, 1), sized('W', 24.0));
    // Line height is 24; the 14px character sits 0.8 * 10 = 8px down
    let (_, pt) = doc.position_to_point(&pm, 0, 0);
    assert_px_eq(pt.y, 8.0, "inset of short character");
    let (_, pt) = doc.position_to_point(&pm, 0, 1);
    assert_px_eq(pt.y, 0.0, "tall character sits flush");
}

#[test]
fn test_inset_applies_in_hit_testing_too() {
    let pm = ProportionalMetrics::new(0.5, 1.0);
    let mut doc = doc_of(&pm, &["a"]);
    doc.insert_char(&pm, Position::new(0, 1), sized('W', 24.0));
    let (pos, pt) = doc.point_to_position(&pm, Point::new(0.0, 2.0));
    assert_eq!(pos, Position::new(0, 0));
    assert_px_eq(pt.y, 8.0, "snapped y carries the inset");
}

#[test]
fn test_empty_line_maps_to_zero_inset() {
    let doc = doc_of(&METRICS, &["ab", "", "cd"]);
    let (pos, pt) = doc.position_to_point(&METRICS, 1, 0);
    assert_eq!(pos, Position::new(1, 0));
    assert_px_eq(pt.x, 0.0, "empty line x");
    assert_px_eq(pt.y, 14.0, "empty line y is its roof");
}

#[test]
fn test_empty_document_mapping() {
    let doc = Document::new();
    let (pos, pt) = doc.point_to_position(&METRICS, Point::new(100.0, 100.0));
    assert_eq!(pos, Position::new(0, 0));
    assert_px_eq(pt.x, 0.0, "empty doc x");
    assert_px_eq(pt.y, 0.0, "empty doc y");

    let (pos, _) = doc.position_to_point(&METRICS, 5, 5);
    assert_eq!(pos, Position::new(0, 0));
}

#[test]
fn test_max_width_tracks_widest_line() {
    let doc = doc_of(&METRICS, &["ab", "abcdef", "c"]);
    assert_px_eq(doc.max_width(), 48.0, "widest line");
}

#[test]
fn test_draw_emits_lines_top_to_bottom() {
    let doc = doc_of(&METRICS, &["ab", "c"]);
    let mut glyphs = Vec::new();
    let widest = doc.draw(&METRICS, Point::new(0.0, 0.0), &mut |pt, ch| {
        glyphs.push((pt.x, pt.y, ch.value()));
    });
    assert_px_eq(widest, 16.0, "widest line from draw");
    assert_eq!(glyphs.len(), 3);
    // Line 0 baseline at 0.8 * 14, line 1 baseline one row further down
    assert_eq!(glyphs[0], (0.0, 14.0 * 0.8, 'a'));
    assert_eq!(glyphs[1], (8.0, 14.0 * 0.8, 'b'));
    assert_eq!(glyphs[2], (0.0, 14.0 + 14.0 * 0.8, 'c'));
}

#[test]
fn test_mixed_height_lines_accumulate_roofs() {
    let pm = ProportionalMetrics::new(0.5, 1.0);
    let mut lines = Vec::new();
    for text in ["aa", "bb", "cc"] {
        lines.push(line_of(&pm, text));
    }
    let mut doc = Document::from_lines(lines);
    doc.apply_style(
        &pm,
        scribe::Span::ordered(Position::new(1, 0), Position::new(1, 2)),
        |style| style.size = 28.0,
    );
    // Roofs: line 0 at 0, line 1 at 14, line 2 at 14 + 28
    assert_px_eq(doc.line_roof(2), 42.0, "roof after a tall middle line");
    let (pos, _) = doc.point_to_position(&pm, Point::new(0.0, 43.0));
    assert_eq!(pos.line, 2);
}
