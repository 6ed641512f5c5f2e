// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Textarc-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Textarc and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};

use super::{Layout, LayoutConfig, LayoutError, LinkSegment, TextBox, TextStyle};
use crate::model::{AnchorRef, AnnotationGraph, EventId, LinkSpec, Side, WordId};

fn fixed(width: f64) -> impl Fn(&str, TextStyle) -> TextBox {
    move |_: &str, _: TextStyle| TextBox::new(width, 16.0)
}

/// Box width proportional to text length, so every word can differ.
fn by_length(text: &str, _: TextStyle) -> TextBox {
    TextBox::new(text.len() as f64 * 10.0, 16.0)
}

fn words_graph(texts: &[&str], links: &[(&str, usize, usize, Side, &str)]) -> AnnotationGraph {
    let mut builder = AnnotationGraph::builder();
    for text in texts {
        builder.word(*text);
    }
    for (event, left, right, side, category) in links {
        builder.link(
            LinkSpec::new(EventId::new(*event).expect("event id"))
                .argument(AnchorRef::Word(*left), "a")
                .argument(AnchorRef::Word(*right), "b")
                .side(*side)
                .category(*category),
        );
    }
    builder.build().expect("graph")
}

#[fixture]
fn three_words() -> Layout {
    let graph = words_graph(&["a", "b", "c"], &[("E1", 0, 2, Side::Top, "default")]);
    Layout::new(graph, LayoutConfig::default(), 200.0, &fixed(80.0)).expect("layout")
}

fn row_words(layout: &Layout) -> Vec<Vec<usize>> {
    layout.rows().iter().map(|row| row.words().iter().map(|w| w.index()).collect()).collect()
}

fn assert_flow_invariants(layout: &Layout) {
    let config = layout.config();
    let mut previous: Option<WordId> = None;
    for row in layout.rows() {
        let limit = row.rw() - config.edge_padding;
        for (i, word) in row.words().iter().enumerate() {
            let placement = layout.placement(*word).expect("placement");
            assert!(previous.map_or(true, |prev| prev < *word), "order broken at word {word}");
            assert!(placement.x() >= config.edge_padding - 1e-6, "word {word} crosses the left edge");
            if i > 0 {
                assert!(placement.right() <= limit + 1e-6, "word {word} crosses the right edge");
                let prev = layout.placement(row.words()[i - 1]).expect("prev");
                let padding = if layout.graph().word(*word).is_some_and(|w| w.is_punct()) {
                    config.punct_padding
                } else {
                    config.word_padding
                };
                assert!(prev.right() + padding <= placement.x() + 1e-6, "word {word} overlaps");
            }
            previous = Some(*word);
        }
    }
    let placed = layout.rows().iter().map(|row| row.words().len()).sum::<usize>();
    assert_eq!(placed, layout.graph().words().len());
}

#[rstest]
fn new_places_words_and_sizes_rows(three_words: Layout) {
    assert_eq!(row_words(&three_words), vec![vec![0, 1], vec![2]]);
    assert_eq!(three_words.rev(), 0);

    let link = three_words.graph().link_by_event("E1").expect("E1").id();
    assert_eq!(three_words.slot(link), Some(1));
    assert!(three_words.rows().iter().all(|row| row.max_slot() == 1));
    assert_eq!(
        three_words.link_segments(link),
        vec![
            LinkSegment { row: 0, x0: 10.0, x1: 200.0 },
            LinkSegment { row: 1, x0: 0.0, x1: 90.0 },
        ]
    );
    assert_eq!(three_words.link_width(link), 280.0);
}

#[test]
fn geometry_accessors_follow_the_lane_extents() {
    let graph = words_graph(
        &["a", "b"],
        &[("up", 0, 1, Side::Top, "default"), ("down", 0, 1, Side::Bottom, "default")],
    );
    let layout = Layout::new(graph, LayoutConfig::default(), 400.0, &fixed(80.0)).expect("layout");

    assert_eq!(layout.rows()[0].rh(), 16.0 + 4.0 + 2.0 * 15.0);
    assert_eq!(layout.min_height(0), Some(50.0));
    assert_eq!(layout.baseline(0), Some(50.0));
    assert_eq!(layout.lower_bound(0), Some(31.0));
    assert_eq!(layout.word_top_y(WordId::new(0)), Some(15.0));
    assert_eq!(layout.word_bottom_y(WordId::new(1)), Some(35.0));
    assert_eq!(layout.lane_y(0, 1), Some(0.0));
    assert_eq!(layout.lane_y(0, -1), Some(50.0));
    assert_eq!(layout.lane_y(3, 1), None);
    assert_eq!(layout.canvas_height(), 50.0 + 20.0);
}

#[rstest]
fn rejected_move_leaves_layout_untouched(mut three_words: Layout) {
    let before = three_words.state().clone();
    assert_eq!(three_words.move_word_on_row(WordId::new(2), -20.0), Ok(false));
    assert_eq!(three_words.state(), &before);
    assert_eq!(three_words.rev(), 0);
}

#[rstest]
fn structural_error_leaves_layout_untouched(mut three_words: Layout) {
    let before = three_words.state().clone();
    assert_eq!(
        three_words.add_word_to_row(WordId::new(1), 0, None, None),
        Err(LayoutError::WordAlreadyPlaced { word: WordId::new(1), row: 0 })
    );
    assert_eq!(three_words.remove_last_row(), Err(LayoutError::RowNotEmpty { row: 1, words: 1 }));
    assert_eq!(three_words.state(), &before);
    assert_eq!(three_words.rev(), 0);
}

#[rstest]
fn committed_mutations_bump_the_revision(mut three_words: Layout) {
    assert_eq!(three_words.move_word_on_row(WordId::new(0), 5.0), Ok(true));
    assert_eq!(three_words.rev(), 1);
    assert_eq!(three_words.resize_row(0, 10.0), Ok(10.0));
    assert_eq!(three_words.rev(), 2);
    // Nothing left to grow.
    three_words.resize_all();
    assert_eq!(three_words.rev(), 2);
}

#[test]
fn unplaced_layout_built_word_by_word_matches_batch_layout() {
    let texts = ["The", "quick", "brown", "fox", "jumps", "over", "the", "lazy", "dog", "."];
    let config = LayoutConfig::default();
    let batch =
        Layout::new(words_graph(&texts, &[]), config.clone(), 160.0, &by_length).expect("batch");

    let mut single =
        Layout::unplaced(words_graph(&texts, &[]), config, 160.0, &by_length).expect("unplaced");
    assert!(single.rows().is_empty());
    single.append_row();
    for idx in 0..texts.len() {
        let last = single.rows().len() - 1;
        single.add_word_to_row(WordId::new(idx), last, None, None).expect("add");
    }

    assert_eq!(batch.state(), single.state());
    assert_flow_invariants(&batch);
}

#[test]
fn invalid_width_is_rejected_up_front() {
    let graph = words_graph(&["a"], &[]);
    let err = Layout::new(graph, LayoutConfig::default(), 15.0, &fixed(10.0)).expect_err("width");
    assert_eq!(err, LayoutError::InvalidWidth { width: 15.0 });
}

#[rstest]
#[case::zero_slot_interval(LayoutConfig { slot_interval: 0.0, ..LayoutConfig::default() }, "slotInterval")]
#[case::negative_padding(LayoutConfig { word_padding: -2.0, ..LayoutConfig::default() }, "wordPadding")]
#[case::nan_row_gap(LayoutConfig { row_gap: f64::NAN, ..LayoutConfig::default() }, "rowGap")]
fn out_of_range_config_is_rejected_up_front(#[case] config: LayoutConfig, #[case] field: &str) {
    let graph = words_graph(&["a", "b"], &[]);
    let err = Layout::unplaced(graph.clone(), config.clone(), 200.0, &fixed(10.0))
        .expect_err("unplaced");
    assert!(matches!(&err, LayoutError::InvalidConfig { reason } if reason.contains(field)));
    let err = Layout::new(graph, config, 200.0, &fixed(10.0)).expect_err("new");
    assert!(matches!(err, LayoutError::InvalidConfig { .. }));
}

#[test]
fn drag_sequence_keeps_flow_invariants_and_rejections_are_atomic() {
    let texts = [
        "Activated", "MEK", "phosphorylates", "ERK", "at", "T202", ",", "which", "in", "turn",
        "stimulates", "RSK", "and", "MNK", "kinases", "in", "HeLa", "cells", "today", ".",
    ];
    let graph = words_graph(
        &texts,
        &[
            ("E1", 1, 3, Side::Top, "default"),
            ("E2", 3, 5, Side::Top, "default"),
            ("E3", 0, 11, Side::Bottom, "coref"),
        ],
    );
    let mut layout = Layout::new(graph, LayoutConfig::default(), 300.0, &by_length).expect("layout");
    assert_flow_invariants(&layout);

    let moves: [(usize, f64); 16] = [
        (3, 40.0),
        (7, -60.0),
        (0, 25.0),
        (12, 120.0),
        (5, -200.0),
        (19, -15.0),
        (10, 300.0),
        (2, -35.0),
        (15, -90.0),
        (8, 55.0),
        (1, -5.0),
        (18, 200.0),
        (6, -400.0),
        (11, -30.0),
        (4, 1000.0),
        (9, -1000.0),
    ];
    for (word, dx) in moves {
        let before = layout.state().clone();
        let rev = layout.rev();
        let moved = layout.move_word_on_row(WordId::new(word), dx).expect("move");
        if moved {
            assert_eq!(layout.rev(), rev + 1);
        } else {
            assert_eq!(layout.state(), &before, "rejected move of word {word} changed state");
            assert_eq!(layout.rev(), rev);
        }
        assert_flow_invariants(&layout);
    }

    layout.set_width(180.0).expect("narrow");
    assert_flow_invariants(&layout);
    layout.reflow().expect("reflow");
    assert_flow_invariants(&layout);
}

#[test]
fn hiding_a_category_reslots_remaining_links() {
    let graph = words_graph(
        &["a", "b", "c", "d", "e"],
        &[("outer", 0, 4, Side::Top, "default"), ("inner", 1, 3, Side::Top, "coref")],
    );
    let mut layout = Layout::new(graph, LayoutConfig::default(), 600.0, &fixed(40.0)).expect("layout");
    let outer = layout.graph().link_by_event("outer").expect("outer").id();
    let inner = layout.graph().link_by_event("inner").expect("inner").id();
    assert_eq!((layout.slot(outer), layout.slot(inner)), (Some(2), Some(1)));

    assert!(layout.set_category_visible("coref", false));
    assert!(!layout.set_category_visible("coref", false));
    assert_eq!((layout.slot(outer), layout.slot(inner)), (Some(1), None));
    assert!(layout.link_segments(inner).is_empty());
    assert!(layout.state().is_hidden("coref"));

    assert!(layout.set_category_visible("coref", true));
    assert_eq!((layout.slot(outer), layout.slot(inner)), (Some(2), Some(1)));

    let rev = layout.rev();
    layout.recompute_slots();
    assert_eq!(layout.rev(), rev + 1);
    assert_eq!(layout.slot(outer), Some(2));
}

#[rstest]
fn snapshot_serializes_renderer_geometry(three_words: Layout) {
    let json = three_words.snapshot_json().expect("json");
    let value: serde_json::Value = serde_json::from_str(&json).expect("parse");

    assert_eq!(value["width"], 200.0);
    assert_eq!(value["rows"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["rows"][0]["words"], serde_json::json!([0, 1]));
    assert_eq!(value["rows"][0]["maxSlot"], 1);
    assert_eq!(value["words"][2]["row"], 1);
    assert_eq!(value["words"][1]["x"], 95.0);
    assert_eq!(value["words"][1]["boxWidth"], 80.0);
    assert_eq!(value["links"][0]["eventId"], "E1");
    assert_eq!(value["links"][0]["endpoints"], serde_json::json!([0, 2]));
    assert_eq!(value["links"][0]["width"], 280.0);
    assert_eq!(value["links"][0]["segments"][1]["x1"], 90.0);
    assert!(value["canvasHeight"].as_f64().is_some_and(|h| h > 0.0));
}
