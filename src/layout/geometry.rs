// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Textarc-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Textarc and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Derived geometry. Everything here is recomputed from the current positions on each call.

use serde::Serialize;

use super::config::LayoutConfig;
use super::row::Row;
use super::state::LayoutState;
use crate::model::{AnnotationGraph, LinkId, WordId};

/// Part of a link drawn across one row, in row-relative x coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSegment {
    pub row: usize,
    pub x0: f64,
    pub x1: f64,
}

impl LinkSegment {
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }
}

/// Tallest word box on the row, or `min_text_height` for an empty row.
pub fn text_height(row: &Row, state: &LayoutState, config: &LayoutConfig) -> f64 {
    row.words
        .iter()
        .map(|word| state.words[word.index()].box_height())
        .reduce(f64::max)
        .unwrap_or(config.min_text_height)
}

pub fn min_height(row: &Row, state: &LayoutState, config: &LayoutConfig) -> f64 {
    text_height(row, state, config)
        + config.row_descent
        + f64::from(row.lane_count()) * config.slot_interval
}

/// The line words stand on. Bottom lanes are reserved beneath it.
pub fn lower_bound(row: &Row, config: &LayoutConfig) -> f64 {
    row.baseline() - config.row_descent - f64::from(row.min_slot.unsigned_abs()) * config.slot_interval
}

/// Absolute y where an arc attaches above the word, `None` for unplaced words.
pub fn word_top_y(state: &LayoutState, config: &LayoutConfig, word: WordId) -> Option<f64> {
    let placement = state.placement(word)?;
    let row = state.row(placement.row?)?;
    Some(lower_bound(row, config) - placement.box_height())
}

/// Absolute y where an arc attaches below the word.
pub fn word_bottom_y(state: &LayoutState, config: &LayoutConfig, word: WordId) -> Option<f64> {
    let placement = state.placement(word)?;
    let row = state.row(placement.row?)?;
    Some(lower_bound(row, config) + config.row_descent)
}

/// Absolute y of a lane on `row`. Positive slots stack upward from the text, negative downward.
pub fn lane_y(row: &Row, state: &LayoutState, config: &LayoutConfig, slot: i32) -> f64 {
    let lower = lower_bound(row, config);
    let offset = f64::from(slot.unsigned_abs()) * config.slot_interval;
    if slot >= 0 {
        lower - text_height(row, state, config) - offset
    } else {
        lower + config.row_descent + offset
    }
}

/// One segment per row crossed, from the left endpoint's x to the right endpoint's right edge.
///
/// Empty when the link is hidden, has no endpoints, or an endpoint is not placed yet.
pub fn link_segments(graph: &AnnotationGraph, state: &LayoutState, link: LinkId) -> Vec<LinkSegment> {
    let Some(link_ref) = graph.link(link) else {
        return Vec::new();
    };
    if state.is_hidden(link_ref.category()) {
        return Vec::new();
    }
    let Some(endpoints) = graph.endpoints(link) else {
        return Vec::new();
    };
    let (Some(left), Some(right)) =
        (state.placement(endpoints.left()), state.placement(endpoints.right()))
    else {
        return Vec::new();
    };
    let (Some(first), Some(last)) = (left.row(), right.row()) else {
        return Vec::new();
    };

    if first == last {
        return vec![LinkSegment { row: first, x0: left.x(), x1: right.right() }];
    }
    (first..=last)
        .filter_map(|idx| {
            let row = state.row(idx)?;
            let x0 = if idx == first { left.x() } else { 0.0 };
            let x1 = if idx == last { right.right() } else { row.rw };
            Some(LinkSegment { row: idx, x0, x1 })
        })
        .collect()
}

/// Horizontal extent of a link summed over every row it crosses.
pub fn link_width(graph: &AnnotationGraph, state: &LayoutState, link: LinkId) -> f64 {
    link_segments(graph, state, link).iter().map(LinkSegment::width).sum()
}
