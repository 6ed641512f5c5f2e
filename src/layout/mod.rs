// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Textarc-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Textarc and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Layout engine for annotated text.
//!
//! Words flow left-to-right into rows like wrapped text, and every link gets a signed lane above
//! or below the text. [`Layout`] owns the immutable graph, the configuration and the mutable
//! [`LayoutState`]; every mutation runs on a copy of the state and is committed only when it
//! succeeds.

pub mod config;
pub mod error;
pub mod geometry;
pub mod measure;
mod row;
mod row_manager;
pub mod slots;
mod snapshot;
mod state;

use smol_str::SmolStr;

use crate::model::{AnnotationGraph, Endpoints, LinkId, WordId};
use row_manager::RowManager;

pub use config::{ConfigError, LayoutConfig};
pub use error::LayoutError;
pub use geometry::LinkSegment;
pub use measure::{measure_word, MonospaceMeasure, TextBox, TextMeasure, TextStyle};
pub use row::Row;
pub use slots::{assign_slots, SlotAssigner};
pub use snapshot::{LayoutSnapshot, LinkSnapshot, RowSnapshot, WordSnapshot};
pub use state::{LayoutState, WordPlacement};

#[derive(Debug, Clone)]
pub struct Layout {
    graph: AnnotationGraph,
    config: LayoutConfig,
    state: LayoutState,
    rev: u64,
}

impl Layout {
    /// Measures and places every word, assigns slots and sizes rows.
    pub fn new(
        graph: AnnotationGraph,
        config: LayoutConfig,
        width: f64,
        measure: &impl TextMeasure,
    ) -> Result<Self, LayoutError> {
        let mut layout = Self::unplaced(graph, config, width, measure)?;
        let mut rows = RowManager::new(&layout.graph, &layout.config, &mut layout.state);
        rows.flow_all()?;
        rows.resize_all();
        tracing::debug!(
            words = layout.graph.words().len(),
            links = layout.graph.links().len(),
            rows = layout.state.rows().len(),
            "layout built"
        );
        Ok(layout)
    }

    /// Measures every word but places none; words are added through [`Self::add_word_to_row`].
    pub fn unplaced(
        graph: AnnotationGraph,
        config: LayoutConfig,
        width: f64,
        measure: &impl TextMeasure,
    ) -> Result<Self, LayoutError> {
        let boxes = graph.words().iter().map(|word| measure_word(measure, word, &config)).collect();
        Self::from_boxes(graph, config, width, boxes)
    }

    fn from_boxes(
        graph: AnnotationGraph,
        config: LayoutConfig,
        width: f64,
        boxes: Vec<TextBox>,
    ) -> Result<Self, LayoutError> {
        config.validate().map_err(|err| LayoutError::InvalidConfig { reason: err.to_string() })?;
        if !(width.is_finite() && width > 2.0 * config.edge_padding) {
            return Err(LayoutError::InvalidWidth { width });
        }
        let mut state = LayoutState::new(width, boxes, graph.links().len());
        state.slots = assign_slots(&graph, &state.hidden);
        RowManager::new(&graph, &config, &mut state).resize_all();
        Ok(Self { graph, config, state, rev: 0 })
    }

    pub fn graph(&self) -> &AnnotationGraph {
        &self.graph
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn state(&self) -> &LayoutState {
        &self.state
    }

    /// Bumped on every committed mutation.
    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn width(&self) -> f64 {
        self.state.width()
    }

    pub fn rows(&self) -> &[Row] {
        self.state.rows()
    }

    pub fn row(&self, row: usize) -> Option<&Row> {
        self.state.row(row)
    }

    pub fn placement(&self, word: WordId) -> Option<&WordPlacement> {
        self.state.placement(word)
    }

    pub fn slot(&self, link: LinkId) -> Option<i32> {
        self.state.slot(link)
    }

    pub fn endpoints(&self, link: LinkId) -> Option<Endpoints> {
        self.graph.endpoints(link)
    }

    pub fn canvas_height(&self) -> f64 {
        self.state.canvas_height()
    }

    fn mutate<T>(
        &mut self,
        op: impl FnOnce(&mut RowManager<'_>) -> Result<T, LayoutError>,
    ) -> Result<T, LayoutError> {
        let mut next = self.state.clone();
        let mut rows = RowManager::new(&self.graph, &self.config, &mut next);
        let out = op(&mut rows)?;
        rows.resize_all();
        self.commit(next);
        Ok(out)
    }

    fn commit(&mut self, state: LayoutState) {
        self.state = state;
        self.rev += 1;
    }

    pub(crate) fn restore(&mut self, state: LayoutState, rev: u64) {
        self.state = state;
        self.rev = rev;
    }

    pub(crate) fn set_rev(&mut self, rev: u64) {
        self.rev = rev;
    }

    /// Appends an empty row and returns its index.
    pub fn append_row(&mut self) -> usize {
        let mut next = self.state.clone();
        let mut rows = RowManager::new(&self.graph, &self.config, &mut next);
        let row = rows.append_row();
        rows.resize_all();
        self.commit(next);
        row
    }

    pub fn remove_last_row(&mut self) -> Result<(), LayoutError> {
        self.mutate(|rows| rows.remove_last_row())
    }

    /// Inserts `word` on `row` (at the end when `index` is `None`), then cascades overflow into
    /// the rows below. Returns the index of the first word that no longer fitted, if any.
    pub fn add_word_to_row(
        &mut self,
        word: WordId,
        row: usize,
        index: Option<usize>,
        force_x: Option<f64>,
    ) -> Result<Option<usize>, LayoutError> {
        self.mutate(|rows| rows.add_word_to_row(word, row, index, force_x))
    }

    /// Drags a placed word by `dx` pixels.
    ///
    /// `Ok(false)` means no row had room for a leftward cascade; the layout is left untouched and
    /// the word should snap back.
    pub fn move_word_on_row(&mut self, word: WordId, dx: f64) -> Result<bool, LayoutError> {
        let mut next = self.state.clone();
        let mut rows = RowManager::new(&self.graph, &self.config, &mut next);
        if !rows.move_word_on_row(word, dx)? {
            return Ok(false);
        }
        rows.resize_all();
        self.commit(next);
        Ok(true)
    }

    /// Moves the first word of `row` to the end of the row above.
    pub fn move_word_up_a_row(&mut self, row: usize) -> Result<(), LayoutError> {
        self.mutate(|rows| rows.move_word_up_a_row(row))
    }

    /// Moves the last word of `row` to the start of the row below, creating it if needed.
    pub fn move_word_down_a_row(&mut self, row: usize) -> Result<(), LayoutError> {
        self.mutate(|rows| rows.move_word_down_a_row(row))
    }

    /// Changes a row's height by `dy` and returns the change actually applied.
    pub fn resize_row(&mut self, row: usize, dy: f64) -> Result<f64, LayoutError> {
        self.mutate(|rows| rows.resize_row(row, dy))
    }

    /// Container resize.
    pub fn set_width(&mut self, width: f64) -> Result<(), LayoutError> {
        self.mutate(|rows| rows.set_width(width))
    }

    pub fn resize_all(&mut self) {
        let mut next = self.state.clone();
        RowManager::new(&self.graph, &self.config, &mut next).resize_all();
        if next != self.state {
            self.commit(next);
        }
    }

    /// Re-flows every word from scratch. Row heights reset to their minimum.
    pub fn reflow(&mut self) -> Result<(), LayoutError> {
        self.mutate(|rows| rows.reflow())
    }

    /// Shows or hides every link of `category`. Returns whether visibility changed.
    pub fn set_category_visible(&mut self, category: &str, visible: bool) -> bool {
        let mut next = self.state.clone();
        let changed = if visible {
            next.hidden.remove(category)
        } else {
            next.hidden.insert(SmolStr::new(category))
        };
        if !changed {
            return false;
        }
        self.reslot(next);
        true
    }

    /// Discards every slot and recomputes all of them in canonical order.
    pub fn recompute_slots(&mut self) {
        self.reslot(self.state.clone());
    }

    fn reslot(&mut self, mut next: LayoutState) {
        next.slots = assign_slots(&self.graph, &next.hidden);
        RowManager::new(&self.graph, &self.config, &mut next).resize_all();
        self.commit(next);
    }

    pub fn baseline(&self, row: usize) -> Option<f64> {
        self.state.row(row).map(Row::baseline)
    }

    pub fn lower_bound(&self, row: usize) -> Option<f64> {
        self.state.row(row).map(|row| geometry::lower_bound(row, &self.config))
    }

    pub fn min_height(&self, row: usize) -> Option<f64> {
        self.state.row(row).map(|row| geometry::min_height(row, &self.state, &self.config))
    }

    pub fn lane_y(&self, row: usize, slot: i32) -> Option<f64> {
        self.state.row(row).map(|row| geometry::lane_y(row, &self.state, &self.config, slot))
    }

    pub fn word_top_y(&self, word: WordId) -> Option<f64> {
        geometry::word_top_y(&self.state, &self.config, word)
    }

    pub fn word_bottom_y(&self, word: WordId) -> Option<f64> {
        geometry::word_bottom_y(&self.state, &self.config, word)
    }

    pub fn link_segments(&self, link: LinkId) -> Vec<LinkSegment> {
        geometry::link_segments(&self.graph, &self.state, link)
    }

    pub fn link_width(&self, link: LinkId) -> f64 {
        geometry::link_width(&self.graph, &self.state, link)
    }

    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot::capture(self)
    }

    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.snapshot())
    }
}

#[cfg(test)]
mod tests;
