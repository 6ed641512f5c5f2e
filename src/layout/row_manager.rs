// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Textarc-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Textarc and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Word flow: placing words on rows, overflow cascades and drag repositioning.
//!
//! `RowManager` borrows a `LayoutState` for the duration of one operation. Callers hand it a
//! working copy and commit the copy only when the operation succeeds, so the routines here may
//! leave the state half-updated on an error or a rejected move.

use tracing::debug;

use super::config::LayoutConfig;
use super::error::LayoutError;
use super::geometry;
use super::row::Row;
use super::state::LayoutState;
use crate::model::{AnnotationGraph, WordId};

/// Tolerance for pixel comparisons.
const EPS: f64 = 1e-6;

pub(crate) struct RowManager<'a> {
    graph: &'a AnnotationGraph,
    config: &'a LayoutConfig,
    state: &'a mut LayoutState,
}

impl<'a> RowManager<'a> {
    pub(crate) fn new(
        graph: &'a AnnotationGraph,
        config: &'a LayoutConfig,
        state: &'a mut LayoutState,
    ) -> Self {
        Self { graph, config, state }
    }

    fn padding_before(&self, word: WordId) -> f64 {
        match self.graph.word(word) {
            Some(word) if word.is_punct() => self.config.punct_padding,
            _ => self.config.word_padding,
        }
    }

    /// Rightmost x a word's right edge may reach on `row`.
    fn limit(&self, row: usize) -> f64 {
        self.state.rows[row].rw - self.config.edge_padding
    }

    pub(crate) fn append_row(&mut self) -> usize {
        let idx = self.state.rows.len();
        let ry = self.state.rows.last().map_or(0.0, |row| row.baseline() + self.config.row_gap);
        let rh = self.config.min_text_height + self.config.row_descent;
        self.state.rows.push(Row::new(idx, ry, rh, self.state.width));
        debug!(row = idx, "row created");
        idx
    }

    pub(crate) fn remove_last_row(&mut self) -> Result<(), LayoutError> {
        let len = self.state.rows.len();
        let Some(last) = self.state.rows.last() else {
            return Err(LayoutError::RowOutOfBounds { row: 0, len });
        };
        if !last.is_empty() {
            return Err(LayoutError::RowNotEmpty { row: len - 1, words: last.words.len() });
        }
        self.state.rows.pop();
        debug!(row = len - 1, "row removed");
        Ok(())
    }

    fn remove_row(&mut self, row: usize) {
        let state = &mut *self.state;
        state.rows.remove(row);
        for idx in row..state.rows.len() {
            state.rows[idx].idx = idx;
            for word in &state.rows[idx].words {
                state.words[word.index()].row = Some(idx);
            }
        }
        debug!(row, "empty row removed");
    }

    /// Places `word` and cascades any overflow into the rows below.
    ///
    /// Returns the index of the first word that no longer fitted on `row`, if any.
    pub(crate) fn add_word_to_row(
        &mut self,
        word: WordId,
        row: usize,
        index: Option<usize>,
        force_x: Option<f64>,
    ) -> Result<Option<usize>, LayoutError> {
        let index = match index {
            Some(index) => index,
            None => self.state.check_row(row)?.words.len(),
        };
        let overflow = self.insert_word(word, row, index, force_x)?;
        self.cascade(row, overflow)?;
        Ok(overflow)
    }

    fn insert_word(
        &mut self,
        word: WordId,
        row: usize,
        index: usize,
        force_x: Option<f64>,
    ) -> Result<Option<usize>, LayoutError> {
        if let Some(current) = self.state.check_word(word)?.row {
            return Err(LayoutError::WordAlreadyPlaced { word, row: current });
        }
        let len = self.state.check_row(row)?.words.len();
        if index > len {
            return Err(LayoutError::WordIndexOutOfBounds { row, index, len });
        }
        let before = self.word_before(row, index);
        let after = self.word_after(row, index);
        if before.is_some_and(|before| before >= word) || after.is_some_and(|after| after <= word) {
            return Err(LayoutError::OrderViolation { word, before, after });
        }

        let min_x = match index.checked_sub(1) {
            Some(prev) => {
                let prev = self.state.rows[row].words[prev];
                self.state.right(prev) + self.padding_before(word)
            }
            None => self.config.edge_padding,
        };
        let x = match force_x {
            Some(x) if index > 0 && x < min_x - EPS => {
                return Err(LayoutError::Overlap { word, x, min_x });
            }
            Some(x) => x.max(min_x),
            None => min_x,
        };

        self.state.rows[row].words.insert(index, word);
        let placement = &mut self.state.words[word.index()];
        placement.row = Some(row);
        placement.x = x;
        self.push_following(row, index);
        Ok(self.first_overflow(row, index))
    }

    fn word_before(&self, row: usize, index: usize) -> Option<WordId> {
        if index > 0 {
            return self.state.rows[row].words.get(index - 1).copied();
        }
        self.state.rows[..row].iter().rev().find_map(Row::last_word)
    }

    fn word_after(&self, row: usize, index: usize) -> Option<WordId> {
        if let Some(word) = self.state.rows[row].words.get(index) {
            return Some(*word);
        }
        self.state.rows[row + 1..].iter().find_map(Row::first_word)
    }

    /// Shifts words after `index` right until none overlaps its predecessor.
    fn push_following(&mut self, row: usize, index: usize) {
        let len = self.state.rows[row].words.len();
        for i in index..len.saturating_sub(1) {
            let (prev, next) = (self.state.rows[row].words[i], self.state.rows[row].words[i + 1]);
            let min_x = self.state.right(prev) + self.padding_before(next);
            if self.state.x(next) >= min_x - EPS {
                break;
            }
            self.state.set_x(next, min_x);
        }
    }

    /// Shifts words before `index` left until none overlaps its successor.
    fn pull_preceding(&mut self, row: usize, index: usize) {
        for i in (0..index).rev() {
            let (word, next) = (self.state.rows[row].words[i], self.state.rows[row].words[i + 1]);
            let max_x = self.state.x(next) - self.padding_before(next) - self.state.box_width(word);
            if self.state.x(word) <= max_x + EPS {
                break;
            }
            self.state.set_x(word, max_x);
        }
    }

    /// First index at or after `from` whose word crosses the right edge. The first word of a row
    /// never counts, so a lone over-wide word stays put.
    fn first_overflow(&self, row: usize, from: usize) -> Option<usize> {
        let limit = self.limit(row);
        let words = &self.state.rows[row].words;
        (from.max(1)..words.len()).find(|&k| self.state.right(words[k]) > limit + EPS)
    }

    fn cascade(&mut self, row: usize, overflow: Option<usize>) -> Result<(), LayoutError> {
        let mut pending = overflow.map(|index| (row, index));
        while let Some((row, index)) = pending {
            let spilled = self.state.rows[row].words.split_off(index);
            for word in &spilled {
                self.state.words[word.index()].row = None;
            }
            let next = row + 1;
            if next == self.state.rows.len() {
                self.append_row();
            }
            debug!(row, next, words = spilled.len(), "overflow cascade");
            for (offset, word) in spilled.into_iter().enumerate() {
                self.insert_word(word, next, offset, None)?;
            }
            pending = self.first_overflow(next, 1).map(|index| (next, index));
        }
        Ok(())
    }

    /// Repositions a placed word by `dx`. `Ok(false)` means there was no room for the move.
    pub(crate) fn move_word_on_row(&mut self, word: WordId, dx: f64) -> Result<bool, LayoutError> {
        let (row, index) = self.state.locate(word)?;
        if dx > 0.0 {
            self.move_right(row, index, dx)
        } else if dx < 0.0 {
            self.move_left(row, index, dx)
        } else {
            Ok(true)
        }
    }

    fn move_right(&mut self, row: usize, index: usize, dx: f64) -> Result<bool, LayoutError> {
        let word = self.state.rows[row].words[index];
        self.state.set_x(word, self.state.x(word) + dx);
        self.push_following(row, index);
        self.settle_end(row)?;
        Ok(true)
    }

    /// Pushes trailing words down until the row's last word fits. A lone word is clamped instead.
    fn settle_end(&mut self, row: usize) -> Result<(), LayoutError> {
        loop {
            let limit = self.limit(row);
            let Some(last) = self.state.rows[row].last_word() else {
                return Ok(());
            };
            if self.state.right(last) <= limit + EPS {
                return Ok(());
            }
            if self.state.rows[row].words.len() > 1 {
                self.move_word_down_a_row(row)?;
            } else {
                let x = (limit - self.state.box_width(last)).max(self.config.edge_padding);
                self.state.set_x(last, x);
                return Ok(());
            }
        }
    }

    fn move_left(&mut self, row: usize, index: usize, dx: f64) -> Result<bool, LayoutError> {
        let word = self.state.rows[row].words[index];
        self.state.set_x(word, self.state.x(word) + dx);
        self.pull_preceding(row, index);

        let edge = self.config.edge_padding;
        let leading = self.state.rows[row]
            .words
            .iter()
            .take_while(|word| self.state.x(**word) < edge - EPS)
            .count();
        if leading == 0 {
            return Ok(true);
        }

        let Some(plan) = self.plan_jump_up(row, leading) else {
            debug!(word = %word, row, dx, "leftward move rejected: no room above");
            return Ok(false);
        };
        for (source, count) in plan {
            self.shift_up(source, count)?;
        }
        if self.state.rows[row].is_empty() {
            self.remove_row(row);
        }
        Ok(true)
    }

    /// Works out which words must move up so that the `leading` words of `row` fit on the row
    /// above. A row short of room passes its own leading words further up, but always keeps at
    /// least one. Returns `(source row, word count)` steps, topmost first, or `None` when the
    /// chain runs out of rows.
    fn plan_jump_up(&self, row: usize, leading: usize) -> Option<Vec<(usize, usize)>> {
        let mut incoming = self.state.rows[row].words[..leading].to_vec();
        let mut plan = vec![(row, leading)];
        let mut target = row.checked_sub(1)?;
        loop {
            let own = &self.state.rows[target].words;
            let pass_up = (0..own.len().max(1))
                .find(|&count| self.packed_fits(target, &own[count..], &incoming))?;
            if pass_up == 0 {
                break;
            }
            plan.push((target, pass_up));
            incoming = own[..pass_up].to_vec();
            target = target.checked_sub(1)?;
        }
        plan.reverse();
        Some(plan)
    }

    /// Whether `own` followed by `incoming` fits on `row` when packed against the left edge.
    fn packed_fits(&self, row: usize, own: &[WordId], incoming: &[WordId]) -> bool {
        let mut right = self.config.edge_padding;
        for (i, word) in own.iter().chain(incoming).enumerate() {
            if i > 0 {
                right += self.padding_before(*word);
            }
            right += self.state.box_width(*word);
        }
        right <= self.limit(row) + EPS
    }

    /// Moves the first `count` words of `source` to the end of the row above.
    fn shift_up(&mut self, source: usize, count: usize) -> Result<(), LayoutError> {
        let moved = self.state.rows[source].words.drain(..count).collect::<Vec<_>>();
        for word in &moved {
            self.state.words[word.index()].row = None;
        }
        let target = source - 1;
        for word in moved {
            let index = self.state.rows[target].words.len();
            self.insert_word(word, target, index, None)?;
        }
        self.fit_row_end(target)
    }

    pub(crate) fn move_word_up_a_row(&mut self, row: usize) -> Result<(), LayoutError> {
        let word = self.state.check_row(row)?.first_word().ok_or(LayoutError::EmptyRow { row })?;
        let Some(target) = row.checked_sub(1) else {
            return Err(LayoutError::NoRowAbove { row });
        };
        self.state.rows[row].words.remove(0);
        self.state.words[word.index()].row = None;
        let index = self.state.rows[target].words.len();
        self.insert_word(word, target, index, None)?;
        self.fit_row_end(target)?;
        if self.state.rows[row].is_empty() {
            self.remove_row(row);
        }
        Ok(())
    }

    pub(crate) fn move_word_down_a_row(&mut self, row: usize) -> Result<(), LayoutError> {
        let word = self.state.check_row(row)?.last_word().ok_or(LayoutError::EmptyRow { row })?;
        self.state.rows[row].words.pop();
        self.state.words[word.index()].row = None;
        let next = row + 1;
        if next == self.state.rows.len() {
            self.append_row();
        }
        let overflow = self.insert_word(word, next, 0, None)?;
        self.cascade(next, overflow)?;
        if self.state.rows[row].is_empty() {
            self.remove_row(row);
        }
        Ok(())
    }

    /// Makes an overfull row fit: first by sliding words left only as far as needed, then by
    /// packing and cascading the remainder down.
    fn fit_row_end(&mut self, row: usize) -> Result<(), LayoutError> {
        if self.first_overflow(row, 1).is_none() {
            return Ok(());
        }
        if !self.compact_right(row) {
            self.pack_left(row);
        }
        let overflow = self.first_overflow(row, 1);
        self.cascade(row, overflow)
    }

    fn compact_right(&mut self, row: usize) -> bool {
        let mut bound = self.limit(row);
        for i in (0..self.state.rows[row].words.len()).rev() {
            let word = self.state.rows[row].words[i];
            let max_x = bound - self.state.box_width(word);
            if self.state.x(word) <= max_x + EPS {
                return true;
            }
            self.state.set_x(word, max_x);
            bound = max_x - self.padding_before(word);
        }
        self.state.rows[row]
            .first_word()
            .map_or(true, |first| self.state.x(first) >= self.config.edge_padding - EPS)
    }

    fn pack_left(&mut self, row: usize) {
        let mut x = self.config.edge_padding;
        for i in 0..self.state.rows[row].words.len() {
            let word = self.state.rows[row].words[i];
            if i > 0 {
                x += self.padding_before(word);
            }
            self.state.set_x(word, x);
            x += self.state.box_width(word);
        }
    }

    /// Changes a row's height by `dy`, never below its minimum. Returns the applied change.
    pub(crate) fn resize_row(&mut self, row: usize, dy: f64) -> Result<f64, LayoutError> {
        self.state.check_row(row)?;
        self.refresh_slot_extents();
        let min = geometry::min_height(&self.state.rows[row], &*self.state, self.config);
        let old = self.state.rows[row].rh;
        let dy = if dy.is_finite() { dy } else { 0.0 };
        let new = (old + dy).max(min);
        self.state.rows[row].rh = new;
        self.restack(row + 1);
        Ok(new - old)
    }

    pub(crate) fn set_width(&mut self, width: f64) -> Result<(), LayoutError> {
        if !(width.is_finite() && width > 2.0 * self.config.edge_padding) {
            return Err(LayoutError::InvalidWidth { width });
        }
        self.state.width = width;
        for row in &mut self.state.rows {
            row.rw = width;
        }
        let mut row = 0;
        while row < self.state.rows.len() {
            self.settle_end(row)?;
            row += 1;
        }
        Ok(())
    }

    /// Refreshes lane extents, grows rows to their minimum height and restacks them.
    pub(crate) fn resize_all(&mut self) {
        self.refresh_slot_extents();
        for i in 0..self.state.rows.len() {
            let min = geometry::min_height(&self.state.rows[i], &*self.state, self.config);
            let row = &mut self.state.rows[i];
            row.rh = row.rh.max(min);
        }
        self.restack(0);
        self.state.canvas_height =
            self.state.rows.last().map_or(0.0, Row::baseline) + self.config.canvas_padding;
    }

    /// Rows stay stacked `row_gap` apart, so shifting by a height change and keeping the gap
    /// agree.
    fn restack(&mut self, from: usize) {
        for i in from..self.state.rows.len() {
            let ry = match i.checked_sub(1) {
                Some(prev) => self.state.rows[prev].baseline() + self.config.row_gap,
                None => 0.0,
            };
            self.state.rows[i].ry = ry;
        }
    }

    /// Lane extents include rows a link only passes through.
    fn refresh_slot_extents(&mut self) {
        let state = &mut *self.state;
        for row in &mut state.rows {
            row.min_slot = 0;
            row.max_slot = 0;
        }
        for link in self.graph.link_ids() {
            let Some(slot) = state.slot(link) else {
                continue;
            };
            let Some(endpoints) = self.graph.endpoints(link) else {
                continue;
            };
            let (Some(first), Some(last)) = (
                state.words[endpoints.left().index()].row,
                state.words[endpoints.right().index()].row,
            ) else {
                continue;
            };
            for row in &mut state.rows[first.min(last)..=first.max(last)] {
                if slot > 0 {
                    row.max_slot = row.max_slot.max(slot);
                } else {
                    row.min_slot = row.min_slot.min(slot);
                }
            }
        }
    }

    /// Greedy flow of every unplaced word, in sequence order, onto the last row.
    pub(crate) fn flow_all(&mut self) -> Result<(), LayoutError> {
        for idx in 0..self.state.words.len() {
            if self.state.words[idx].row.is_some() {
                continue;
            }
            let word = WordId::new(idx);
            if self.state.rows.is_empty() {
                self.append_row();
            }
            let mut row = self.state.rows.len() - 1;
            if let Some(prev) = self.state.rows[row].last_word() {
                let right = self.state.right(prev)
                    + self.padding_before(word)
                    + self.state.box_width(word);
                if right > self.limit(row) + EPS {
                    row = self.append_row();
                }
            }
            let index = self.state.rows[row].words.len();
            self.insert_word(word, row, index, None)?;
        }
        Ok(())
    }

    /// Drops every placement and flows all words again from the first row.
    pub(crate) fn reflow(&mut self) -> Result<(), LayoutError> {
        self.state.rows.clear();
        for placement in &mut self.state.words {
            placement.row = None;
            placement.x = 0.0;
        }
        debug!(words = self.state.words.len(), "reflow");
        self.flow_all()
    }
}
