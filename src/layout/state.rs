// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Textarc-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Textarc and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use smol_str::SmolStr;

use super::error::LayoutError;
use super::measure::TextBox;
use super::row::Row;
use crate::model::{LinkId, WordId};

/// Where a word currently sits. `row` is `None` until the word is placed.
#[derive(Debug, Clone, PartialEq)]
pub struct WordPlacement {
    pub(crate) row: Option<usize>,
    pub(crate) x: f64,
    pub(crate) text_box: TextBox,
}

impl WordPlacement {
    pub(crate) fn unplaced(text_box: TextBox) -> Self {
        Self { row: None, x: 0.0, text_box }
    }

    pub fn row(&self) -> Option<usize> {
        self.row
    }

    /// Offset within the owning row.
    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn text_box(&self) -> TextBox {
        self.text_box
    }

    pub fn box_width(&self) -> f64 {
        self.text_box.width
    }

    pub fn box_height(&self) -> f64 {
        self.text_box.height
    }

    /// Right edge of the word's box within its row.
    pub fn right(&self) -> f64 {
        self.x + self.text_box.width
    }
}

/// Every position-related field of a visualization, kept apart from the immutable graph.
///
/// Cloning is how mutations stay atomic: operations run on a copy that is committed only when
/// the whole step succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutState {
    pub(crate) width: f64,
    pub(crate) rows: Vec<Row>,
    pub(crate) words: Vec<WordPlacement>,
    pub(crate) slots: Vec<Option<i32>>,
    pub(crate) hidden: BTreeSet<SmolStr>,
    pub(crate) canvas_height: f64,
}

impl LayoutState {
    pub(crate) fn new(width: f64, boxes: Vec<TextBox>, link_count: usize) -> Self {
        Self {
            width,
            rows: Vec::new(),
            words: boxes.into_iter().map(WordPlacement::unplaced).collect(),
            slots: vec![None; link_count],
            hidden: BTreeSet::new(),
            canvas_height: 0.0,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, row: usize) -> Option<&Row> {
        self.rows.get(row)
    }

    pub fn placements(&self) -> &[WordPlacement] {
        &self.words
    }

    pub fn placement(&self, word: WordId) -> Option<&WordPlacement> {
        self.words.get(word.index())
    }

    /// `None` for hidden links, links without endpoints, or before slots are assigned.
    pub fn slot(&self, link: LinkId) -> Option<i32> {
        self.slots.get(link.index()).copied().flatten()
    }

    pub fn is_hidden(&self, category: &str) -> bool {
        self.hidden.contains(category)
    }

    pub fn hidden_categories(&self) -> impl Iterator<Item = &str> {
        self.hidden.iter().map(SmolStr::as_str)
    }

    pub fn canvas_height(&self) -> f64 {
        self.canvas_height
    }

    pub(crate) fn check_row(&self, row: usize) -> Result<&Row, LayoutError> {
        self.rows.get(row).ok_or(LayoutError::RowOutOfBounds { row, len: self.rows.len() })
    }

    pub(crate) fn check_word(&self, word: WordId) -> Result<&WordPlacement, LayoutError> {
        self.words.get(word.index()).ok_or(LayoutError::UnknownWord { word })
    }

    /// Row index and position within that row.
    pub(crate) fn locate(&self, word: WordId) -> Result<(usize, usize), LayoutError> {
        let row = self.check_word(word)?.row.ok_or(LayoutError::WordNotPlaced { word })?;
        let index = self
            .check_row(row)?
            .words
            .binary_search(&word)
            .map_err(|_| LayoutError::WordNotPlaced { word })?;
        Ok((row, index))
    }

    pub(crate) fn x(&self, word: WordId) -> f64 {
        self.words[word.index()].x
    }

    pub(crate) fn set_x(&mut self, word: WordId, x: f64) {
        self.words[word.index()].x = x;
    }

    pub(crate) fn box_width(&self, word: WordId) -> f64 {
        self.words[word.index()].text_box.width
    }

    pub(crate) fn right(&self, word: WordId) -> f64 {
        self.words[word.index()].right()
    }
}
