// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Textarc-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Textarc and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::WordId;

/// One wrapped line of words.
///
/// `min_slot`/`max_slot` cover every link that touches the row, including links that only pass
/// through it on the way between endpoints on other rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub(crate) idx: usize,
    pub(crate) ry: f64,
    pub(crate) rh: f64,
    pub(crate) rw: f64,
    pub(crate) words: Vec<WordId>,
    pub(crate) min_slot: i32,
    pub(crate) max_slot: i32,
}

impl Row {
    pub(crate) fn new(idx: usize, ry: f64, rh: f64, rw: f64) -> Self {
        Self { idx, ry, rh, rw, words: Vec::new(), min_slot: 0, max_slot: 0 }
    }

    pub fn idx(&self) -> usize {
        self.idx
    }

    pub fn ry(&self) -> f64 {
        self.ry
    }

    pub fn rh(&self) -> f64 {
        self.rh
    }

    pub fn rw(&self) -> f64 {
        self.rw
    }

    pub fn words(&self) -> &[WordId] {
        &self.words
    }

    pub fn min_slot(&self) -> i32 {
        self.min_slot
    }

    pub fn max_slot(&self) -> i32 {
        self.max_slot
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn first_word(&self) -> Option<WordId> {
        self.words.first().copied()
    }

    pub fn last_word(&self) -> Option<WordId> {
        self.words.last().copied()
    }

    /// `ry + rh`.
    pub fn baseline(&self) -> f64 {
        self.ry + self.rh
    }

    /// Number of lanes stacked on the row, top and bottom combined.
    pub fn lane_count(&self) -> u32 {
        (i64::from(self.max_slot) - i64::from(self.min_slot)).unsigned_abs() as u32
    }
}
