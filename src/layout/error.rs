// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Textarc-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Textarc and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::WordId;

/// Structural errors: a caller broke a layout invariant. Never produced by ordinary drags.
///
/// Running out of room for a move is not an error; see `Layout::move_word_on_row`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("row {row} out of bounds (rows={len})")]
    RowOutOfBounds { row: usize, len: usize },
    #[error("index {index} out of bounds for row {row} (words={len})")]
    WordIndexOutOfBounds { row: usize, index: usize, len: usize },
    #[error("unknown word {word}")]
    UnknownWord { word: WordId },
    #[error("word {word} is already placed on row {row}")]
    WordAlreadyPlaced { word: WordId, row: usize },
    #[error("word {word} is not placed on any row")]
    WordNotPlaced { word: WordId },
    #[error("word {word} cannot be placed between {before:?} and {after:?}")]
    OrderViolation { word: WordId, before: Option<WordId>, after: Option<WordId> },
    #[error("word {word} at x={x} overlaps its predecessor (min x={min_x})")]
    Overlap { word: WordId, x: f64, min_x: f64 },
    #[error("row {row} has no row above it")]
    NoRowAbove { row: usize },
    #[error("row {row} has no words")]
    EmptyRow { row: usize },
    #[error("row {row} still holds {words} words")]
    RowNotEmpty { row: usize, words: usize },
    #[error("container width {width} leaves no room for words")]
    InvalidWidth { width: f64 },
    #[error("{reason}")]
    InvalidConfig { reason: String },
}
