// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Textarc-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Textarc and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use super::config::LayoutConfig;
use crate::model::Word;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextStyle {
    Word,
    Tag,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBox {
    pub width: f64,
    pub height: f64,
}

impl TextBox {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Text-measurement collaborator. Must be pure: equal input, equal box.
pub trait TextMeasure {
    fn measure(&self, text: &str, style: TextStyle) -> TextBox;
}

impl<F> TextMeasure for F
where
    F: Fn(&str, TextStyle) -> TextBox,
{
    fn measure(&self, text: &str, style: TextStyle) -> TextBox {
        self(text, style)
    }
}

/// Fixed-pitch measurement by terminal display width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasure {
    pub char_width: f64,
    pub line_height: f64,
    /// Tags are typically rendered in a smaller font.
    pub tag_scale: f64,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self { char_width: 8.0, line_height: 16.0, tag_scale: 0.75 }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure(&self, text: &str, style: TextStyle) -> TextBox {
        let columns = UnicodeWidthStr::width(text) as f64;
        let scale = match style {
            TextStyle::Word => 1.0,
            TextStyle::Tag => self.tag_scale,
        };
        TextBox::new(columns * self.char_width * scale, self.line_height * scale)
    }
}

/// The box a word occupies on its row: its text, with the tag (if any) stacked above.
pub fn measure_word(measure: &impl TextMeasure, word: &Word, config: &LayoutConfig) -> TextBox {
    let text = measure.measure(word.text(), TextStyle::Word);
    match word.tag() {
        Some(tag) => {
            let tag = measure.measure(tag, TextStyle::Tag);
            TextBox::new(text.width.max(tag.width), text.height + config.tag_gap + tag.height)
        }
        None => text,
    }
}
