// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Textarc-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Textarc and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smol_str::SmolStr;

use super::ids::{ClusterId, WordId};

/// A single token of the annotated text. Content is immutable once the graph is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    id: WordId,
    text: SmolStr,
    tag: Option<SmolStr>,
    is_punct: bool,
}

impl Word {
    pub fn new(id: WordId, text: impl Into<SmolStr>) -> Self {
        let text = text.into();
        let is_punct = is_punctuation(&text);
        Self { id, text, tag: None, is_punct }
    }

    pub fn with_tag(mut self, tag: Option<SmolStr>) -> Self {
        self.tag = tag;
        self
    }

    pub fn id(&self) -> WordId {
        self.id
    }

    /// Sequence position; identical to `id().index()`.
    pub fn idx(&self) -> usize {
        self.id.index()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn is_punct(&self) -> bool {
        self.is_punct
    }
}

fn is_punctuation(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|ch| ch.is_ascii_punctuation() || is_unicode_punct(ch))
}

fn is_unicode_punct(ch: char) -> bool {
    matches!(ch, '\u{2010}'..='\u{2027}' | '\u{2030}'..='\u{205E}' | '\u{3001}'..='\u{3003}')
}

/// A contiguous multi-word span carrying its own label (e.g. a named entity).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCluster {
    id: ClusterId,
    first: WordId,
    last: WordId,
    label: SmolStr,
}

impl WordCluster {
    pub(crate) fn new(id: ClusterId, first: WordId, last: WordId, label: SmolStr) -> Self {
        Self { id, first, last, label }
    }

    pub fn id(&self) -> ClusterId {
        self.id
    }

    pub fn first(&self) -> WordId {
        self.first
    }

    pub fn last(&self) -> WordId {
        self.last
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn contains(&self, word: WordId) -> bool {
        self.first <= word && word <= self.last
    }

    pub fn words(&self) -> impl Iterator<Item = WordId> {
        (self.first.index()..=self.last.index()).map(WordId::new)
    }
}
