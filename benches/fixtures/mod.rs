// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Textarc-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Textarc and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use textarc::layout::{Layout, LayoutConfig, MonospaceMeasure};
use textarc::model::{AnchorRef, AnnotationGraph, EventId, LinkSpec, Side};

const VOCAB: [&str; 16] = [
    "the", "kinase", "phosphorylates", "its", "substrate", "at", "several", "residues", "which",
    "in", "turn", "activates", "downstream", "transcription", "factors", "rapidly",
];

pub const CONTAINER_WIDTH: f64 = 960.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocParams {
    pub words: usize,
    /// One link starts every `stride` words.
    pub stride: usize,
    pub max_span: usize,
    /// Every n-th link also gets a parent link anchored on it.
    pub nest_every: usize,
    /// Every n-th link is drawn below the text.
    pub bottom_every: usize,
}

impl DocParams {
    pub const fn new(
        words: usize,
        stride: usize,
        max_span: usize,
        nest_every: usize,
        bottom_every: usize,
    ) -> Self {
        Self { words, stride, max_span, nest_every, bottom_every }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Sentence,
    Paragraph,
    Document,
}

impl Case {
    pub const fn id(self) -> &'static str {
        match self {
            Self::Sentence => "sentence",
            Self::Paragraph => "paragraph",
            Self::Document => "document",
        }
    }

    pub const fn params(self) -> DocParams {
        match self {
            Self::Sentence => DocParams::new(40, 2, 6, 4, 3),
            Self::Paragraph => DocParams::new(400, 2, 12, 3, 4),
            Self::Document => DocParams::new(4000, 3, 24, 3, 5),
        }
    }
}

fn event(prefix: &str, idx: usize) -> EventId {
    EventId::new(format!("{prefix}{idx:05}")).expect("valid event id")
}

fn word_text(idx: usize) -> &'static str {
    if idx % 11 == 10 {
        return ",";
    }
    VOCAB[(idx * 7 + idx / 5) % VOCAB.len()]
}

pub fn graph(params: DocParams) -> AnnotationGraph {
    let mut builder = AnnotationGraph::builder();
    for idx in 0..params.words {
        builder.word(word_text(idx));
    }

    for (n, left) in (0..params.words).step_by(params.stride.max(1)).enumerate() {
        let span = 1 + (left * 13) % params.max_span.max(1);
        let right = (left + span).min(params.words.saturating_sub(1));
        if right == left {
            continue;
        }
        let side = if n % params.bottom_every.max(1) == 0 { Side::Bottom } else { Side::Top };
        builder.link(
            LinkSpec::new(event("T", left))
                .trigger(AnchorRef::Word(left))
                .argument(AnchorRef::Word(right), "theme")
                .side(side),
        );
        if n % params.nest_every.max(1) == 0 {
            let outer = (right + 2).min(params.words - 1);
            builder.link(
                LinkSpec::new(event("N", left))
                    .trigger(AnchorRef::Word(outer))
                    .argument(AnchorRef::Event(event("T", left)), "theme")
                    .side(side),
            );
        }
    }

    builder.build().expect("valid fixture graph")
}

pub fn layout(params: DocParams) -> Layout {
    Layout::new(graph(params), LayoutConfig::default(), CONTAINER_WIDTH, &MonospaceMeasure::default())
        .expect("fixture layout")
}

pub fn checksum_layout(layout: &Layout) -> u64 {
    let mut acc = layout.rows().len() as u64;
    for row in layout.rows() {
        acc = acc.wrapping_mul(131).wrapping_add(row.words().len() as u64);
        acc = acc.wrapping_add(row.rh().to_bits());
    }
    for placement in layout.state().placements() {
        acc = acc.wrapping_mul(31).wrapping_add(placement.x().to_bits());
    }
    checksum_slots(acc, layout.graph().link_ids().map(|link| layout.slot(link)))
}

pub fn checksum_slots(seed: u64, slots: impl IntoIterator<Item = Option<i32>>) -> u64 {
    slots.into_iter().fold(seed, |acc, slot| {
        acc.wrapping_mul(17).wrapping_add(slot.map_or(0, |slot| slot.unsigned_abs() as u64 + 1))
    })
}
