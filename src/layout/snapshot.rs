// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Textarc-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Textarc and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::Serialize;

use super::geometry::{self, LinkSegment};
use super::Layout;

/// Read-only geometry a renderer needs to draw rows, words and arcs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSnapshot {
    pub rev: u64,
    pub width: f64,
    pub canvas_height: f64,
    pub rows: Vec<RowSnapshot>,
    pub words: Vec<WordSnapshot>,
    pub links: Vec<LinkSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowSnapshot {
    pub idx: usize,
    pub ry: f64,
    pub rh: f64,
    pub rw: f64,
    pub min_slot: i32,
    pub max_slot: i32,
    pub words: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordSnapshot {
    pub idx: usize,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub row: Option<usize>,
    pub x: f64,
    pub box_width: f64,
    pub box_height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSnapshot {
    pub event_id: String,
    pub category: String,
    pub top: bool,
    pub slot: Option<i32>,
    pub endpoints: Option<[usize; 2]>,
    pub width: f64,
    pub segments: Vec<LinkSegment>,
}

impl LayoutSnapshot {
    pub(crate) fn capture(layout: &Layout) -> Self {
        let graph = layout.graph();
        let state = layout.state();

        let rows = state
            .rows()
            .iter()
            .map(|row| RowSnapshot {
                idx: row.idx(),
                ry: row.ry(),
                rh: row.rh(),
                rw: row.rw(),
                min_slot: row.min_slot(),
                max_slot: row.max_slot(),
                words: row.words().iter().map(|word| word.index()).collect(),
            })
            .collect();

        let words = graph
            .words()
            .iter()
            .zip(state.placements())
            .map(|(word, placement)| WordSnapshot {
                idx: word.idx(),
                text: word.text().to_owned(),
                tag: word.tag().map(str::to_owned),
                row: placement.row(),
                x: placement.x(),
                box_width: placement.box_width(),
                box_height: placement.box_height(),
            })
            .collect();

        let links = graph
            .links()
            .iter()
            .map(|link| {
                let segments = geometry::link_segments(graph, state, link.id());
                LinkSnapshot {
                    event_id: link.event_id().to_string(),
                    category: link.category().to_owned(),
                    top: link.is_top(),
                    slot: state.slot(link.id()),
                    endpoints: graph
                        .endpoints(link.id())
                        .map(|endpoints| [endpoints.left().index(), endpoints.right().index()]),
                    width: segments.iter().map(LinkSegment::width).sum(),
                    segments,
                }
            })
            .collect();

        Self {
            rev: layout.rev(),
            width: state.width(),
            canvas_height: state.canvas_height(),
            rows,
            words,
            links,
        }
    }
}
