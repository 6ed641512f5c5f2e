// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Textarc-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Textarc and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! UI events applied to a layout in batches.
//!
//! Batches are applied with optimistic concurrency (revision checks): an event computed against
//! an older revision is refused instead of being interleaved with newer mutations. The result
//! carries a delta telling the renderer which words, rows and links to redraw.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::layout::{Layout, LayoutError, LayoutState};
use crate::model::{AnnotationGraph, LinkId, WordId};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum LayoutOp {
    #[serde(rename_all = "camelCase")]
    AddWord { word: WordId, row: usize, index: Option<usize>, force_x: Option<f64> },
    MoveWord { word: WordId, dx: f64 },
    ResizeRow { row: usize, dy: f64 },
    SetWidth { width: f64 },
    SetCategoryVisible { category: SmolStr, visible: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApplyResult {
    pub new_rev: u64,
    /// Ops that took effect.
    pub applied: usize,
    /// Indices of moves refused for lack of room. They change nothing.
    pub rejected: Vec<usize>,
    pub delta: Delta,
}

/// What changed between the layout before and after a batch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Delta {
    pub moved_words: Vec<WordId>,
    pub resized_rows: Vec<usize>,
    pub rows_added: usize,
    pub rows_removed: usize,
    pub reslotted_links: Vec<LinkId>,
    /// Links anchored on moved words or on words of moved rows, plus every link nesting them.
    pub redraw_links: Vec<LinkId>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    moved_words: BTreeSet<WordId>,
    resized_rows: BTreeSet<usize>,
    reslotted_links: BTreeSet<LinkId>,
    redraw_links: BTreeSet<LinkId>,
}

impl DeltaBuilder {
    fn record_moved_word(&mut self, graph: &AnnotationGraph, word: WordId) {
        self.moved_words.insert(word);
        self.record_word_links(graph, word);
    }

    fn record_word_links(&mut self, graph: &AnnotationGraph, word: WordId) {
        self.redraw_links.extend(graph.links_on_word(word).iter().copied());
    }

    fn record_reslotted(&mut self, link: LinkId) {
        self.reslotted_links.insert(link);
        self.redraw_links.insert(link);
    }

    fn finish(mut self, graph: &AnnotationGraph, rows_added: usize, rows_removed: usize) -> Delta {
        // An arc nesting a redrawn arc is anchored on it, so it moves too.
        let mut pending = self.redraw_links.iter().copied().collect::<Vec<_>>();
        while let Some(link) = pending.pop() {
            for &parent in graph.parents(link) {
                if self.redraw_links.insert(parent) {
                    pending.push(parent);
                }
            }
        }

        Delta {
            moved_words: self.moved_words.into_iter().collect(),
            resized_rows: self.resized_rows.into_iter().collect(),
            rows_added,
            rows_removed,
            reslotted_links: self.reslotted_links.into_iter().collect(),
            redraw_links: self.redraw_links.into_iter().collect(),
        }
    }
}

fn diff(graph: &AnnotationGraph, before: &LayoutState, after: &LayoutState) -> Delta {
    let mut delta = DeltaBuilder::default();

    for (idx, (old, new)) in before.placements().iter().zip(after.placements()).enumerate() {
        if old.row() != new.row() || old.x() != new.x() {
            delta.record_moved_word(graph, WordId::new(idx));
        }
    }

    for (idx, (old, new)) in before.rows().iter().zip(after.rows()).enumerate() {
        if old.ry() != new.ry() || old.rh() != new.rh() || old.rw() != new.rw() {
            delta.resized_rows.insert(idx);
            for &word in new.words() {
                delta.record_word_links(graph, word);
            }
        }
    }

    for link in graph.link_ids() {
        if before.slot(link) != after.slot(link) {
            delta.record_reslotted(link);
        }
    }

    let (old_rows, new_rows) = (before.rows().len(), after.rows().len());
    delta.finish(graph, new_rows.saturating_sub(old_rows), old_rows.saturating_sub(new_rows))
}

/// `Ok(false)` when the op was refused for lack of room.
fn apply_op(layout: &mut Layout, op: &LayoutOp) -> Result<bool, LayoutError> {
    match op {
        LayoutOp::AddWord { word, row, index, force_x } => {
            layout.add_word_to_row(*word, *row, *index, *force_x)?;
            Ok(true)
        }
        LayoutOp::MoveWord { word, dx } => layout.move_word_on_row(*word, *dx),
        LayoutOp::ResizeRow { row, dy } => {
            layout.resize_row(*row, *dy)?;
            Ok(true)
        }
        LayoutOp::SetWidth { width } => {
            layout.set_width(*width)?;
            Ok(true)
        }
        LayoutOp::SetCategoryVisible { category, visible } => {
            layout.set_category_visible(category, *visible);
            Ok(true)
        }
    }
}

/// Applies `ops` in order as one atomic step.
///
/// A structural error in any op rolls the whole batch back. Moves refused for lack of room are
/// listed in `rejected` and do not abort the batch.
pub fn apply_ops(
    layout: &mut Layout,
    base_rev: u64,
    ops: &[LayoutOp],
) -> Result<ApplyResult, ApplyError> {
    let current_rev = layout.rev();
    if base_rev != current_rev {
        return Err(ApplyError::Conflict { base_rev, current_rev });
    }

    if ops.is_empty() {
        return Ok(ApplyResult {
            new_rev: current_rev,
            applied: 0,
            rejected: Vec::new(),
            delta: Delta::default(),
        });
    }

    let before = layout.state().clone();
    let mut rejected = Vec::new();
    for (op_index, op) in ops.iter().enumerate() {
        tracing::trace!(op_index, ?op, "applying layout op");
        match apply_op(layout, op) {
            Ok(true) => {}
            Ok(false) => rejected.push(op_index),
            Err(source) => {
                layout.restore(before, current_rev);
                return Err(ApplyError::Layout { op_index, source });
            }
        }
    }

    let applied = ops.len() - rejected.len();
    let new_rev = if applied > 0 { current_rev + 1 } else { current_rev };
    layout.set_rev(new_rev);
    let delta = diff(layout.graph(), &before, layout.state());
    tracing::debug!(
        new_rev,
        applied,
        rejected = rejected.len(),
        moved = delta.moved_words.len(),
        redraw = delta.redraw_links.len(),
        "layout ops applied"
    );

    Ok(ApplyResult { new_rev, applied, rejected, delta })
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApplyError {
    #[error("stale base_rev (base_rev={base_rev}, current_rev={current_rev})")]
    Conflict { base_rev: u64, current_rev: u64 },
    #[error("op {op_index} failed: {source}")]
    Layout {
        op_index: usize,
        #[source]
        source: LayoutError,
    },
}
