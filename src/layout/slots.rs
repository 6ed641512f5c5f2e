// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Textarc-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Textarc and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Lane ("slot") assignment for links.
//!
//! Each visible link gets a signed lane: positive above the text, negative below. A link's lane
//! magnitude is one more than the largest lane among its *intervening* links, i.e. same-side
//! links anchored on (or ending at) a word strictly inside its span plus same-side links it uses
//! as anchors.
//! Links are resolved depth-first in a fixed priority order (left endpoint ascending, span
//! descending) so the result does not depend on which link was asked for first.

use std::cmp::{Ordering, Reverse};
use std::collections::BTreeSet;

use smol_str::SmolStr;

use crate::model::{Anchor, AnnotationGraph, Link, LinkId, WordId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    Pending,
    InProgress,
    Done(u32),
}

struct Frame {
    link: LinkId,
    intervening: Vec<LinkId>,
    next: usize,
    max: u32,
}

/// Memoized, cycle-guarded slot computation over one graph and one visibility setting.
pub struct SlotAssigner<'a> {
    graph: &'a AnnotationGraph,
    hidden: &'a BTreeSet<SmolStr>,
    states: Vec<SlotState>,
    cycles: usize,
}

impl<'a> SlotAssigner<'a> {
    pub fn new(graph: &'a AnnotationGraph, hidden: &'a BTreeSet<SmolStr>) -> Self {
        Self { graph, hidden, states: vec![SlotState::Pending; graph.links().len()], cycles: 0 }
    }

    /// A link takes part in slotting when its category is visible and it reaches a word.
    pub fn is_slotted(&self, link: LinkId) -> bool {
        self.graph.link(link).map_or(false, |l| !self.hidden.contains(l.category()))
            && self.graph.endpoints(link).is_some()
    }

    /// Number of times the cycle guard fired so far.
    pub fn cycles(&self) -> usize {
        self.cycles
    }

    /// Signed slot for `root`, computing (and memoizing) every link it depends on.
    pub fn slot(&mut self, root: LinkId) -> Option<i32> {
        if !self.is_slotted(root) {
            return None;
        }
        match self.states[root.index()] {
            SlotState::Done(magnitude) => return Some(self.signed(root, magnitude)),
            // Only reachable from outside while a computation is suspended; treat as unresolved.
            SlotState::InProgress => return Some(0),
            SlotState::Pending => {}
        }

        let mut stack = vec![self.open(root)];
        while let Some(frame) = stack.last_mut() {
            if let Some(&child) = frame.intervening.get(frame.next) {
                frame.next += 1;
                match self.states[child.index()] {
                    SlotState::Done(magnitude) => frame.max = frame.max.max(magnitude),
                    SlotState::InProgress => {
                        self.cycles += 1;
                        tracing::trace!(link = %child, "slot cycle guard hit");
                    }
                    SlotState::Pending => {
                        let child_frame = self.open(child);
                        stack.push(child_frame);
                    }
                }
                continue;
            }

            let Some(done) = stack.pop() else {
                break;
            };
            let magnitude = done.max.saturating_add(1);
            self.states[done.link.index()] = SlotState::Done(magnitude);
            if let Some(parent) = stack.last_mut() {
                parent.max = parent.max.max(magnitude);
            }
        }

        match self.states[root.index()] {
            SlotState::Done(magnitude) => Some(self.signed(root, magnitude)),
            _ => None,
        }
    }

    fn open(&mut self, link: LinkId) -> Frame {
        self.states[link.index()] = SlotState::InProgress;
        Frame { link, intervening: self.intervening(link), next: 0, max: 0 }
    }

    fn signed(&self, link: LinkId, magnitude: u32) -> i32 {
        self.graph.link(link).map_or(0, |l| l.side().signed(magnitude))
    }

    /// Same-side slotted links anchored or ending strictly inside `link`'s span, plus same-side
    /// slotted links that `link` anchors on, in priority order.
    ///
    /// Ends are transitive endpoints, so a link that reaches a word only through nested links
    /// still intervenes there.
    pub fn intervening(&self, link: LinkId) -> Vec<LinkId> {
        let (Some(this), Some(endpoints)) = (self.graph.link(link), self.graph.endpoints(link))
        else {
            return Vec::new();
        };
        let accept = |other: LinkId| -> bool {
            other != link
                && self.is_slotted(other)
                && self.graph.link(other).map_or(false, |o| o.side() == this.side())
        };

        let mut found = BTreeSet::new();
        for word in endpoints.left().index() + 1..endpoints.right().index() {
            let word = WordId::new(word);
            let anchored = self.graph.links_on_word(word).iter();
            for &other in anchored.chain(self.graph.links_ending_on(word)) {
                if accept(other) {
                    found.insert(other);
                }
            }
        }
        for anchor in this.anchors() {
            if let Anchor::Link(child) = anchor {
                if accept(child) {
                    found.insert(child);
                }
            }
        }

        let mut ordered = found.into_iter().collect::<Vec<_>>();
        ordered.sort_by(|a, b| priority(self.graph, *a, *b));
        ordered
    }

    /// Final signed slots for every link (`None` for links that are not slotted).
    pub fn into_slots(mut self) -> Vec<Option<i32>> {
        for link in traversal_order(self.graph, self.hidden) {
            self.slot(link);
        }
        let graph = self.graph;
        self.states
            .iter()
            .zip(graph.links())
            .map(|(state, link)| match state {
                SlotState::Done(magnitude) if !self.hidden.contains(link.category()) => {
                    Some(link.side().signed(*magnitude))
                }
                _ => None,
            })
            .collect()
    }
}

fn priority(graph: &AnnotationGraph, a: LinkId, b: LinkId) -> Ordering {
    let key = |link: LinkId| {
        graph
            .endpoints(link)
            .map(|endpoints| (endpoints.left(), Reverse(endpoints.span())))
    };
    key(a).cmp(&key(b)).then_with(|| a.cmp(&b))
}

/// Every slotted link, sorted by priority. Full recomputation always walks this order.
pub fn traversal_order(graph: &AnnotationGraph, hidden: &BTreeSet<SmolStr>) -> Vec<LinkId> {
    let mut order = graph
        .links()
        .iter()
        .filter(|link| !hidden.contains(link.category()) && graph.endpoints(link.id()).is_some())
        .map(Link::id)
        .collect::<Vec<_>>();
    order.sort_by(|a, b| priority(graph, *a, *b));
    order
}

/// Recomputes every slot from scratch.
pub fn assign_slots(graph: &AnnotationGraph, hidden: &BTreeSet<SmolStr>) -> Vec<Option<i32>> {
    let assigner = SlotAssigner::new(graph, hidden);
    let slots = assigner.into_slots();
    tracing::debug!(
        links = graph.links().len(),
        slotted = slots.iter().filter(|slot| slot.is_some()).count(),
        "slots assigned"
    );
    slots
}
