// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Textarc-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Textarc and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::Serialize;
use smallvec::SmallVec;
use smol_str::SmolStr;

use super::ids::{ClusterId, EventId, LinkId, WordId};

/// What a link endpoint attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Anchor {
    Word(WordId),
    Cluster(ClusterId),
    Link(LinkId),
}

/// Which side of the row baseline a link is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Top,
    Bottom,
}

impl Side {
    pub fn from_top(top: bool) -> Self {
        if top {
            Self::Top
        } else {
            Self::Bottom
        }
    }

    pub fn is_top(self) -> bool {
        matches!(self, Self::Top)
    }

    /// Applies this side's sign to a lane magnitude.
    pub fn signed(self, magnitude: u32) -> i32 {
        let magnitude = i32::try_from(magnitude).unwrap_or(i32::MAX);
        match self {
            Self::Top => magnitude,
            Self::Bottom => -magnitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    anchor: Anchor,
    arg_type: SmolStr,
}

impl Argument {
    pub fn new(anchor: Anchor, arg_type: impl Into<SmolStr>) -> Self {
        Self { anchor, arg_type: arg_type.into() }
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn arg_type(&self) -> &str {
        &self.arg_type
    }
}

/// An annotation edge (event, relation or dependency) drawn as an arc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    id: LinkId,
    event_id: EventId,
    trigger: Option<Anchor>,
    arguments: SmallVec<[Argument; 2]>,
    rel_type: Option<SmolStr>,
    side: Side,
    category: SmolStr,
}

impl Link {
    pub(crate) fn new(
        id: LinkId,
        event_id: EventId,
        trigger: Option<Anchor>,
        arguments: SmallVec<[Argument; 2]>,
        rel_type: Option<SmolStr>,
        side: Side,
        category: SmolStr,
    ) -> Self {
        Self { id, event_id, trigger, arguments, rel_type, side, category }
    }

    pub fn id(&self) -> LinkId {
        self.id
    }

    pub fn event_id(&self) -> &EventId {
        &self.event_id
    }

    pub fn trigger(&self) -> Option<Anchor> {
        self.trigger
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn rel_type(&self) -> Option<&str> {
        self.rel_type.as_deref()
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn is_top(&self) -> bool {
        self.side.is_top()
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Trigger first (when present), then arguments in order.
    pub fn anchors(&self) -> impl Iterator<Item = Anchor> + '_ {
        self.trigger.into_iter().chain(self.arguments.iter().map(Argument::anchor))
    }
}
