// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Textarc-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Textarc and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Words, clusters and links live in one id-indexed arena (`AnnotationGraph`); anchors are
//! tagged ids rather than object pointers, and reverse lookups are derived indices.

pub mod graph;
pub mod ids;
pub mod link;
pub mod word;

pub use graph::{
    AnchorRef, AnnotationGraph, AnnotationGraphBuilder, Endpoints, GraphError, LinkSpec,
    DEFAULT_CATEGORY,
};
pub use ids::{ClusterId, EventId, Id, IdError, Idx, LinkId, WordId};
pub use link::{Anchor, Argument, Link, Side};
pub use word::{Word, WordCluster};
