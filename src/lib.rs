// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Textarc-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Textarc and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Textarc: layout engine for annotated text.
//!
//! Tokens wrap into rows like a paragraph; annotation links (events, relations, dependencies)
//! are drawn as arcs on signed lanes above or below each row. The crate owns every layout
//! decision; rendering and annotation parsing stay with the caller.
//!
//! - [`model`]: the immutable annotation graph (words, clusters, links) in an id-indexed arena.
//! - [`format`]: JSON graph documents handed over by annotation parsers.
//! - [`layout`]: row flow, drag cascades, lane assignment and derived geometry.
//! - [`ops`]: revision-checked batches of UI events with redraw deltas.

pub mod format;
pub mod layout;
pub mod model;
pub mod ops;
