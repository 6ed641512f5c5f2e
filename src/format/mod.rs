// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Textarc-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Textarc and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Graph document ingestion.
//!
//! Annotation-format parsers live outside this crate; they hand over a `{words, links}` graph as
//! a JSON document, which this module validates and turns into an `AnnotationGraph`.

pub mod json;

pub use json::{graph_to_json, parse_graph_json, FormatError};
