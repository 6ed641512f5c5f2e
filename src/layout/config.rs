// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Textarc-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Textarc and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;

use serde::{Deserialize, Serialize};

/// Pixel constants driving word flow, lane spacing and row stacking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Gap between a row's left/right edge and its first/last word.
    pub edge_padding: f64,
    /// Gap inserted before an ordinary word.
    pub word_padding: f64,
    /// Gap inserted before a punctuation word.
    pub punct_padding: f64,
    /// Vertical distance between neighbouring link lanes.
    pub slot_interval: f64,
    /// Minimum vertical gap between consecutive rows.
    pub row_gap: f64,
    /// Space below the text line (descenders, bottom arc attachment).
    pub row_descent: f64,
    /// Text height assumed for a row that holds no words.
    pub min_text_height: f64,
    /// Gap between a word and the tag label stacked above it.
    pub tag_gap: f64,
    /// Padding added below the last row to size the canvas.
    pub canvas_padding: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            edge_padding: 10.0,
            word_padding: 5.0,
            punct_padding: 1.0,
            slot_interval: 15.0,
            row_gap: 10.0,
            row_descent: 4.0,
            min_text_height: 16.0,
            tag_gap: 2.0,
            canvas_padding: 20.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid layout config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid {name}={value:?}")]
    InvalidEnv { name: String, value: String },
    #[error("{field} must be {expected} (got {value})")]
    OutOfRange { field: &'static str, expected: &'static str, value: f64 },
}

const ENV_OVERRIDES: [&str; 5] = [
    "TEXTARC_EDGE_PADDING",
    "TEXTARC_WORD_PADDING",
    "TEXTARC_PUNCT_PADDING",
    "TEXTARC_SLOT_INTERVAL",
    "TEXTARC_ROW_GAP",
];

impl LayoutConfig {
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with `TEXTARC_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|name| match env::var(name) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidEnv {
                name: name.to_owned(),
                value: "<non-unicode>".to_owned(),
            }),
        })
    }

    /// Applies overrides from `lookup`; blank values are ignored.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Result<Option<String>, ConfigError>,
    ) -> Result<Self, ConfigError> {
        for name in ENV_OVERRIDES {
            let Some(raw) = lookup(name)? else {
                continue;
            };
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            let value = trimmed
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite() && *value >= 0.0)
                .ok_or_else(|| ConfigError::InvalidEnv {
                    name: name.to_owned(),
                    value: trimmed.to_owned(),
                })?;
            match name {
                "TEXTARC_EDGE_PADDING" => self.edge_padding = value,
                "TEXTARC_WORD_PADDING" => self.word_padding = value,
                "TEXTARC_PUNCT_PADDING" => self.punct_padding = value,
                "TEXTARC_SLOT_INTERVAL" => self.slot_interval = value,
                _ => self.row_gap = value,
            }
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("edgePadding", self.edge_padding),
            ("wordPadding", self.word_padding),
            ("punctPadding", self.punct_padding),
            ("rowGap", self.row_gap),
            ("rowDescent", self.row_descent),
            ("minTextHeight", self.min_text_height),
            ("tagGap", self.tag_gap),
            ("canvasPadding", self.canvas_padding),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::OutOfRange { field, expected: "a finite value >= 0", value });
            }
        }
        if !(self.slot_interval.is_finite() && self.slot_interval > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "slotInterval",
                expected: "a finite value > 0",
                value: self.slot_interval,
            });
        }
        Ok(())
    }
}
