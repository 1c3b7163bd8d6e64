use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, ExtractResult};
use crate::export::{CsvOptions, CsvPrecision};
use crate::extract::ExtractionTuning;
use crate::text::DEFAULT_OCR_LANGUAGE;

/// Session bootstrap configuration.
///
/// Serializable so host applications can persist the heuristics they tuned.
/// Every field has a default; a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    #[serde(flatten)]
    pub tuning: ExtractionTuning,
    /// Language hint handed to the OCR engine.
    pub ocr_language: String,
    pub csv_precision: CsvPrecision,
    pub csv_delimiter: char,
    /// Max undo steps kept; `None` keeps all of them.
    pub history_limit: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tuning: ExtractionTuning::default(),
            ocr_language: DEFAULT_OCR_LANGUAGE.to_owned(),
            csv_precision: CsvPrecision::Full,
            csv_delimiter: ',',
            history_limit: None,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tuning(mut self, tuning: ExtractionTuning) -> Self {
        self.tuning = tuning;
        self
    }

    #[must_use]
    pub fn with_ocr_language(mut self, language: impl Into<String>) -> Self {
        self.ocr_language = language.into();
        self
    }

    #[must_use]
    pub fn with_csv_precision(mut self, precision: CsvPrecision) -> Self {
        self.csv_precision = precision;
        self
    }

    #[must_use]
    pub fn with_csv_delimiter(mut self, delimiter: char) -> Self {
        self.csv_delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = limit;
        self
    }

    #[must_use]
    pub fn csv_options(&self) -> CsvOptions {
        CsvOptions::default()
            .with_precision(self.csv_precision)
            .with_delimiter(self.csv_delimiter)
    }

    pub fn validate(&self) -> ExtractResult<()> {
        self.tuning.validate()?;
        self.csv_options().validate()?;
        if self.ocr_language.trim().is_empty() {
            return Err(ExtractError::InvalidData(
                "ocr language must not be empty".to_owned(),
            ));
        }
        if self.history_limit == Some(0) {
            return Err(ExtractError::InvalidData(
                "history limit must be > 0 when set".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> ExtractResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ExtractError::InvalidData(format!("failed to serialize session config: {e}"))
        })
    }

    /// Parses and validates a config.
    pub fn from_json_str(input: &str) -> ExtractResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            ExtractError::InvalidData(format!("failed to parse session config json: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }
}
