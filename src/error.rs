use thiserror::Error;

use crate::core::{ElementId, ElementKind};

pub type ExtractResult<T> = Result<T, ExtractError>;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// Non-fatal: the selection held nothing the extractor could read.
    #[error("nothing extracted: {reason}")]
    NothingExtracted { reason: String },
    #[error("no extractor available for element kind `{kind}`")]
    Unsupported { kind: ElementKind },
    #[error("element {0} is not part of the data table")]
    UnknownElement(ElementId),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("ocr failed: {0}")]
    Ocr(String),
    #[error("rasterization failed: {0}")]
    Raster(String),
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("nothing to redo")]
    NothingToRedo,
}

impl ExtractError {
    #[must_use]
    pub fn nothing_extracted(reason: impl Into<String>) -> Self {
        Self::NothingExtracted {
            reason: reason.into(),
        }
    }

    /// Whether the caller can treat this as "no change" rather than a failure.
    #[must_use]
    pub fn is_non_fatal(&self) -> bool {
        matches!(self, Self::NothingExtracted { .. })
    }
}
