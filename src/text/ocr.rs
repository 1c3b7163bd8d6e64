use std::future::{Future, ready};

use crate::core::Rect;
use crate::error::ExtractResult;
use crate::render::RasterImage;

/// One recognized symbol with its box in bitmap pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrSymbol {
    pub text: String,
    pub bbox: Rect,
}

impl OcrSymbol {
    #[must_use]
    pub fn new(text: impl Into<String>, bbox: Rect) -> Self {
        Self {
            text: text.into(),
            bbox,
        }
    }
}

/// External optical character recognition service.
///
/// Implementations may complete asynchronously; the engine never cancels an
/// in-flight request. An empty result is a valid answer, not an error.
pub trait OcrEngine {
    fn recognize(
        &self,
        image: &RasterImage,
        language: &str,
    ) -> impl Future<Output = ExtractResult<Vec<OcrSymbol>>>;
}

impl<O: OcrEngine + ?Sized> OcrEngine for &O {
    fn recognize(
        &self,
        image: &RasterImage,
        language: &str,
    ) -> impl Future<Output = ExtractResult<Vec<OcrSymbol>>> {
        (**self).recognize(image, language)
    }
}

/// Recognizes nothing; used when no OCR service is wired in.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOcr;

impl OcrEngine for NoOcr {
    fn recognize(
        &self,
        _image: &RasterImage,
        _language: &str,
    ) -> impl Future<Output = ExtractResult<Vec<OcrSymbol>>> {
        ready(Ok(Vec::new()))
    }
}
