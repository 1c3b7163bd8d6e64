use crate::core::{Rect, ShapeCommand};
use crate::error::ExtractResult;
use crate::render::{RasterImage, Rasterizer};

/// Headless rasterizer producing a white image of the right size.
///
/// It still validates the region so tests catch degenerate OCR requests
/// without a real backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRasterizer;

impl Rasterizer for NullRasterizer {
    fn rasterize(&self, _shapes: &[ShapeCommand], region: Rect) -> ExtractResult<RasterImage> {
        let (width, height) = RasterImage::size_for(&region)?;
        RasterImage::blank(width, height, u8::MAX)
    }
}
