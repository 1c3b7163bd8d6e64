mod null_rasterizer;
mod raster;

pub use null_rasterizer::NullRasterizer;
pub use raster::RasterImage;

use crate::core::{Rect, ShapeCommand};
use crate::error::ExtractResult;

/// Contract implemented by any off-screen rasterization backend.
///
/// `region` is the page-space area to capture: its origin maps to pixel
/// `(0, 0)` of the returned image and one page unit maps to one pixel.
pub trait Rasterizer {
    fn rasterize(&self, shapes: &[ShapeCommand], region: Rect) -> ExtractResult<RasterImage>;
}

impl<R: Rasterizer + ?Sized> Rasterizer for &R {
    fn rasterize(&self, shapes: &[ShapeCommand], region: Rect) -> ExtractResult<RasterImage> {
        (**self).rasterize(shapes, region)
    }
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoRasterizer, PangoFontMetrics};
