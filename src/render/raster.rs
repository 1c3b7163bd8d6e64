use crate::core::Rect;
use crate::error::{ExtractError, ExtractResult};

/// 8-bit grayscale bitmap handed to the OCR collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// Uniform image; `fill` is the gray level of every pixel.
    pub fn blank(width: u32, height: u32, fill: u8) -> ExtractResult<Self> {
        let len = pixel_count(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![fill; len],
        })
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> ExtractResult<Self> {
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(ExtractError::Raster(format!(
                "expected {expected} pixels for {width}x{height}, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Pixel size needed to cover `region` at one pixel per page unit.
    pub fn size_for(region: &Rect) -> ExtractResult<(u32, u32)> {
        region.validate()?;
        let width = region.width.ceil().max(1.0);
        let height = region.height.ceil().max(1.0);
        if width > f64::from(u32::MAX) || height > f64::from(u32::MAX) {
            return Err(ExtractError::Raster(format!(
                "region {width}x{height} is too large to rasterize"
            )));
        }
        Ok((width as u32, height as u32))
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major gray levels, `width * height` bytes.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}

fn pixel_count(width: u32, height: u32) -> ExtractResult<usize> {
    if width == 0 || height == 0 {
        return Err(ExtractError::Raster(format!(
            "raster size must be > 0, got {width}x{height}"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| ExtractError::Raster(format!("raster {width}x{height} overflows")))
}
