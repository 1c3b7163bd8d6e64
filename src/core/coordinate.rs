use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::core::axis::Axis;
use crate::error::ExtractResult;

/// Pixel position along one axis. The semantic value is derived from the
/// axis the coordinate is read against: a data point's `x` always belongs to
/// its table's X axis and `y` to its Y axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisCoordinate1D {
    pub pixel: f64,
}

impl AxisCoordinate1D {
    #[must_use]
    pub const fn new(pixel: f64) -> Self {
        Self { pixel }
    }

    #[must_use]
    pub fn value(&self, axis: &Axis) -> String {
        axis.pixel_to_tick(self.pixel)
    }

    /// Moves the coordinate to wherever `label` maps on `axis`.
    pub fn set_value(&mut self, axis: &Axis, label: &str) -> ExtractResult<()> {
        self.pixel = axis.tick_to_pixel(label)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisCoordinate2D {
    pub x: AxisCoordinate1D,
    pub y: AxisCoordinate1D,
}

impl AxisCoordinate2D {
    #[must_use]
    pub const fn new(x_pixel: f64, y_pixel: f64) -> Self {
        Self {
            x: AxisCoordinate1D::new(x_pixel),
            y: AxisCoordinate1D::new(y_pixel),
        }
    }

    #[must_use]
    pub fn from_point(point: DVec2) -> Self {
        Self::new(point.x, point.y)
    }

    #[must_use]
    pub fn values(&self, x_axis: &Axis, y_axis: &Axis) -> (String, String) {
        (self.x.value(x_axis), self.y.value(y_axis))
    }
}

/// Linear interpolation of a point list at `pixel_x`.
///
/// Points need not be sorted. An exact X match is returned as is; positions
/// outside the covered X range yield `None`.
#[must_use]
pub fn interpolate(points: &[AxisCoordinate2D], pixel_x: f64) -> Option<AxisCoordinate2D> {
    let mut prev: Option<&AxisCoordinate2D> = None;
    let mut next: Option<&AxisCoordinate2D> = None;
    for point in points {
        let x = point.x.pixel;
        if x == pixel_x {
            return Some(*point);
        }
        if x < pixel_x && prev.is_none_or(|p| x > p.x.pixel) {
            prev = Some(point);
        }
        if x > pixel_x && next.is_none_or(|n| x < n.x.pixel) {
            next = Some(point);
        }
    }
    let (prev, next) = (prev?, next?);
    let weight = (next.x.pixel - pixel_x) / (next.x.pixel - prev.x.pixel);
    Some(AxisCoordinate2D::new(
        pixel_x,
        prev.y.pixel * weight + next.y.pixel * (1.0 - weight),
    ))
}
