use glam::{DAffine2, DVec2, dvec2};
use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, ExtractResult};

/// Axis-aligned rectangle in page pixel space (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanned by two opposite corners, in any order.
    #[must_use]
    pub fn from_corners(a: DVec2, b: DVec2) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    /// Smallest rectangle enclosing every point, `None` for an empty input.
    #[must_use]
    pub fn enclosing(points: impl IntoIterator<Item = DVec2>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self::from_corners(min, max))
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    #[must_use]
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    #[must_use]
    pub fn center(&self) -> DVec2 {
        dvec2(self.center_x(), self.center_y())
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    #[must_use]
    pub fn corners(&self) -> [DVec2; 4] {
        [
            dvec2(self.x, self.y),
            dvec2(self.right(), self.y),
            dvec2(self.right(), self.bottom()),
            dvec2(self.x, self.bottom()),
        ]
    }

    /// Smallest rectangle covering both operands.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }

    /// Overlap of both operands. Disjoint inputs collapse to a zero-sized
    /// rectangle instead of a negative one.
    #[must_use]
    pub fn intersect(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Rect::new(x, y, (right - x).max(0.0), (bottom - y).max(0.0))
    }

    /// `true` when `inner` lies strictly inside `self`; shared edges do not count.
    #[must_use]
    pub fn strictly_contains(&self, inner: &Rect) -> bool {
        self.x < inner.x
            && self.y < inner.y
            && self.right() > inner.right()
            && self.bottom() > inner.bottom()
    }

    /// Vertical overlap length, zero when the spans only touch or are disjoint.
    #[must_use]
    pub fn vertical_overlap(&self, other: &Rect) -> f64 {
        (self.bottom().min(other.bottom()) - self.y.max(other.y)).max(0.0)
    }

    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    pub fn validate(&self) -> ExtractResult<()> {
        if !self.is_finite() || self.width < 0.0 || self.height < 0.0 {
            return Err(ExtractError::InvalidData(format!(
                "rectangle must be finite with non-negative size: {self:?}"
            )));
        }
        Ok(())
    }
}

/// 2D affine transform using the canvas matrix layout `[a, b, c, d, e, f]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform(DAffine2);

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self(DAffine2::IDENTITY);

    /// Builds `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
    #[must_use]
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self(DAffine2::from_cols_array(&[a, b, c, d, e, f]))
    }

    #[must_use]
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self(DAffine2::from_translation(dvec2(tx, ty)))
    }

    #[must_use]
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self(DAffine2::from_scale(dvec2(sx, sy)))
    }

    #[must_use]
    pub fn rotation(radians: f64) -> Self {
        Self(DAffine2::from_angle(radians))
    }

    /// Canvas-style `ctx.transform(other)`: `other` applies first.
    #[must_use]
    pub fn then_local(self, other: Transform) -> Transform {
        Transform(self.0 * other.0)
    }

    /// Same linear part with the translation shifted by `(dx, dy)`.
    #[must_use]
    pub fn translated(self, dx: f64, dy: f64) -> Transform {
        let mut inner = self.0;
        inner.translation += dvec2(dx, dy);
        Transform(inner)
    }

    #[must_use]
    pub fn coefficients(&self) -> [f64; 6] {
        self.0.to_cols_array()
    }

    #[must_use]
    pub fn apply(&self, point: DVec2) -> DVec2 {
        self.0.transform_point2(point)
    }

    /// Rotation of the image of the unit X vector, in radians.
    #[must_use]
    pub fn rotation_angle(&self) -> f64 {
        let axis = self.0.transform_vector2(DVec2::X);
        axis.y.atan2(axis.x)
    }

    /// Axis-aligned bounds of all four transformed corners.
    #[must_use]
    pub fn map_rect(&self, rect: &Rect) -> Rect {
        let corners = rect.corners().map(|corner| self.apply(corner));
        Rect::enclosing(corners).unwrap_or(*rect)
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn rotated_rect_uses_all_four_corners() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let mapped = Transform::rotation(FRAC_PI_4).map_rect(&rect);
        let diagonal = 10.0 * 2f64.sqrt();
        assert!((mapped.width - diagonal).abs() <= 1e-9);
        assert!((mapped.height - diagonal).abs() <= 1e-9);
        assert!((mapped.x + diagonal / 2.0).abs() <= 1e-9);
    }

    #[test]
    fn disjoint_intersection_is_empty() {
        let a = Rect::new(0.0, 0.0, 5.0, 5.0);
        let b = Rect::new(10.0, 10.0, 5.0, 5.0);
        let overlap = a.intersect(&b);
        assert_eq!(overlap.area(), 0.0);
    }

    #[test]
    fn canvas_composition_applies_local_first() {
        let composed = Transform::translation(100.0, 0.0).then_local(Transform::scale(2.0, 2.0));
        let point = composed.apply(dvec2(1.0, 1.0));
        assert_eq!(point, dvec2(102.0, 2.0));
    }
}
