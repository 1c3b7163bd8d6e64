use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::coordinate::AxisCoordinate1D;
use crate::core::shape::ShapeCommand;
use crate::error::{ExtractError, ExtractResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisDirection {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Interpolation {
    #[default]
    Linear,
    Categorical,
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Linear => "Linear",
            Self::Categorical => "Categorical",
        })
    }
}

/// One `(pixel, label)` calibration pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub pixel: f64,
    pub label: String,
}

/// Saved tick state, used to roll back a failed extraction before a retry.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSnapshot {
    interpolation: Interpolation,
    ticks: Vec<Tick>,
    shapes: Vec<ShapeCommand>,
}

/// Parses a tick label as a finite number.
#[must_use]
pub fn parse_numeric_label(label: &str) -> Option<f64> {
    let value = label.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

/// Normalizes minus signs that PDF text extraction often produces.
#[must_use]
pub fn clean_tick_label(label: &str) -> String {
    label.replace('\u{2212}', "-").replace("âˆ’", "-")
}

/// Formats a projected value; whole numbers print without a fraction.
#[must_use]
pub fn format_value(value: f64) -> String {
    if value == 0.0 {
        // Avoid "-0".
        return "0".to_owned();
    }
    format!("{value}")
}

/// Linear remap of `value` from `[min_a, max_a]` onto `[min_b, max_b]`.
#[must_use]
pub fn project(value: f64, min_a: f64, max_a: f64, min_b: f64, max_b: f64) -> f64 {
    (value - min_a) / (max_a - min_a) * (max_b - min_b) + min_b
}

/// Pixel/value calibration for one chart direction.
///
/// Ticks stay sorted by pixel. The interpolation mode starts `Linear` and is
/// promoted to `Categorical` the first time a non-numeric label is added;
/// only [`Axis::clear`] resets it.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    name: String,
    direction: AxisDirection,
    interpolation: Interpolation,
    ticks: Vec<Tick>,
    shapes: Vec<ShapeCommand>,
}

impl Axis {
    #[must_use]
    pub fn new(name: impl Into<String>, direction: AxisDirection) -> Self {
        Self {
            name: name.into(),
            direction,
            interpolation: Interpolation::Linear,
            ticks: Vec::new(),
            shapes: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[must_use]
    pub fn direction(&self) -> AxisDirection {
        self.direction
    }

    #[must_use]
    pub fn is_horizontal(&self) -> bool {
        self.direction == AxisDirection::Horizontal
    }

    #[must_use]
    pub fn is_vertical(&self) -> bool {
        self.direction == AxisDirection::Vertical
    }

    #[must_use]
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    #[must_use]
    pub fn interpolation_name(&self) -> String {
        self.interpolation.to_string()
    }

    #[must_use]
    pub fn is_categorical(&self) -> bool {
        self.interpolation == Interpolation::Categorical
    }

    #[must_use]
    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    #[must_use]
    pub fn shapes(&self) -> &[ShapeCommand] {
        &self.shapes
    }

    pub fn attach_shapes(&mut self, shapes: impl IntoIterator<Item = ShapeCommand>) {
        self.shapes.extend(shapes);
    }

    pub fn add_tick_value(&mut self, label: impl Into<String>, pixel: f64) {
        let label = label.into();
        if self.interpolation == Interpolation::Linear && parse_numeric_label(&label).is_none() {
            trace!(label = %label, "non-numeric tick, axis becomes categorical");
            self.interpolation = Interpolation::Categorical;
        }
        let index = self.ticks.partition_point(|tick| tick.pixel <= pixel);
        self.ticks.insert(index, Tick { pixel, label });
    }

    /// Label for a pixel position.
    ///
    /// With no ticks the pixel itself is returned; with one tick its label.
    /// Linear axes project between the lowest and highest pixel ticks, and
    /// categorical axes return the nearest tick's label.
    #[must_use]
    pub fn pixel_to_tick(&self, pixel: f64) -> String {
        match self.ticks.as_slice() {
            [] => format_value(pixel),
            [only] => only.label.clone(),
            [first, .., last] => match self.interpolation {
                Interpolation::Linear => {
                    match (parse_numeric_label(&first.label), parse_numeric_label(&last.label)) {
                        (Some(v0), Some(v1)) if first.pixel != last.pixel => {
                            format_value(project(pixel, first.pixel, last.pixel, v0, v1))
                        }
                        _ => first.label.clone(),
                    }
                }
                Interpolation::Categorical => self
                    .ticks
                    .iter()
                    .fold(first, |best, tick| {
                        if (tick.pixel - pixel).abs() < (best.pixel - pixel).abs() {
                            tick
                        } else {
                            best
                        }
                    })
                    .label
                    .clone(),
            },
        }
    }

    /// Pixel position for a label, the inverse of [`Axis::pixel_to_tick`].
    ///
    /// Categorical axes fall back to the first tick when nothing matches.
    /// Fails when a numeric label is required and `label` is not one.
    pub fn tick_to_pixel(&self, label: &str) -> ExtractResult<f64> {
        match self.ticks.as_slice() {
            [] => parse_numeric_label(label).ok_or_else(|| not_numeric(label)),
            [only] => Ok(only.pixel),
            [first, .., last] => match self.interpolation {
                Interpolation::Linear => {
                    let value = parse_numeric_label(label).ok_or_else(|| not_numeric(label))?;
                    match (parse_numeric_label(&first.label), parse_numeric_label(&last.label)) {
                        (Some(v0), Some(v1)) if v0 != v1 => {
                            Ok(project(value, v0, v1, first.pixel, last.pixel))
                        }
                        _ => Ok(first.pixel),
                    }
                }
                Interpolation::Categorical => Ok(self
                    .ticks
                    .iter()
                    .find(|tick| tick.label == label)
                    .map_or(first.pixel, |tick| tick.pixel)),
            },
        }
    }

    /// Every tick as a coordinate on this axis.
    #[must_use]
    pub fn tick_coordinates(&self) -> Vec<AxisCoordinate1D> {
        self.ticks
            .iter()
            .map(|tick| AxisCoordinate1D::new(tick.pixel))
            .collect()
    }

    /// `count` evenly spaced coordinates from the first to the last tick pixel.
    #[must_use]
    pub fn resampled_ticks(&self, count: usize) -> Vec<AxisCoordinate1D> {
        let (Some(first), Some(last)) = (self.ticks.first(), self.ticks.last()) else {
            return Vec::new();
        };
        if count == 0 {
            return Vec::new();
        }
        let interval = if count == 1 {
            0.0
        } else {
            (last.pixel - first.pixel) / (count - 1) as f64
        };
        (0..count)
            .map(|index| AxisCoordinate1D::new(first.pixel + interval * index as f64))
            .collect()
    }

    /// Drops ticks and shapes and resets the mode to `Linear`.
    pub fn clear(&mut self) {
        self.ticks.clear();
        self.shapes.clear();
        self.interpolation = Interpolation::Linear;
    }

    #[must_use]
    pub fn snapshot(&self) -> AxisSnapshot {
        AxisSnapshot {
            interpolation: self.interpolation,
            ticks: self.ticks.clone(),
            shapes: self.shapes.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: AxisSnapshot) {
        self.interpolation = snapshot.interpolation;
        self.ticks = snapshot.ticks;
        self.shapes = snapshot.shapes;
    }
}

fn not_numeric(label: &str) -> ExtractError {
    ExtractError::InvalidData(format!("tick label `{label}` is not numeric"))
}
