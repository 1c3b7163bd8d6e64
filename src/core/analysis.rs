//! Pure geometric heuristics over captured shapes.
//!
//! Nothing here touches a data table or a rendering backend, so every
//! classification can be tested on hand-built paths.

use std::f64::consts::PI;

use glam::DVec2;
use smallvec::SmallVec;

use crate::core::shape::{PathOp, ShapeCommand};

/// Quantized angles of one shape, stored inline for typical polygons.
pub type AngleSignature = SmallVec<[i64; 8]>;

/// Multiplier converting radians to degrees.
pub const DEGREES: f64 = 180.0 / PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleMode {
    /// Signed turn between consecutive segments; straight and U-turns are dropped.
    Turn,
    /// Absolute direction of each segment, so orientation matters.
    RelativeToOrigin,
}

/// Splits a path at every `MoveTo` that follows a non-trivial sub-path.
/// Text runs and single sub-paths come back as one element.
#[must_use]
pub fn split_into_sub_shapes(shape: &ShapeCommand) -> Vec<ShapeCommand> {
    let Some(ops) = shape.path_ops() else {
        return vec![shape.clone()];
    };

    let mut sub_shapes = Vec::new();
    let mut current: Vec<PathOp> = Vec::new();
    for op in ops {
        if matches!(op, PathOp::MoveTo(_)) && current.len() > 1 {
            sub_shapes.push(shape.sub_shape(std::mem::take(&mut current)));
        }
        current.push(*op);
    }
    if !current.is_empty() {
        sub_shapes.push(shape.sub_shape(current));
    }
    sub_shapes
}

/// Splits every shape, keeping input order.
#[must_use]
pub fn split_shapes_into_sub_shapes<'a>(
    shapes: impl IntoIterator<Item = &'a ShapeCommand>,
) -> Vec<ShapeCommand> {
    let shapes: Vec<&ShapeCommand> = shapes.into_iter().collect();

    #[cfg(feature = "parallel-split")]
    {
        use rayon::prelude::*;
        shapes
            .par_iter()
            .map(|shape| split_into_sub_shapes(shape))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    }

    #[cfg(not(feature = "parallel-split"))]
    {
        shapes.into_iter().flat_map(split_into_sub_shapes).collect()
    }
}

/// Angle signature over the untransformed path vertices. `Begin` is skipped
/// and `Close` revisits the first vertex. Angles are `round(radians * multiplier)`.
#[must_use]
pub fn shape_to_angles(shape: &ShapeCommand, multiplier: f64, mode: AngleMode) -> AngleSignature {
    let mut angles = AngleSignature::new();
    let Some(ops) = shape.path_ops() else {
        return angles;
    };
    if ops.len() <= 2 {
        return angles;
    }

    let mut history: SmallVec<[DVec2; 16]> = SmallVec::new();
    for op in ops {
        let point = match op {
            PathOp::Begin => continue,
            PathOp::Close => match history.first() {
                Some(first) => *first,
                None => continue,
            },
            PathOp::MoveTo(p) | PathOp::LineTo(p) => *p,
            PathOp::CurveTo { end, .. } => *end,
        };
        history.push(point);

        match mode {
            AngleMode::RelativeToOrigin => {
                if let [.., p1, p2] = history.as_slice() {
                    let radians = (p1.y - p2.y).atan2(p1.x - p2.x);
                    angles.push((radians * multiplier).round() as i64);
                }
            }
            AngleMode::Turn => {
                if let [.., p1, p2, p3] = history.as_slice() {
                    if let Some(radians) = turn_angle(*p1, *p2, *p3) {
                        angles.push((radians * multiplier).round() as i64);
                    }
                }
            }
        }
    }
    angles
}

/// Turn angles in whole degrees.
#[must_use]
pub fn turn_angles(shape: &ShapeCommand) -> AngleSignature {
    shape_to_angles(shape, DEGREES, AngleMode::Turn)
}

/// A path without any turn.
#[must_use]
pub fn is_line(shape: &ShapeCommand) -> bool {
    !shape.is_text() && turn_angles(shape).is_empty()
}

/// Exactly three right-angle turns; the fourth, closing turn is implicit.
#[must_use]
pub fn is_rectangle(shape: &ShapeCommand) -> bool {
    let angles = turn_angles(shape);
    angles.len() == 3 && angles.iter().all(|angle| angle.abs() == 90)
}

/// Transformed `MoveTo`/`LineTo` vertices of every path, in drawing order.
#[must_use]
pub fn shapes_to_points<'a>(shapes: impl IntoIterator<Item = &'a ShapeCommand>) -> Vec<DVec2> {
    shapes
        .into_iter()
        .filter_map(|shape| shape.path_ops().map(|ops| (shape.transform(), ops)))
        .flat_map(|(transform, ops)| {
            ops.iter().filter_map(move |op| match op {
                PathOp::MoveTo(p) | PathOp::LineTo(p) => Some(transform.apply(*p)),
                _ => None,
            })
        })
        .collect()
}

fn turn_angle(p1: DVec2, p2: DVec2, p3: DVec2) -> Option<f64> {
    let a = p2 - p1;
    let b = p3 - p2;
    let radians = a.perp_dot(b).atan2(a.dot(b));
    let degrees = radians.abs() * DEGREES;
    (degrees != 0.0 && degrees != 180.0).then_some(radians)
}
