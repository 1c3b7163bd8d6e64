//! Groupings used to narrow a large shape stream down to one series: by
//! effective paint color and by orientation-sensitive outline signature.

use std::f64::consts::PI;
use std::fmt;

use indexmap::IndexMap;

use crate::core::analysis::{AngleMode, AngleSignature, shape_to_angles};
use crate::core::shape::ShapeCommand;

/// Eight buckets per half turn: coarse enough to absorb rasterization noise.
const SIGNATURE_MULTIPLIER: f64 = 45.0 / PI;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ShapeSignature {
    Text,
    Outline(AngleSignature),
}

impl ShapeSignature {
    #[must_use]
    pub fn of(shape: &ShapeCommand) -> Self {
        if shape.is_text() {
            Self::Text
        } else {
            Self::Outline(shape_to_angles(
                shape,
                SIGNATURE_MULTIPLIER,
                AngleMode::RelativeToOrigin,
            ))
        }
    }
}

impl fmt::Display for ShapeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Outline(angles) => {
                for (index, angle) in angles.iter().enumerate() {
                    if index > 0 {
                        f.write_str(".")?;
                    }
                    write!(f, "{angle}")?;
                }
                Ok(())
            }
        }
    }
}

/// Shapes sharing one signature, plus the member best suited as an icon.
#[derive(Debug, Clone)]
pub struct SignatureGroup<'a> {
    pub representative: &'a ShapeCommand,
    pub members: Vec<&'a ShapeCommand>,
}

impl<'a> SignatureGroup<'a> {
    fn new(shape: &'a ShapeCommand) -> Self {
        Self {
            representative: shape,
            members: vec![shape],
        }
    }

    /// Unfilled shapes win over filled ones, then the more square box wins.
    fn offer(&mut self, shape: &'a ShapeCommand) {
        self.members.push(shape);
        let current = self.representative;
        let replace = match (shape.style().filled, current.style().filled) {
            (false, true) => true,
            (true, false) => false,
            _ => squareness_error(shape) < squareness_error(current),
        };
        if replace {
            self.representative = shape;
        }
    }
}

/// Groups by outline signature, in first-seen order.
#[must_use]
pub fn group_by_signature(shapes: &[ShapeCommand]) -> IndexMap<ShapeSignature, SignatureGroup<'_>> {
    let mut groups: IndexMap<ShapeSignature, SignatureGroup<'_>> = IndexMap::new();
    for shape in shapes {
        match groups.entry(ShapeSignature::of(shape)) {
            indexmap::map::Entry::Occupied(mut entry) => entry.get_mut().offer(shape),
            indexmap::map::Entry::Vacant(entry) => {
                entry.insert(SignatureGroup::new(shape));
            }
        }
    }
    groups
}

/// Groups by effective paint color, in first-seen order.
#[must_use]
pub fn group_by_color(shapes: &[ShapeCommand]) -> IndexMap<String, Vec<&ShapeCommand>> {
    let mut groups: IndexMap<String, Vec<&ShapeCommand>> = IndexMap::new();
    for shape in shapes {
        groups
            .entry(shape.style().paint_color().to_owned())
            .or_default()
            .push(shape);
    }
    groups
}

fn squareness_error(shape: &ShapeCommand) -> f64 {
    let bbox = shape.bbox();
    if bbox.height == 0.0 {
        return f64::INFINITY;
    }
    (1.0 - bbox.width / bbox.height).abs()
}
