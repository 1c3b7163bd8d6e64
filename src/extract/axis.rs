use ordered_float::OrderedFloat;
use tracing::{debug, warn};

use crate::core::analysis::split_into_sub_shapes;
use crate::core::axis::{clean_tick_label, parse_numeric_label};
use crate::core::{Axis, AxisDirection, ShapeCommand, Tick};
use crate::extract::ExtractionTuning;
use crate::text::TextChunk;

/// Path shapes with at most this many ops are treated as tick marks.
const MAX_TICK_MARK_OPS: usize = 3;

/// Outcome of one axis extraction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisExtraction {
    pub ticks_added: Vec<Tick>,
    /// Non-numeric labels dropped because numeric labels were the majority.
    pub discarded_labels: Vec<String>,
}

impl AxisExtraction {
    /// User-facing warning about discarded labels, if any.
    #[must_use]
    pub fn warning(&self) -> Option<String> {
        if self.discarded_labels.is_empty() {
            return None;
        }
        Some(format!(
            "Tick(s) '{}' could not be parsed as numbers and were excluded from the selection.",
            self.discarded_labels.join(", ")
        ))
    }
}

/// Pixel position of a tick label along `direction`.
///
/// Prefers the nearest short mark (tick or gridline) that starts right after
/// the label, below it for horizontal axes and to its right for vertical
/// ones, within `extent_factor` label widths and whose midpoint falls inside
/// the label's span. Falls back to the label's midpoint.
#[must_use]
pub fn accurate_tick_position(
    direction: AxisDirection,
    label: &TextChunk,
    shapes: &[ShapeCommand],
    extent_factor: f64,
) -> f64 {
    let label_rect = label.rect;
    let max_distance = label_rect.width * extent_factor;

    shapes
        .iter()
        .flat_map(split_into_sub_shapes)
        .filter(|shape| shape.path_ops().is_some_and(|ops| ops.len() <= MAX_TICK_MARK_OPS))
        .filter_map(|shape| {
            let rect = shape.bbox();
            let (distance, midpoint, span) = match direction {
                AxisDirection::Horizontal => (
                    label_rect.y - rect.bottom(),
                    rect.center_x(),
                    (label_rect.x, label_rect.right()),
                ),
                AxisDirection::Vertical => (
                    rect.x - label_rect.right(),
                    rect.center_y(),
                    (label_rect.y, label_rect.bottom()),
                ),
            };
            let in_reach = (0.0..=max_distance).contains(&distance);
            let in_span = midpoint > span.0 && midpoint < span.1;
            (in_reach && in_span).then_some((distance, midpoint))
        })
        .min_by_key(|(distance, _)| OrderedFloat(*distance))
        .map_or_else(
            || match direction {
                AxisDirection::Horizontal => label_rect.center_x(),
                AxisDirection::Vertical => label_rect.center_y(),
            },
            |(_, midpoint)| midpoint,
        )
}

/// Registers tick labels read from `lines` on `axis` and attaches `selected`.
///
/// Empty labels are skipped. When numeric labels are a strict majority and
/// some labels are not numeric, the latter are treated as noise: they are
/// dropped and reported in [`AxisExtraction::discarded_labels`].
pub fn apply_axis_text(
    axis: &mut Axis,
    lines: &[Vec<TextChunk>],
    selected: &[ShapeCommand],
    all_shapes: &[ShapeCommand],
    tuning: &ExtractionTuning,
) -> AxisExtraction {
    let direction = axis.direction();
    let mut numeric: Vec<Tick> = Vec::new();
    let mut textual: Vec<Tick> = Vec::new();
    for word in lines.iter().flatten() {
        let label = clean_tick_label(&word.text);
        if label.trim().is_empty() {
            continue;
        }
        let pixel =
            accurate_tick_position(direction, word, all_shapes, tuning.tick_search_extent_factor);
        let tick = Tick { pixel, label };
        if parse_numeric_label(&tick.label).is_some() {
            numeric.push(tick);
        } else {
            textual.push(tick);
        }
    }

    let total = numeric.len() + textual.len();
    let numeric_majority = !textual.is_empty() && numeric.len() as f64 / total as f64 > 0.5;
    let mut outcome = AxisExtraction::default();
    if numeric_majority {
        outcome.discarded_labels = textual.into_iter().map(|tick| tick.label).collect();
        warn!(
            discarded = %outcome.discarded_labels.join(", "),
            "non-numeric tick labels excluded"
        );
        outcome.ticks_added = numeric;
    } else {
        outcome.ticks_added = numeric;
        outcome.ticks_added.extend(textual);
    }

    for tick in &outcome.ticks_added {
        axis.add_tick_value(tick.label.clone(), tick.pixel);
    }
    axis.attach_shapes(selected.iter().cloned());
    debug!(
        axis = axis.name(),
        ticks_added = outcome.ticks_added.len(),
        interpolation = %axis.interpolation(),
        "axis extraction finished"
    );
    outcome
}
