use tracing::trace;

use crate::core::analysis::{is_line, is_rectangle, split_shapes_into_sub_shapes};
use crate::core::{AxisCoordinate2D, DataTable, ElementId, ShapeCommand};
use crate::error::ExtractResult;
use crate::extract::{ExtractionTuning, SeriesExtraction};

/// Five-number summary of one box, in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxPlotSummary {
    pub x: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Groups shapes whose horizontal centers lie within `tolerance_px` of a
/// group's first member. Groups keep first-seen order.
#[must_use]
pub fn group_by_center_x(shapes: Vec<ShapeCommand>, tolerance_px: f64) -> Vec<Vec<ShapeCommand>> {
    let mut groups: Vec<Vec<ShapeCommand>> = Vec::new();
    for shape in shapes {
        let center = shape.bbox().center_x();
        let group = groups.iter_mut().find(|group| {
            group
                .first()
                .is_some_and(|first| (first.bbox().center_x() - center).abs() < tolerance_px)
        });
        match group {
            Some(group) => group.push(shape),
            None => groups.push(vec![shape]),
        }
    }
    groups
}

/// Reads one box plot from the shapes of a group.
///
/// Min and max span the union of all vertical extents. A rectangle gives the
/// quartiles, otherwise they fall back to min and max. The median is the
/// first wide horizontal line strictly between the quartiles, otherwise
/// their midpoint.
#[must_use]
pub fn summarize_group(shapes: &[ShapeCommand]) -> Option<BoxPlotSummary> {
    let first = shapes.first()?.bbox();
    let mut min = first.y;
    let mut max = first.bottom();
    let mut quartiles: Option<(f64, f64)> = None;
    let mut medians: Vec<f64> = Vec::new();

    for shape in shapes {
        let rect = shape.bbox();
        if is_line(shape) && rect.width > rect.height {
            medians.push(rect.center_y());
        }
        if is_rectangle(shape) {
            quartiles = Some((rect.y, rect.bottom()));
        }
        min = min.min(rect.y);
        max = max.max(rect.bottom());
    }

    let (q1, q3) = quartiles.unwrap_or((min, max));
    let median = medians
        .into_iter()
        .find(|candidate| *candidate > q1 && *candidate < q3)
        .unwrap_or((q1 + q3) / 2.0);
    Some(BoxPlotSummary {
        x: first.center_x(),
        min,
        q1,
        median,
        q3,
        max,
    })
}

/// Recomputes every box of the series from the new and previously attached
/// shapes, then upserts the median into the series and the other four values
/// into its Q3, Q1, min and max sub-elements (created on first use).
pub fn extract(
    table: &mut DataTable,
    target: ElementId,
    selected: &[ShapeCommand],
    tuning: &ExtractionTuning,
) -> ExtractResult<SeriesExtraction> {
    let series = table.element(target)?;
    let pieces = split_shapes_into_sub_shapes(selected.iter().chain(series.shapes()));
    let groups = group_by_center_x(pieces, tuning.box_plot_group_tolerance_px);

    let [q3_id, q1_id, min_id, max_id] = table.ensure_box_plot_parts(target)?;
    let mut points_written = 0;
    for summary in groups.iter().filter_map(|group| summarize_group(group)) {
        trace!(?summary, "box plot group");
        let writes = [
            (target, summary.median),
            (q3_id, summary.q3),
            (q1_id, summary.q1),
            (min_id, summary.min),
            (max_id, summary.max),
        ];
        for (id, y) in writes {
            table
                .element_mut(id)?
                .upsert_point(AxisCoordinate2D::new(summary.x, y), tuning.upsert_tolerance_px);
        }
        points_written += 1;
    }

    table.element_mut(target)?.attach_shapes(selected.iter().cloned());
    Ok(SeriesExtraction {
        points_written,
        legend_name: None,
    })
}
