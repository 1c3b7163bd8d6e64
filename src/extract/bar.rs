use crate::core::analysis::split_into_sub_shapes;
use crate::core::{AxisCoordinate2D, DataTable, ElementId, ShapeCommand};
use crate::error::ExtractResult;
use crate::extract::SeriesExtraction;

/// One point per bar at `(horizontal center, top)`.
///
/// A lone selected shape is split first, since plotting tools often draw a
/// whole bar series as one path. The original shapes, not the pieces, are
/// attached to the element.
pub fn extract(
    table: &mut DataTable,
    target: ElementId,
    selected: &[ShapeCommand],
) -> ExtractResult<SeriesExtraction> {
    let bars = match selected {
        [single] => split_into_sub_shapes(single),
        _ => selected.to_vec(),
    };

    let element = table.element_mut(target)?;
    for bar in &bars {
        let rect = bar.bbox();
        element.push_point(AxisCoordinate2D::new(rect.center_x(), rect.y));
    }
    element.attach_shapes(selected.iter().cloned());
    Ok(SeriesExtraction {
        points_written: bars.len(),
        legend_name: None,
    })
}
