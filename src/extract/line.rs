use crate::core::analysis::shapes_to_points;
use crate::core::{AxisCoordinate2D, DataTable, ElementId, ShapeCommand};
use crate::error::ExtractResult;
use crate::extract::SeriesExtraction;

/// One point per `MoveTo`/`LineTo` vertex, in drawing order.
pub fn extract(
    table: &mut DataTable,
    target: ElementId,
    selected: &[ShapeCommand],
) -> ExtractResult<SeriesExtraction> {
    let points: Vec<AxisCoordinate2D> = shapes_to_points(selected)
        .into_iter()
        .map(AxisCoordinate2D::from_point)
        .collect();
    let points_written = points.len();

    let element = table.element_mut(target)?;
    element.attach_shapes(selected.iter().cloned());
    element.data_mut().extend(points);
    Ok(SeriesExtraction {
        points_written,
        legend_name: None,
    })
}
