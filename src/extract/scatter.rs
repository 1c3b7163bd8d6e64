use crate::core::{AxisCoordinate2D, DataTable, ElementId, ShapeCommand};
use crate::error::ExtractResult;
use crate::extract::SeriesExtraction;

/// One point per marker, at the center of its box.
pub fn extract(
    table: &mut DataTable,
    target: ElementId,
    selected: &[ShapeCommand],
) -> ExtractResult<SeriesExtraction> {
    let element = table.element_mut(target)?;
    for shape in selected {
        element.push_point(AxisCoordinate2D::from_point(shape.bbox().center()));
    }
    element.attach_shapes(selected.iter().cloned());
    Ok(SeriesExtraction {
        points_written: selected.len(),
        legend_name: None,
    })
}
