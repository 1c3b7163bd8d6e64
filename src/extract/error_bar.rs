use ordered_float::OrderedFloat;
use tracing::trace;

use crate::core::{AxisCoordinate2D, DataTable, ElementId, ErrorBound, ShapeCommand};
use crate::error::{ExtractError, ExtractResult};
use crate::extract::{ExtractionTuning, SeriesExtraction};

/// Widens the error bar at the series point nearest to each shape.
///
/// A shape matches the series point with the closest X when its horizontal
/// center is within the match tolerance. Upper bounds keep the smallest pixel
/// Y seen so far and lower bounds the largest, so repeated selections only
/// ever extend a whisker. Stored points take the series point's X.
pub fn extract(
    table: &mut DataTable,
    target: ElementId,
    selected: &[ShapeCommand],
    tuning: &ExtractionTuning,
) -> ExtractResult<SeriesExtraction> {
    let error_bar = table.element(target)?;
    let kind = error_bar.kind();
    let (Some(owner), Some(bound)) = (error_bar.owner(), error_bar.error_bound()) else {
        return Err(ExtractError::Unsupported { kind });
    };
    let series_x: Vec<f64> = table
        .element(owner)?
        .data()
        .iter()
        .map(|point| point.x.pixel)
        .collect();

    let data = table.data_mut(target)?;
    let mut points_written = 0;
    for shape in selected {
        let rect = shape.bbox();
        let center = rect.center_x();
        let nearest = series_x
            .iter()
            .enumerate()
            .map(|(index, x)| (index, (center - x).abs()))
            .min_by_key(|(_, distance)| OrderedFloat(*distance));
        let Some((index, distance)) = nearest else {
            continue;
        };
        if distance >= tuning.error_bar_match_tolerance_px {
            trace!(shape = %shape.id(), distance, "error bar shape too far from series");
            continue;
        }
        let Some(point) = data.get_mut(index) else {
            continue;
        };
        let y = match bound {
            ErrorBound::Upper => rect.y.min(point.y.pixel),
            ErrorBound::Lower => rect.bottom().max(point.y.pixel),
        };
        *point = AxisCoordinate2D::new(series_x[index], y);
        points_written += 1;
    }

    table.element_mut(target)?.attach_shapes(selected.iter().cloned());
    Ok(SeriesExtraction {
        points_written,
        legend_name: None,
    })
}
