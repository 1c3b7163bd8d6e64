use tracing::trace;

use crate::core::{ChartElement, DataTable, ElementId, ShapeCommand, ShapeId};
use crate::error::ExtractResult;
use crate::extract::ExtractionTuning;
use crate::text::texts_from_text_shapes;

/// Infers a series name from a legend entry.
///
/// Candidates are non-text shapes that are not already part of the series and
/// are stroked with its main color; smaller candidates replace larger ones.
/// The name is read from text runs to the right of the swatch that are
/// vertically centered on it. Words further than `gap_factor` of their own
/// glyph widths from the last accepted word are skipped.
#[must_use]
pub fn detect_legend_name(
    element: &ChartElement,
    main_color: &str,
    all_shapes: &[ShapeCommand],
    gap_factor: f64,
) -> Option<String> {
    let text_shapes: Vec<&ShapeCommand> = all_shapes.iter().filter(|s| s.is_text()).collect();

    let mut chosen: Option<(ShapeId, f64)> = None;
    let mut words: Vec<String> = Vec::new();
    for swatch in all_shapes {
        if swatch.is_text()
            || element.has_shape(swatch.id())
            || swatch.style().stroke_color != main_color
        {
            continue;
        }
        let rect = swatch.bbox();
        if chosen.is_some_and(|(_, area)| rect.area() > area) {
            continue;
        }

        let beside = text_shapes.iter().copied().filter(|text| {
            let text_rect = text.bbox();
            text_rect.x > rect.right() && (rect.center_y() - text_rect.center_y()).abs() < text_rect.height
        });
        let Some(lines) = texts_from_text_shapes(beside) else {
            continue;
        };

        for line in &lines {
            let mut start_x = rect.right();
            for word in line {
                let glyph_width = word.rect.width / word.text.chars().count().max(1) as f64;
                if word.rect.x - start_x >= glyph_width * gap_factor {
                    continue;
                }
                if chosen.is_none_or(|(id, _)| id != swatch.id()) {
                    chosen = Some((swatch.id(), rect.area()));
                    words.clear();
                }
                words.push(word.text.clone());
                start_x = word.rect.right();
            }
        }
    }

    if words.is_empty() {
        return None;
    }
    trace!(swatch = ?chosen.map(|(id, _)| id), "legend entry matched");
    Some(words.join(" "))
}

/// Renames `target` from its legend entry, if one is found.
pub(crate) fn apply_legend(
    table: &mut DataTable,
    target: ElementId,
    all_shapes: &[ShapeCommand],
    tuning: &ExtractionTuning,
) -> ExtractResult<Option<String>> {
    let Some(color) = table.main_color(target)? else {
        return Ok(None);
    };
    let name = detect_legend_name(table.element(target)?, &color, all_shapes, tuning.legend_gap_factor);
    if let Some(name) = &name {
        table.element_mut(target)?.set_name(name.clone());
    }
    Ok(name)
}
