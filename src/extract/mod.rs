//! Per-chart-type heuristics turning selected shapes into table data.
//!
//! Every extractor appends the selected shapes to its target and does not
//! deduplicate: selecting the same shapes twice adds their points twice.

pub mod axis;
pub mod bar;
pub mod box_plot;
pub mod error_bar;
pub mod legend;
pub mod line;
pub mod scatter;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{DataTable, ElementId, ElementKind, ShapeCommand};
use crate::error::{ExtractError, ExtractResult};

pub use axis::{AxisExtraction, apply_axis_text, accurate_tick_position};
pub use box_plot::{BoxPlotSummary, group_by_center_x, summarize_group};
pub use legend::detect_legend_name;

/// Pixel tolerances and factors used by the heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionTuning {
    /// Max horizontal center distance for shapes of one box plot.
    pub box_plot_group_tolerance_px: f64,
    /// Max X distance for a box-plot point to replace an existing one.
    pub upsert_tolerance_px: f64,
    /// Max X distance between an error bar shape and its series point.
    pub error_bar_match_tolerance_px: f64,
    /// Tick marks are searched up to this many label widths away.
    pub tick_search_extent_factor: f64,
    /// Legend words must follow each other within this many glyph widths.
    pub legend_gap_factor: f64,
}

impl Default for ExtractionTuning {
    fn default() -> Self {
        Self {
            box_plot_group_tolerance_px: 1.0,
            upsert_tolerance_px: 0.1,
            error_bar_match_tolerance_px: 1.0,
            tick_search_extent_factor: 4.0,
            legend_gap_factor: 2.0,
        }
    }
}

impl ExtractionTuning {
    pub fn validate(&self) -> ExtractResult<()> {
        for (name, value) in [
            ("box_plot_group_tolerance_px", self.box_plot_group_tolerance_px),
            ("upsert_tolerance_px", self.upsert_tolerance_px),
            ("error_bar_match_tolerance_px", self.error_bar_match_tolerance_px),
            ("tick_search_extent_factor", self.tick_search_extent_factor),
            ("legend_gap_factor", self.legend_gap_factor),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ExtractError::InvalidData(format!(
                    "tuning `{name}` must be finite and > 0"
                )));
            }
        }
        Ok(())
    }
}

/// Outcome of one series extraction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesExtraction {
    pub points_written: usize,
    /// Name inferred from a legend entry, already applied to the element.
    pub legend_name: Option<String>,
}

/// Runs the extractor matching `target`'s kind.
///
/// Kinds without an extractor (axes, box-plot parts) fail with
/// `Unsupported` before anything is mutated. Axes go through
/// [`apply_axis_text`] since they need text resolution first.
pub fn extract_series(
    table: &mut DataTable,
    target: ElementId,
    selected: &[ShapeCommand],
    all_shapes: &[ShapeCommand],
    tuning: &ExtractionTuning,
) -> ExtractResult<SeriesExtraction> {
    let kind = table.element(target)?.kind();
    let mut outcome = match kind {
        ElementKind::Line => line::extract(table, target, selected)?,
        ElementKind::Bar => bar::extract(table, target, selected)?,
        ElementKind::Scatter => scatter::extract(table, target, selected)?,
        ElementKind::BoxPlot => box_plot::extract(table, target, selected, tuning)?,
        ElementKind::ErrorBar => error_bar::extract(table, target, selected, tuning)?,
        ElementKind::Axis
        | ElementKind::BoxPlotQ1
        | ElementKind::BoxPlotQ3
        | ElementKind::BoxPlotMin
        | ElementKind::BoxPlotMax => return Err(ExtractError::Unsupported { kind }),
    };

    let names_from_legend = matches!(kind, ElementKind::Line | ElementKind::Bar | ElementKind::Scatter);
    if names_from_legend && !all_shapes.is_empty() {
        outcome.legend_name = legend::apply_legend(table, target, all_shapes, tuning)?;
    }
    debug!(
        %target,
        %kind,
        selected = selected.len(),
        points_written = outcome.points_written,
        legend = outcome.legend_name.as_deref().unwrap_or(""),
        "series extraction finished"
    );
    Ok(outcome)
}
