use tracing::{debug, info};

use crate::api::SessionConfig;
use crate::core::{
    AxisDirection, AxisSnapshot, ChartElement, DataTable, ElementId, ElementKind, HistoryManager,
    ShapeCommand,
};
use crate::error::{ExtractError, ExtractResult};
use crate::export::{self, ExportColumn};
use crate::extract::{self, AxisExtraction, SeriesExtraction};
use crate::render::{NullRasterizer, Rasterizer};
use crate::text::{NoOcr, OcrEngine, TextMerger, chunks_to_lines};

/// One extraction session: the table being rebuilt, its undo history and the
/// text collaborators.
///
/// Every mutating call records a restore point first. A call that fails leaves
/// the table exactly as it was and records nothing.
#[derive(Debug)]
pub struct ExtractionSession<R = NullRasterizer, O = NoOcr> {
    table: DataTable,
    history: HistoryManager,
    merger: TextMerger<R, O>,
    config: SessionConfig,
    axis_retry: [Option<AxisSnapshot>; 2],
}

impl ExtractionSession {
    /// Session without a rasterizer or OCR engine: only native text is read.
    pub fn headless(config: SessionConfig) -> ExtractResult<Self> {
        Self::new(NullRasterizer, NoOcr, config)
    }
}

impl<R: Rasterizer, O: OcrEngine> ExtractionSession<R, O> {
    pub fn new(rasterizer: R, ocr: O, config: SessionConfig) -> ExtractResult<Self> {
        config.validate()?;
        let merger = TextMerger::new(rasterizer, ocr).with_language(config.ocr_language.clone());
        Ok(Self {
            table: DataTable::new(),
            history: HistoryManager::with_limit(config.history_limit),
            merger,
            config,
            axis_retry: [None, None],
        })
    }

    #[must_use]
    pub fn table(&self) -> &DataTable {
        &self.table
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn text_merger(&self) -> &TextMerger<R, O> {
        &self.merger
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> ExtractResult<()> {
        self.table = self.history.undo(&self.table)?;
        debug!(undo_depth = self.history.undo_depth(), "undo");
        Ok(())
    }

    pub fn redo(&mut self) -> ExtractResult<()> {
        self.table = self.history.redo(&self.table)?;
        debug!(redo_depth = self.history.redo_depth(), "redo");
        Ok(())
    }

    /// Runs `mutation` on the table, recording the prior state on success and
    /// restoring it on failure.
    fn mutate<T>(&mut self, mutation: impl FnOnce(&mut DataTable) -> ExtractResult<T>) -> ExtractResult<T> {
        let before = self.table.clone();
        match mutation(&mut self.table) {
            Ok(value) => {
                debug_assert!(self.table.check_links().is_ok());
                self.history.record_snapshot(before);
                Ok(value)
            }
            Err(err) => {
                self.table = before;
                Err(err)
            }
        }
    }

    pub fn add_series(&mut self, kind: ElementKind, name: impl Into<String>) -> ExtractResult<ElementId> {
        let name = name.into();
        self.mutate(|table| table.add_series(kind, name))
    }

    /// Adds (or returns the existing) upper and lower error bars of `series`.
    pub fn add_error_bars(&mut self, series: ElementId) -> ExtractResult<(ElementId, ElementId)> {
        self.mutate(|table| table.add_error_bars(series))
    }

    /// Removes an element together with the sub-elements it owns.
    pub fn remove_element(&mut self, id: ElementId) -> ExtractResult<ChartElement> {
        self.mutate(|table| table.remove_element(id))
    }

    pub fn rename_element(&mut self, id: ElementId, name: impl Into<String>) -> ExtractResult<()> {
        let name = name.into();
        self.mutate(|table| {
            table.element_mut(id)?.set_name(name);
            Ok(())
        })
    }

    /// Feeds `selected` to the extractor of `target`'s kind. `all_shapes` is
    /// the whole page, searched for a legend entry.
    pub fn extract_into(
        &mut self,
        target: ElementId,
        selected: &[ShapeCommand],
        all_shapes: &[ShapeCommand],
    ) -> ExtractResult<SeriesExtraction> {
        let tuning = self.config.tuning;
        self.mutate(|table| extract::extract_series(table, target, selected, all_shapes, &tuning))
    }

    /// Convenience for error bars: widens both bars of `series` from the same
    /// selection, creating them first if needed.
    pub fn extract_error_bars(
        &mut self,
        series: ElementId,
        selected: &[ShapeCommand],
    ) -> ExtractResult<(SeriesExtraction, SeriesExtraction)> {
        let tuning = self.config.tuning;
        self.mutate(|table| {
            let (upper, lower) = table.add_error_bars(series)?;
            let upper = extract::extract_series(table, upper, selected, &[], &tuning)?;
            let lower = extract::extract_series(table, lower, selected, &[], &tuning)?;
            Ok((upper, lower))
        })
    }

    /// Reads tick labels from `selected` and registers them on the axis.
    ///
    /// Text is resolved before the table is touched, so a selection without
    /// text fails with `NothingExtracted` and changes nothing; callers may
    /// then offer [`retry_axis_with_ocr`](Self::retry_axis_with_ocr). The
    /// axis state before a successful extraction is kept for that retry.
    pub async fn extract_axis(
        &mut self,
        direction: AxisDirection,
        selected: &[ShapeCommand],
        all_shapes: &[ShapeCommand],
        allow_ocr: bool,
    ) -> ExtractResult<AxisExtraction> {
        let lines = self.merger.texts_from_shapes(selected, allow_ocr).await?;
        let snapshot = self.table.axis(direction).snapshot();
        let tuning = self.config.tuning;
        let outcome = self.mutate(|table| {
            Ok(extract::apply_axis_text(
                table.axis_mut(direction),
                &lines,
                selected,
                all_shapes,
                &tuning,
            ))
        })?;
        self.axis_retry[axis_slot(direction)] = Some(snapshot);
        Ok(outcome)
    }

    /// Re-runs an axis extraction with OCR forced on.
    ///
    /// If the axis was extracted before, it is first rolled back to the state
    /// preceding that extraction; the rollback and the new ticks form a single
    /// undo step.
    pub async fn retry_axis_with_ocr(
        &mut self,
        direction: AxisDirection,
        selected: &[ShapeCommand],
        all_shapes: &[ShapeCommand],
    ) -> ExtractResult<AxisExtraction> {
        let chunks = self.merger.recognize_rendered(selected).await?;
        if chunks.is_empty() {
            return Err(ExtractError::nothing_extracted("ocr found no text in selection"));
        }
        let lines = chunks_to_lines(chunks);
        let slot = axis_slot(direction);
        let rollback = self.axis_retry[slot].clone();
        let tuning = self.config.tuning;
        let outcome = self.mutate(|table| {
            let axis = table.axis_mut(direction);
            if let Some(snapshot) = rollback {
                axis.restore(snapshot);
            }
            Ok(extract::apply_axis_text(axis, &lines, selected, all_shapes, &tuning))
        })?;
        info!(
            ?direction,
            ticks_added = outcome.ticks_added.len(),
            "axis re-extracted with ocr"
        );
        Ok(outcome)
    }

    /// Resets the axis ticks, shapes and interpolation mode.
    pub fn clear_axis(&mut self, direction: AxisDirection) -> ExtractResult<()> {
        self.axis_retry[axis_slot(direction)] = None;
        self.mutate(|table| {
            table.axis_mut(direction).clear();
            Ok(())
        })
    }

    /// Renames `id` from the text found in `shapes`.
    pub async fn rename_from_shapes(
        &mut self,
        id: ElementId,
        shapes: &[ShapeCommand],
        allow_ocr: bool,
    ) -> ExtractResult<String> {
        self.table.element(id)?;
        let name = self.merger.text_from_shapes(shapes, allow_ocr).await?;
        let applied = name.clone();
        self.mutate(|table| {
            table.element_mut(id)?.set_name(applied);
            Ok(())
        })?;
        Ok(name)
    }

    /// Sets the table title from the text found in `shapes`.
    pub async fn set_title_from_shapes(
        &mut self,
        shapes: &[ShapeCommand],
        allow_ocr: bool,
    ) -> ExtractResult<String> {
        let title = self.merger.text_from_shapes(shapes, allow_ocr).await?;
        let applied = title.clone();
        self.mutate(|table| {
            table.set_name(applied);
            Ok(())
        })?;
        Ok(title)
    }

    /// Edits one cell of the exported table: moves the point of `id` at
    /// `column` so its Y reads `label`. Returns `false`, recording nothing,
    /// when the element has no point in that column.
    pub fn set_cell_value(&mut self, id: ElementId, column: ExportColumn, label: &str) -> ExtractResult<bool> {
        let mut edited = self.table.clone();
        if !edited.set_y_value(id, column.pixel, column.duplicate, label)? {
            return Ok(false);
        }
        let before = std::mem::replace(&mut self.table, edited);
        self.history.record_snapshot(before);
        Ok(true)
    }

    /// Columns of the exported table.
    pub fn columns(&self) -> ExtractResult<Vec<ExportColumn>> {
        export::export_columns(&self.table)
    }

    pub fn export_csv(&self) -> ExtractResult<String> {
        export::to_csv(&self.table, &self.config.csv_options())
    }
}

fn axis_slot(direction: AxisDirection) -> usize {
    match direction {
        AxisDirection::Horizontal => 0,
        AxisDirection::Vertical => 1,
    }
}
