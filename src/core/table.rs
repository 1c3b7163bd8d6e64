use std::borrow::Cow;

use tracing::debug;

use crate::core::axis::{Axis, AxisDirection};
use crate::core::coordinate::AxisCoordinate2D;
use crate::core::element::{ChartElement, ElementId, ElementKind, LinkSlot, lookup_at_pixel_x};
use crate::error::{ExtractError, ExtractResult};

pub const DEFAULT_TABLE_NAME: &str = "Chart Title";
pub const DEFAULT_X_AXIS_NAME: &str = "Horizontal (X) Axis";
pub const DEFAULT_Y_AXIS_NAME: &str = "Vertical (Y) Axis";

/// The reconstructed chart: two axes and an ordered list of series with their
/// sub-elements interleaved.
///
/// Elements live in an arena and reference each other by [`ElementId`]. A
/// plain `clone()` is therefore a complete snapshot: every link and owner in
/// the copy resolves to an element of the copy.
#[derive(Debug, Clone)]
pub struct DataTable {
    name: String,
    x_axis: Axis,
    y_axis: Axis,
    elements: Vec<ChartElement>,
    next_id: u32,
}

impl Default for DataTable {
    fn default() -> Self {
        Self::new()
    }
}

impl DataTable {
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: DEFAULT_TABLE_NAME.to_owned(),
            x_axis: Axis::new(DEFAULT_X_AXIS_NAME, AxisDirection::Horizontal),
            y_axis: Axis::new(DEFAULT_Y_AXIS_NAME, AxisDirection::Vertical),
            elements: Vec::new(),
            next_id: 0,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[must_use]
    pub fn x_axis(&self) -> &Axis {
        &self.x_axis
    }

    #[must_use]
    pub fn y_axis(&self) -> &Axis {
        &self.y_axis
    }

    pub fn x_axis_mut(&mut self) -> &mut Axis {
        &mut self.x_axis
    }

    pub fn y_axis_mut(&mut self) -> &mut Axis {
        &mut self.y_axis
    }

    #[must_use]
    pub fn axis(&self, direction: AxisDirection) -> &Axis {
        match direction {
            AxisDirection::Horizontal => &self.x_axis,
            AxisDirection::Vertical => &self.y_axis,
        }
    }

    pub fn axis_mut(&mut self, direction: AxisDirection) -> &mut Axis {
        match direction {
            AxisDirection::Horizontal => &mut self.x_axis,
            AxisDirection::Vertical => &mut self.y_axis,
        }
    }

    /// Series and sub-elements in display order.
    #[must_use]
    pub fn elements(&self) -> &[ChartElement] {
        &self.elements
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[must_use]
    pub fn position(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|element| element.id() == id)
    }

    pub fn element(&self, id: ElementId) -> ExtractResult<&ChartElement> {
        self.elements
            .iter()
            .find(|element| element.id() == id)
            .ok_or(ExtractError::UnknownElement(id))
    }

    pub fn element_mut(&mut self, id: ElementId) -> ExtractResult<&mut ChartElement> {
        self.elements
            .iter_mut()
            .find(|element| element.id() == id)
            .ok_or(ExtractError::UnknownElement(id))
    }

    fn allocate_id(&mut self) -> ElementId {
        let id = ElementId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Appends a new top-level series. Axes and sub-element kinds cannot be
    /// created this way.
    pub fn add_series(&mut self, kind: ElementKind, name: impl Into<String>) -> ExtractResult<ElementId> {
        if !kind.is_series() {
            return Err(ExtractError::Unsupported { kind });
        }
        let id = self.allocate_id();
        self.elements.push(ChartElement::new(id, kind, name));
        debug!(%id, %kind, "added series");
        Ok(id)
    }

    /// Creates the sub-element for `slot` right after `series` unless the slot
    /// is already filled. Returns the slot's element id.
    fn ensure_sub_element(&mut self, series: ElementId, slot: LinkSlot, insert_at: usize) -> ExtractResult<ElementId> {
        if let Some(existing) = self.element(series)?.link(slot) {
            return Ok(existing);
        }
        let id = self.allocate_id();
        let at = insert_at.min(self.elements.len());
        self.elements.insert(at, ChartElement::new_sub_element(id, series, slot));
        self.element_mut(series)?.set_link(slot, Some(id));
        Ok(id)
    }

    /// Adds the upper and lower error bars of `series` (upper first, directly
    /// below the series), reusing any that already exist.
    pub fn add_error_bars(&mut self, series: ElementId) -> ExtractResult<(ElementId, ElementId)> {
        let element = self.element(series)?;
        if !element.can_have_error_bars() {
            return Err(ExtractError::Unsupported {
                kind: element.kind(),
            });
        }
        let after_series = self.position(series).map_or(self.elements.len(), |p| p + 1);
        let upper = self.ensure_sub_element(series, LinkSlot::UpperErrorBar, after_series)?;
        let after_upper = self.position(upper).map_or(self.elements.len(), |p| p + 1);
        let lower = self.ensure_sub_element(series, LinkSlot::LowerErrorBar, after_upper)?;
        debug!(%series, %upper, %lower, "error bars attached");
        Ok((upper, lower))
    }

    /// Q3, Q1, min and max sub-elements of a box plot, created on first use
    /// and inserted in that order right after the series.
    pub fn ensure_box_plot_parts(&mut self, series: ElementId) -> ExtractResult<[ElementId; 4]> {
        let kind = self.element(series)?.kind();
        if kind != ElementKind::BoxPlot {
            return Err(ExtractError::Unsupported { kind });
        }
        let mut ids = [series; 4];
        let mut insert_at = self.position(series).map_or(self.elements.len(), |p| p + 1);
        for (slot_id, slot) in ids.iter_mut().zip(LinkSlot::BOX_PLOT) {
            *slot_id = self.ensure_sub_element(series, slot, insert_at)?;
            insert_at = self.position(*slot_id).map_or(self.elements.len(), |p| p + 1);
        }
        Ok(ids)
    }

    /// Removes an element together with every sub-element it links to. When
    /// the removed element is itself a sub-element, its series' slot is
    /// cleared.
    pub fn remove_element(&mut self, id: ElementId) -> ExtractResult<ChartElement> {
        let index = self.position(id).ok_or(ExtractError::UnknownElement(id))?;
        let removed = self.elements.remove(index);
        for linked in removed.links().iter().flatten() {
            if let Some(position) = self.position(*linked) {
                self.elements.remove(position);
            }
        }
        if let Some(owner) = removed.owner() {
            if let Ok(series) = self.element_mut(owner) {
                series.clear_link_to(id);
            }
        }
        debug!(%id, remaining = self.elements.len(), "removed element");
        Ok(removed)
    }

    /// Main color, inherited from the series for sub-elements.
    pub fn main_color(&self, id: ElementId) -> ExtractResult<Option<String>> {
        let element = self.element(id)?;
        match element.owner() {
            Some(owner) => Ok(self.element(owner)?.own_main_color()),
            None => Ok(element.own_main_color()),
        }
    }

    /// Points of `id` as the table presents them. Error bars are padded up to
    /// their series' length with the series' own points, so index `i` of an
    /// error bar always shares its X with index `i` of the series.
    pub fn resolved_data(&self, id: ElementId) -> ExtractResult<Cow<'_, [AxisCoordinate2D]>> {
        let element = self.element(id)?;
        let stored = element.data();
        if let (ElementKind::ErrorBar, Some(owner)) = (element.kind(), element.owner()) {
            let series = self.element(owner)?.data();
            if stored.len() < series.len() {
                let mut padded = stored.to_vec();
                padded.extend_from_slice(&series[stored.len()..]);
                return Ok(Cow::Owned(padded));
            }
        }
        Ok(Cow::Borrowed(stored))
    }

    /// Mutable points of `id`, after padding error bars as in
    /// [`DataTable::resolved_data`].
    pub fn data_mut(&mut self, id: ElementId) -> ExtractResult<&mut Vec<AxisCoordinate2D>> {
        let padding = match self.resolved_data(id)? {
            Cow::Owned(padded) => Some(padded),
            Cow::Borrowed(_) => None,
        };
        let element = self.element_mut(id)?;
        if let Some(padded) = padding {
            element.data = padded;
        }
        Ok(&mut element.data)
    }

    /// Point of `id` at `pixel_x`, see [`lookup_at_pixel_x`].
    pub fn at_pixel_x(&self, id: ElementId, pixel_x: f64, skip: usize) -> ExtractResult<Option<AxisCoordinate2D>> {
        let interpolable = self.element(id)?.can_be_interpolated();
        let data = self.resolved_data(id)?;
        Ok(lookup_at_pixel_x(interpolable, &data, pixel_x, skip))
    }

    /// Semantic `(x, y)` labels of a point.
    #[must_use]
    pub fn values_of(&self, point: &AxisCoordinate2D) -> (String, String) {
        point.values(&self.x_axis, &self.y_axis)
    }

    /// Sets the Y value of the stored point at exactly `pixel_x` (the
    /// `skip`-th duplicate) by moving it through the Y axis calibration.
    /// Returns `false` when no stored point sits at that X.
    pub fn set_y_value(&mut self, id: ElementId, pixel_x: f64, skip: usize, label: &str) -> ExtractResult<bool> {
        let y_pixel = self.y_axis.tick_to_pixel(label)?;
        let data = self.data_mut(id)?;
        match data.iter_mut().filter(|point| point.x.pixel == pixel_x).nth(skip) {
            Some(point) => {
                point.y.pixel = y_pixel;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Checks that every link and owner resolves inside this table.
    pub fn check_links(&self) -> ExtractResult<()> {
        for element in &self.elements {
            let owner = element.owner();
            for target in element.links().iter().flatten().chain(owner.iter()) {
                if self.position(*target).is_none() {
                    return Err(ExtractError::InvalidData(format!(
                        "element {} references {target} which is not in the table",
                        element.id()
                    )));
                }
            }
        }
        Ok(())
    }
}
