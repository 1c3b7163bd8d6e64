use std::cell::RefCell;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

use crate::core::axis::Axis;
use crate::core::color::is_colorful;
use crate::core::coordinate::{AxisCoordinate1D, AxisCoordinate2D, interpolate};
use crate::core::shape::{ShapeCommand, ShapeId};

/// Stable handle of an element inside one [`DataTable`](crate::core::DataTable).
/// Snapshots keep ids, so handles stay valid across undo/redo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(u32);

impl ElementId {
    pub(crate) const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Axis,
    Line,
    Bar,
    Scatter,
    ErrorBar,
    BoxPlot,
    BoxPlotQ1,
    BoxPlotQ3,
    BoxPlotMin,
    BoxPlotMax,
}

impl ElementKind {
    /// Kinds a user can create directly as a top-level series.
    #[must_use]
    pub fn is_series(self) -> bool {
        matches!(self, Self::Line | Self::Bar | Self::Scatter | Self::BoxPlot)
    }

    /// Kinds that only exist attached to a main series.
    #[must_use]
    pub fn is_sub_element(self) -> bool {
        matches!(
            self,
            Self::ErrorBar | Self::BoxPlotQ1 | Self::BoxPlotQ3 | Self::BoxPlotMin | Self::BoxPlotMax
        )
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Axis => "Axis",
            Self::Line => "Line",
            Self::Bar => "Bar",
            Self::Scatter => "Scatter",
            Self::ErrorBar => "Errorbar",
            Self::BoxPlot => "Box plot",
            Self::BoxPlotQ1 => "Box plot Q1",
            Self::BoxPlotQ3 => "Box plot Q3",
            Self::BoxPlotMin => "Box plot min",
            Self::BoxPlotMax => "Box plot max",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorBound {
    Upper,
    Lower,
}

/// Cross-reference slots. The first two are reserved for error bars on every
/// element; box plots add four more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkSlot {
    UpperErrorBar,
    LowerErrorBar,
    Q3,
    Q1,
    Min,
    Max,
}

impl LinkSlot {
    pub const BOX_PLOT: [LinkSlot; 4] = [LinkSlot::Q3, LinkSlot::Q1, LinkSlot::Min, LinkSlot::Max];

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::UpperErrorBar => 0,
            Self::LowerErrorBar => 1,
            Self::Q3 => 2,
            Self::Q1 => 3,
            Self::Min => 4,
            Self::Max => 5,
        }
    }

    /// Sub-element kind and display name stored in this slot.
    #[must_use]
    pub fn sub_element(self) -> (ElementKind, &'static str) {
        match self {
            Self::UpperErrorBar => (ElementKind::ErrorBar, "↳ Error ⏉"),
            Self::LowerErrorBar => (ElementKind::ErrorBar, "↳ Error ⏊"),
            Self::Q3 => (ElementKind::BoxPlotQ3, "↳ Q3"),
            Self::Q1 => (ElementKind::BoxPlotQ1, "↳ Q1"),
            Self::Min => (ElementKind::BoxPlotMin, "↳ Min"),
            Self::Max => (ElementKind::BoxPlotMax, "↳ Max"),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct ColorMemo {
    version: u64,
    color: Option<String>,
}

/// A data series or a sub-element derived from one.
///
/// Sub-elements (error bars, box-plot quartiles and extremes) carry the id of
/// their main series in `owner`. Links and owners are plain ids, so cloning a
/// table keeps every reference inside the clone.
#[derive(Debug, Clone)]
pub struct ChartElement {
    id: ElementId,
    kind: ElementKind,
    name: String,
    pub(crate) data: Vec<AxisCoordinate2D>,
    shapes: Vec<ShapeCommand>,
    links: SmallVec<[Option<ElementId>; 6]>,
    owner: Option<ElementId>,
    bound: Option<ErrorBound>,
    shapes_version: u64,
    color_memo: RefCell<Option<ColorMemo>>,
}

impl ChartElement {
    pub(crate) fn new(id: ElementId, kind: ElementKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            data: Vec::new(),
            shapes: Vec::new(),
            links: smallvec![None, None],
            owner: None,
            bound: None,
            shapes_version: 0,
            color_memo: RefCell::new(None),
        }
    }

    pub(crate) fn new_sub_element(id: ElementId, owner: ElementId, slot: LinkSlot) -> Self {
        let (kind, name) = slot.sub_element();
        let mut element = Self::new(id, kind, name);
        element.owner = Some(owner);
        element.bound = match slot {
            LinkSlot::UpperErrorBar => Some(ErrorBound::Upper),
            LinkSlot::LowerErrorBar => Some(ErrorBound::Lower),
            _ => None,
        };
        element
    }

    #[must_use]
    pub fn id(&self) -> ElementId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    #[must_use]
    pub fn is(&self, kind: ElementKind) -> bool {
        self.kind == kind
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Stored points. Error bars may hold fewer points than their series; read
    /// them through [`DataTable::resolved_data`](crate::core::DataTable::resolved_data).
    #[must_use]
    pub fn data(&self) -> &[AxisCoordinate2D] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Vec<AxisCoordinate2D> {
        &mut self.data
    }

    pub fn push_point(&mut self, point: AxisCoordinate2D) {
        self.data.push(point);
    }

    /// Replaces the point within `tolerance_px` horizontally, or appends.
    pub fn upsert_point(&mut self, point: AxisCoordinate2D, tolerance_px: f64) {
        match self
            .data
            .iter_mut()
            .find(|existing| (existing.x.pixel - point.x.pixel).abs() < tolerance_px)
        {
            Some(existing) => *existing = point,
            None => self.data.push(point),
        }
    }

    #[must_use]
    pub fn shapes(&self) -> &[ShapeCommand] {
        &self.shapes
    }

    #[must_use]
    pub fn has_shape(&self, id: ShapeId) -> bool {
        self.shapes.iter().any(|shape| shape.id() == id)
    }

    /// Appends contributing shapes and bumps the shape version, which
    /// invalidates the memoized main color.
    pub fn attach_shapes(&mut self, shapes: impl IntoIterator<Item = ShapeCommand>) {
        let before = self.shapes.len();
        self.shapes.extend(shapes);
        if self.shapes.len() != before {
            self.shapes_version += 1;
        }
    }

    #[must_use]
    pub fn shapes_version(&self) -> u64 {
        self.shapes_version
    }

    #[must_use]
    pub fn links(&self) -> &[Option<ElementId>] {
        &self.links
    }

    #[must_use]
    pub fn link(&self, slot: LinkSlot) -> Option<ElementId> {
        self.links.get(slot.index()).copied().flatten()
    }

    pub(crate) fn set_link(&mut self, slot: LinkSlot, target: Option<ElementId>) {
        let index = slot.index();
        if self.links.len() <= index {
            self.links.resize(index + 1, None);
        }
        self.links[index] = target;
    }

    pub(crate) fn clear_link_to(&mut self, target: ElementId) {
        for link in &mut self.links {
            if *link == Some(target) {
                *link = None;
            }
        }
    }

    #[must_use]
    pub fn upper_error_bar(&self) -> Option<ElementId> {
        self.link(LinkSlot::UpperErrorBar)
    }

    #[must_use]
    pub fn lower_error_bar(&self) -> Option<ElementId> {
        self.link(LinkSlot::LowerErrorBar)
    }

    #[must_use]
    pub fn has_error_bars(&self) -> bool {
        self.upper_error_bar().is_some() && self.lower_error_bar().is_some()
    }

    /// Main series of a sub-element.
    #[must_use]
    pub fn owner(&self) -> Option<ElementId> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: Option<ElementId>) {
        self.owner = owner;
    }

    #[must_use]
    pub fn is_sub_element(&self) -> bool {
        self.owner.is_some()
    }

    #[must_use]
    pub fn error_bound(&self) -> Option<ErrorBound> {
        self.bound
    }

    /// Only line series are continuous.
    #[must_use]
    pub fn can_be_interpolated(&self) -> bool {
        self.kind == ElementKind::Line
    }

    #[must_use]
    pub fn can_have_error_bars(&self) -> bool {
        !self.is_sub_element() && self.kind != ElementKind::BoxPlot && self.kind != ElementKind::Axis
    }

    /// Majority paint color of the contributing shapes, preferring a colorful
    /// winner over grays. Memoized until the shape list changes.
    ///
    /// Sub-elements inherit their series' color; resolve those through
    /// [`DataTable::main_color`](crate::core::DataTable::main_color).
    #[must_use]
    pub fn own_main_color(&self) -> Option<String> {
        if let Some(memo) = self.color_memo.borrow().as_ref() {
            if memo.version == self.shapes_version {
                return memo.color.clone();
            }
        }
        let color = majority_color(&self.shapes);
        *self.color_memo.borrow_mut() = Some(ColorMemo {
            version: self.shapes_version,
            color: color.clone(),
        });
        color
    }

    /// Y coordinate of the first point whose X label equals `label`.
    #[must_use]
    pub fn at_tick_x(&self, label: &str, x_axis: &Axis) -> Option<AxisCoordinate1D> {
        self.data
            .iter()
            .find(|point| point.x.value(x_axis) == label)
            .map(|point| point.y)
    }

    /// Point at `pixel_x`; see [`lookup_at_pixel_x`].
    #[must_use]
    pub fn at_pixel_x(&self, pixel_x: f64, skip: usize) -> Option<AxisCoordinate2D> {
        lookup_at_pixel_x(self.can_be_interpolated(), &self.data, pixel_x, skip)
    }
}

/// Interpolable series are sampled between neighbours. Others need an exact
/// X match; `skip` selects among several points sharing that X.
#[must_use]
pub fn lookup_at_pixel_x(
    interpolable: bool,
    data: &[AxisCoordinate2D],
    pixel_x: f64,
    skip: usize,
) -> Option<AxisCoordinate2D> {
    if interpolable {
        return interpolate(data, pixel_x);
    }
    data.iter()
        .filter(|point| point.x.pixel == pixel_x)
        .nth(skip)
        .copied()
}

fn majority_color(shapes: &[ShapeCommand]) -> Option<String> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    let mut main: Option<&str> = None;
    let mut colorful: Option<&str> = None;
    for shape in shapes {
        let color = shape.style().paint_color();
        let count = {
            let entry = counts.entry(color).or_insert(0);
            *entry += 1;
            *entry
        };
        let beats = |current: Option<&str>| current.is_none_or(|c| count > counts[c]);
        if beats(main) {
            main = Some(color);
        }
        if is_colorful(color) && beats(colorful) {
            colorful = Some(color);
        }
    }
    colorful.or(main).map(str::to_owned)
}
