pub mod analysis;
pub mod axis;
pub mod color;
pub mod coordinate;
pub mod element;
pub mod filter;
pub mod font;
pub mod geometry;
pub mod history;
pub mod shape;
pub mod table;

pub use axis::{Axis, AxisDirection, AxisSnapshot, Interpolation, Tick};
pub use color::Rgba;
pub use coordinate::{AxisCoordinate1D, AxisCoordinate2D};
pub use element::{ChartElement, ElementId, ElementKind, ErrorBound, LinkSlot};
pub use font::{ApproximateFontMetrics, FontDescriptor, FontMetrics, TextExtents};
pub use geometry::{Rect, Transform};
pub use history::HistoryManager;
pub use shape::{ClipRegion, PathOp, ShapeCommand, ShapeId, ShapeKind, ShapeStyle, TextRun};
pub use table::DataTable;
