//! chart-extract: rebuilds the data behind vector-drawn charts.
//!
//! Drawing commands captured from a chart image (paths and text runs) are
//! turned into a [`core::DataTable`] of series expressed through calibrated
//! axes. Selections of shapes are fed to per-chart-type extractors, text is
//! merged from glyph runs or recognized through a pluggable OCR engine, every
//! edit is undoable, and the result exports to CSV.

pub mod api;
pub mod core;
pub mod error;
pub mod export;
pub mod extract;
pub mod render;
pub mod telemetry;
pub mod text;

pub use api::{ExtractionSession, SessionConfig};
pub use error::{ExtractError, ExtractResult};
