//! Durable text exports of a reconstructed table.

pub mod csv;

pub use csv::{CsvOptions, CsvPrecision, ExportColumn, export_columns, table_rows, to_csv};
