use std::collections::BTreeSet;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::axis::{format_value, parse_numeric_label};
use crate::core::{DataTable, ElementKind};
use crate::error::{ExtractError, ExtractResult};

/// Numeric precision of exported Y values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CsvPrecision {
    /// Shortest representation that round-trips.
    #[default]
    Full,
    /// Fixed number of decimals.
    Fixed(u8),
}

impl CsvPrecision {
    #[must_use]
    pub fn format(self, value: f64) -> String {
        match self {
            Self::Full => format_value(value),
            Self::Fixed(decimals) => format!("{value:.*}", usize::from(decimals)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    pub precision: CsvPrecision,
    pub delimiter: char,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            precision: CsvPrecision::Full,
            delimiter: ',',
        }
    }
}

impl CsvOptions {
    #[must_use]
    pub fn with_precision(mut self, precision: CsvPrecision) -> Self {
        self.precision = precision;
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn validate(&self) -> ExtractResult<()> {
        if matches!(self.delimiter, '"' | '\n' | '\r') {
            return Err(ExtractError::InvalidData(format!(
                "`{}` cannot be used as a csv delimiter",
                self.delimiter.escape_debug()
            )));
        }
        Ok(())
    }
}

/// One exported column: an X pixel, and which of several points sharing that
/// X within one series it stands for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportColumn {
    pub pixel: f64,
    pub duplicate: usize,
}

/// Columns covering every X used by any element, sorted by pixel.
///
/// A series holding `n` extra points at one X (scatter clouds) adds `n` extra
/// columns for that X; the count is the max over all series.
pub fn export_columns(table: &DataTable) -> ExtractResult<Vec<ExportColumn>> {
    let mut unique: BTreeSet<OrderedFloat<f64>> = BTreeSet::new();
    let mut duplicates: IndexMap<OrderedFloat<f64>, usize> = IndexMap::new();
    for element in table.elements() {
        let data = table.resolved_data(element.id())?;
        let mut seen: IndexMap<OrderedFloat<f64>, usize> = IndexMap::new();
        for point in data.iter() {
            *seen.entry(OrderedFloat(point.x.pixel)).or_insert(0) += 1;
        }
        for (pixel, count) in seen {
            unique.insert(pixel);
            if count > 1 {
                let extra = duplicates.entry(pixel).or_insert(0);
                *extra = (*extra).max(count - 1);
            }
        }
    }

    let mut columns: Vec<ExportColumn> = unique
        .into_iter()
        .map(|pixel| ExportColumn {
            pixel: pixel.0,
            duplicate: 0,
        })
        .collect();
    for (pixel, extra) in duplicates {
        columns.extend((1..=extra).map(|duplicate| ExportColumn {
            pixel: pixel.0,
            duplicate,
        }));
    }
    columns.sort_by_key(|column| (OrderedFloat(column.pixel), column.duplicate));
    Ok(columns)
}

/// Smallest decimal count that keeps every distinct value distinct.
#[must_use]
pub fn min_unique_decimals(values: &[f64]) -> usize {
    const MAX_DECIMALS: usize = 20;
    let distinct: BTreeSet<OrderedFloat<f64>> = values.iter().copied().map(OrderedFloat).collect();
    (0..MAX_DECIMALS)
        .find(|&decimals| {
            let rounded: BTreeSet<String> =
                values.iter().map(|value| format!("{value:.decimals$}")).collect();
            rounded.len() == distinct.len()
        })
        .unwrap_or(MAX_DECIMALS)
}

/// Header plus one row per element, as strings.
///
/// The header is `Name` followed by the X label of each column: the tick label
/// on categorical axes, or the value rounded to the fewest decimals that keep
/// columns apart. Error bars export their distance to the main series.
/// Missing points are empty cells.
pub fn table_rows(table: &DataTable, precision: CsvPrecision) -> ExtractResult<Vec<Vec<String>>> {
    let columns = export_columns(table)?;
    let x_axis = table.x_axis();
    let y_axis = table.y_axis();
    let mut rows = Vec::with_capacity(table.len() + 1);

    if !columns.is_empty() {
        let labels: Vec<String> = columns
            .iter()
            .map(|column| x_axis.pixel_to_tick(column.pixel))
            .collect();
        let mut header = vec!["Name".to_owned()];
        if x_axis.is_categorical() {
            header.extend(labels);
        } else {
            let first_values: Vec<f64> = columns
                .iter()
                .zip(&labels)
                .filter(|(column, _)| column.duplicate == 0)
                .filter_map(|(_, label)| parse_numeric_label(label))
                .collect();
            let decimals = min_unique_decimals(&first_values);
            header.extend(labels.into_iter().map(|label| match parse_numeric_label(&label) {
                Some(value) => format!("{value:.decimals$}"),
                None => label,
            }));
        }
        rows.push(header);
    }

    for element in table.elements() {
        let mut row = Vec::with_capacity(columns.len() + 1);
        row.push(element.name().to_owned());
        for column in &columns {
            let Some(point) = table.at_pixel_x(element.id(), column.pixel, column.duplicate)? else {
                row.push(String::new());
                continue;
            };
            let label = y_axis.pixel_to_tick(point.y.pixel);
            let numeric = if y_axis.is_categorical() {
                None
            } else {
                parse_numeric_label(&label)
            };
            let Some(mut value) = numeric else {
                row.push(label);
                continue;
            };
            if let (ElementKind::ErrorBar, Some(owner)) = (element.kind(), element.owner()) {
                let main = table
                    .at_pixel_x(owner, column.pixel, column.duplicate)?
                    .and_then(|main| parse_numeric_label(&y_axis.pixel_to_tick(main.y.pixel)));
                if let Some(main) = main {
                    value = (value - main).abs();
                }
            }
            row.push(precision.format(value));
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Renders the table as delimited text, one line per row.
pub fn to_csv(table: &DataTable, options: &CsvOptions) -> ExtractResult<String> {
    options.validate()?;
    let rows = table_rows(table, options.precision)?;
    let delimiter = options.delimiter.to_string();
    Ok(rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|field| escape_field(field, options.delimiter))
                .collect::<Vec<_>>()
                .join(&delimiter)
        })
        .collect::<Vec<_>>()
        .join("\n"))
}

fn escape_field(field: &str, delimiter: char) -> String {
    let needs_quote = field.contains(delimiter)
        || field.contains('"')
        || field.contains('\n')
        || field.contains('\r');
    if !needs_quote {
        return field.to_owned();
    }
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimals_grow_until_values_separate() {
        assert_eq!(min_unique_decimals(&[1.0, 2.0, 3.0]), 0);
        // "1" and "2" already differ.
        assert_eq!(min_unique_decimals(&[1.0, 1.5]), 0);
        assert_eq!(min_unique_decimals(&[1.0, 1.25]), 1);
        assert_eq!(min_unique_decimals(&[0.12, 0.13]), 2);
        assert_eq!(min_unique_decimals(&[]), 0);
    }

    #[test]
    fn quotes_fields_with_delimiters() {
        assert_eq!(escape_field("a,b", ','), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\"", ','), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("plain", ','), "plain");
    }
}
