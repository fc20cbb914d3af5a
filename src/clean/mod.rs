//! # Cleaning Pipeline
//!
//! Turns raw sheet content into an analysis-ready [`DataTable`]: header
//! trimming, column role classification, per-cell numeric normalization,
//! percentage scale correction and fiscal-year coercion. Every step is
//! non-fatal per cell; unparseable content degrades to missing values while
//! per-column statistics record what happened.
pub mod columns;
pub mod scale;
pub mod value;

use crate::clean::columns::{ColumnRole, Keywords};
use crate::clean::value::{normalize_numeric_text, CellValue, ParseStats};
use crate::dataset::table::{Column, DataTable};
use tracing::debug;

/// Cleaning policy knobs.
#[derive(Clone, Debug)]
pub struct CleanOptions {
    /// Keyword table for column classification
    pub keywords: Keywords,
    /// Year assigned to rows whose year cell is blank or unparseable, so
    /// rows are never dropped over a malformed year. Placeholder years stay
    /// out of the selectable set.
    pub year_placeholder: i32,
}

impl Default for CleanOptions {
    fn default() -> Self {
        CleanOptions {
            keywords: Keywords::default(),
            year_placeholder: 0,
        }
    }
}

/// Runs the full cleaning pipeline over one raw table.
pub fn clean_table(
    name: &str,
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
    options: &CleanOptions,
) -> DataTable {
    let columns: Vec<Column> = headers
        .iter()
        .map(|header| {
            let trimmed = header.trim().to_owned();
            Column {
                role: options.keywords.classify(&trimmed),
                name: trimmed,
                stats: ParseStats::default(),
            }
        })
        .collect();
    let width = columns.len();
    let rows = rows
        .into_iter()
        .map(|mut row| {
            row.resize(width, CellValue::Missing);
            row
        })
        .collect();
    let mut table = DataTable {
        name: name.to_owned(),
        columns,
        rows,
    };
    normalize_cells(&mut table);
    scale::rescale_rate_columns(&mut table);
    coerce_year_column(&mut table, options.year_placeholder);
    for column in &table.columns {
        debug!(
            table = %table.name,
            column = %column.name,
            role = ?column.role,
            cells = column.stats.cells,
            parsed = column.stats.parsed,
            missing = column.stats.missing,
            rescaled = column.stats.rescaled,
            "column cleaned"
        );
    }
    table
}

/// Applies the value normalizer column by column.
///
/// Protected columns skip numeric conversion entirely; raw numeric cells in
/// them are rendered back to text. Elsewhere, textual cells parse to numbers
/// where possible, blanks become missing, and non-numeric text survives
/// untouched.
fn normalize_cells(table: &mut DataTable) {
    for index in 0..table.columns.len() {
        let protected = table.columns[index].role == ColumnRole::Protected;
        let stats = &mut table.columns[index].stats;
        for row in &mut table.rows {
            let cell = &mut row[index];
            stats.cells += 1;
            if protected {
                match cell {
                    CellValue::Number(_) => *cell = CellValue::Text(cell.to_string()),
                    CellValue::Text(text) if text.trim().is_empty() => {
                        *cell = CellValue::Missing;
                        stats.missing += 1;
                    }
                    CellValue::Text(_) => (),
                    CellValue::Missing => stats.missing += 1,
                }
                continue;
            }
            match cell {
                CellValue::Number(_) => stats.parsed += 1,
                CellValue::Text(text) => match normalize_numeric_text(text) {
                    Some(value) => {
                        *cell = CellValue::Number(value);
                        stats.parsed += 1;
                    }
                    None if text.trim().is_empty() => {
                        *cell = CellValue::Missing;
                        stats.missing += 1;
                    }
                    None => (),
                },
                CellValue::Missing => stats.missing += 1,
            }
        }
    }
}

/// Coerces the year column to whole numbers, defaulting malformed cells to
/// the placeholder year.
fn coerce_year_column(table: &mut DataTable, placeholder: i32) {
    let Some(index) = table.year_column() else { return };
    for row in &mut table.rows {
        let coerced = match &row[index] {
            CellValue::Number(value) if value.is_finite() => value.trunc(),
            CellValue::Text(text) => normalize_numeric_text(text)
                .map(f64::trunc)
                .unwrap_or(f64::from(placeholder)),
            _ => f64::from(placeholder),
        };
        row[index] = CellValue::Number(coerced);
    }
}
