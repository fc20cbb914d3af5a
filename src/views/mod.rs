//! # Per-Tab Views
//!
//! Prepares the cleaned, filtered tables each report section consumes:
//! sourcing-channel aggregation, the action-plan gauge row, YTD metric
//! rows and monthly period ordering. No rendering happens here; the
//! presentation layer receives plain data. A missing column fails only its
//! own section, never the whole render.
pub mod plan;
pub mod sourcing;
pub mod ytd;

use crate::clean::columns::ColumnRole;
use crate::dataset::table::DataTable;
use std::cmp::Ordering;
use thiserror::Error;

/// Section-local errors: each consuming section checks its own columns and
/// shows an informational placeholder on failure.
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("Table '{table}' has no '{column}' column")]
    MissingColumn { table: String, column: String },
}

/// Looks up a required column, naming the section's missing piece on
/// failure.
pub(crate) fn require_column(table: &DataTable, needle: &str) -> Result<usize, ViewError> {
    table.find_column(needle).ok_or_else(|| ViewError::MissingColumn {
        table: table.name.clone(),
        column: needle.to_owned(),
    })
}

/// Display-only values typed in by the operator, never derived from the
/// source file.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ManualMetrics {
    /// Contractors currently in post
    pub headcount: i64,
    /// Contractor satisfaction score
    pub satisfaction: f64,
}

impl Default for ManualMetrics {
    fn default() -> Self {
        ManualMetrics {
            headcount: 133,
            satisfaction: 9.1,
        }
    }
}

/// Copies a monthly table sorted by (year, month) for time-series sections.
/// Tables lacking either column keep their original order for the missing
/// key.
pub fn sort_by_period(table: &DataTable) -> DataTable {
    let year = table.year_column();
    let month = table.column_by_role(ColumnRole::Month);
    let mut sorted = table.clone();
    sorted.rows.sort_by(|left, right| {
        let by_year = match year {
            Some(index) => left[index].order(&right[index]),
            None => Ordering::Equal,
        };
        by_year.then_with(|| match month {
            Some(index) => left[index].order(&right[index]),
            None => Ordering::Equal,
        })
    });
    sorted
}

/// `Mois/Année` labels for a monthly table, in row order. `None` when the
/// table has no month or no year column.
pub fn period_labels(table: &DataTable) -> Option<Vec<String>> {
    let month = table.column_by_role(ColumnRole::Month)?;
    let year = table.year_column()?;
    Some(
        table
            .rows
            .iter()
            .map(|row| format!("{}/{}", row[month], row[year]))
            .collect(),
    )
}
