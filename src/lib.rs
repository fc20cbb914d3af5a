//! # Pilotage
//!
//! A read-transform-present pipeline for weekly/monthly HR-operations
//! metrics (recruitment, absenteeism, sourcing funnel, action-plan
//! tracking). The crate ingests a single consolidated workbook or a set of
//! equivalent delimited exports, normalizes inconsistent numeric/textual
//! encodings and hands cleaned, filtered, aggregated tables to whatever
//! presentation layer sits on top.
//!
//! ## Features
//!
//! - **Tolerant ingestion**: one `.xlsx` workbook with a sheet per logical
//!   table, or per-table `.csv`/`.txt` exports matched by file name; sheet
//!   and column matching is case-insensitive and survives renames
//! - **French-locale normalization**: decimal commas, non-breaking spaces,
//!   trailing percent signs and quoted numbers all parse; anything else
//!   degrades to a missing value instead of failing the load
//! - **Percentage scale correction**: rate columns stored as fractions
//!   (0.88 for 88%) are detected per column and brought to percent scale
//! - **Fiscal-year filtering**: one global year selection (or all periods)
//!   scopes every section
//! - **Sourcing aggregation**: funnel counters summed per normalized
//!   channel, with a raw per-candidate fallback schema
//! - **Memoized loads**: unchanged sources are never re-parsed
//!
//! The pipeline re-runs top to bottom on every input change; all state
//! lives in the returned [`Dataset`].
pub mod clean;
pub mod dataset;
pub mod error;
pub mod load;
pub mod views;

pub use crate::clean::columns::{ColumnRole, Keywords};
pub use crate::clean::value::{normalize_numeric_text, CellValue, ParseStats};
pub use crate::clean::{clean_table, CleanOptions};
pub use crate::dataset::table::{Column, DataTable};
pub use crate::dataset::years::{
    available_years, filter_by_year, year_options, YearSelection, YEAR_FLOOR,
};
pub use crate::dataset::{Dataset, LogicalName};
pub use crate::error::PilotageError;
pub use crate::load::{load_dataset, LoadError, LoadOptions};
pub use crate::views::plan::global_completion;
pub use crate::views::sourcing::{
    aggregate_sources, channel_focus, top_sources, SourceAggregate, TALENT_CENTER_KEYWORD,
};
pub use crate::views::ytd::{ytd_metrics, YtdMetric};
pub use crate::views::{period_labels, sort_by_period, ManualMetrics, ViewError};

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

/// Loads the dataset registry from a directory with default options.
///
/// Convenience entry point for presentation layers; see
/// [`load::load_dataset`] for the configurable form.
pub fn load_from_dir<P: AsRef<Path>>(directory: P) -> Result<Arc<Dataset>> {
    let options = LoadOptions::new(directory.as_ref());
    load_dataset(&options).with_context(|| {
        format!(
            "Failed to load HR metrics from '{}': expected a consolidated .xlsx workbook or per-table .csv exports",
            directory.as_ref().display()
        )
    })
}
