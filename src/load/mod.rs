//! # Table Loader
//!
//! Discovers the input source in a directory (a consolidated `.xlsx`
//! workbook, or per-table delimited exports as a fallback), reads each
//! logical table, runs the cleaning pipeline and returns the dataset
//! registry. The full load is a pure function of the source content:
//! repeated invocations with unchanged input return the memoized dataset
//! without re-parsing.
pub mod delimited;
pub mod workbook;

use crate::clean::value::CellValue;
use crate::clean::{clean_table, CleanOptions};
use crate::dataset::{Dataset, LogicalName};
use crate::error::{PilotageError, ResultMessage};
use crate::load::workbook::Workbook;
use glob::glob;
use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort the whole load. Everything softer (missing sheet,
/// unparseable cell) degrades silently into an absent table or missing
/// value.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("No data source found in '{directory}': place a consolidated .xlsx workbook (e.g. data.xlsx) or per-table .csv exports there")]
    NoSourceFound { directory: String },

    #[error("'{path}' contains none of the expected tables")]
    NoTablesFound { path: String },
}

/// Where and how to load.
#[derive(Clone, Debug)]
pub struct LoadOptions {
    /// Directory scanned for the source files
    pub directory: PathBuf,
    /// Cleaning policy applied to every table
    pub clean: CleanOptions,
}

impl LoadOptions {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        LoadOptions {
            directory: directory.into(),
            clean: CleanOptions::default(),
        }
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions::new(".")
    }
}

/// A sheet or file as read, before cleaning.
pub(crate) struct RawTable {
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<Vec<CellValue>>,
}

static LOAD_CACHE: Lazy<Mutex<HashMap<[u8; 32], Arc<Dataset>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Loads the dataset registry from the configured directory.
///
/// Resolution order: the first `.xlsx` workbook wins; when none exists, or
/// the workbook yields none of the expected tables, delimited files matched
/// by name take over. Only total source absence or an unreadable source is
/// fatal.
pub fn load_dataset(options: &LoadOptions) -> Result<Arc<Dataset>, PilotageError> {
    let directory = options.directory.as_path();
    if let Some((path, bytes)) = discover_workbook(directory)? {
        let source_display = path.display().to_string();
        let key = fingerprint(&[(source_display.as_str(), bytes.as_slice())], options);
        if let Some(dataset) = cache_get(&key) {
            debug!(workbook = %source_display, "unchanged source, memoized dataset reused");
            return Ok(dataset);
        }
        let mut workbook = Workbook::from_bytes(&source_display, bytes)
            .map_err(PilotageError::from)
            .with_prefix(&source_display)?;
        let dataset = read_workbook_tables(&mut workbook, options)?;
        if !dataset.is_empty() {
            info!(workbook = %source_display, tables = dataset.len(), "workbook loaded");
            return Ok(cache_put(key, dataset));
        }
        warn!(workbook = %source_display, "workbook yields none of the expected tables, scanning delimited files");
        let files = discover_delimited(directory)?;
        if files.is_empty() {
            return Err(LoadError::NoTablesFound { path: source_display }.into());
        }
        return load_delimited_files(directory, files, options);
    }
    let files = discover_delimited(directory)?;
    if files.is_empty() {
        return Err(LoadError::NoSourceFound {
            directory: directory.display().to_string(),
        }
        .into());
    }
    load_delimited_files(directory, files, options)
}

/// First `.xlsx` workbook in the directory, with its content. Excel lock
/// files (`~$...`) are ignored.
fn discover_workbook(directory: &Path) -> Result<Option<(PathBuf, Vec<u8>)>, PilotageError> {
    let pattern = directory.join("*.xlsx").to_string_lossy().to_string();
    let mut paths: Vec<PathBuf> = glob(&pattern)?
        .filter_map(Result::ok)
        .filter(|path| {
            path.file_name()
                .map(|name| !name.to_string_lossy().starts_with("~$"))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();
    match paths.into_iter().next() {
        Some(path) => {
            let bytes = fs::read(&path)
                .map_err(PilotageError::from)
                .with_prefix(&path.display().to_string())?;
            Ok(Some((path, bytes)))
        }
        None => Ok(None),
    }
}

/// Delimited files whose stem designates a logical table, with their
/// content. Unmatched files are ignored.
fn discover_delimited(
    directory: &Path,
) -> Result<Vec<(LogicalName, PathBuf, Vec<u8>)>, PilotageError> {
    let mut files = Vec::new();
    for extension in ["*.csv", "*.txt"] {
        let pattern = directory.join(extension).to_string_lossy().to_string();
        let mut paths: Vec<PathBuf> = glob(&pattern)?.filter_map(Result::ok).collect();
        paths.sort();
        for path in paths {
            let Some(stem) = path.file_stem().map(|stem| stem.to_string_lossy().to_string())
            else {
                continue;
            };
            let Some(logical) = LogicalName::ALL.iter().copied().find(|logical| logical.matches(&stem))
            else {
                debug!(file = %path.display(), "file name designates no expected table");
                continue;
            };
            let bytes = fs::read(&path)
                .map_err(PilotageError::from)
                .with_prefix(&path.display().to_string())?;
            files.push((logical, path, bytes));
        }
    }
    Ok(files)
}

fn read_workbook_tables(
    workbook: &mut Workbook,
    options: &LoadOptions,
) -> Result<Dataset, PilotageError> {
    let mut dataset = Dataset::new(workbook.path());
    for logical in LogicalName::ALL {
        let Some(sheet) = workbook.resolve_sheet(logical) else {
            warn!(table = %logical, "sheet not found, section will have no data");
            continue;
        };
        let path = workbook.path().to_owned();
        let raw = workbook
            .read_sheet(&sheet)
            .map_err(PilotageError::from)
            .with_prefix(&path)?;
        if raw.headers.is_empty() {
            warn!(sheet = %sheet, "sheet is empty, section will have no data");
            continue;
        }
        let table = clean_table(&sheet, raw.headers, raw.rows, &options.clean);
        info!(table = %logical, sheet = %sheet, rows = table.row_count(), "table loaded");
        dataset.insert(logical, table);
    }
    Ok(dataset)
}

fn load_delimited_files(
    directory: &Path,
    files: Vec<(LogicalName, PathBuf, Vec<u8>)>,
    options: &LoadOptions,
) -> Result<Arc<Dataset>, PilotageError> {
    let parts: Vec<(&str, &[u8])> = files
        .iter()
        .map(|(_, path, bytes)| (path.to_str().unwrap_or_default(), bytes.as_slice()))
        .collect();
    let key = fingerprint(&parts, options);
    if let Some(dataset) = cache_get(&key) {
        debug!(directory = %directory.display(), "unchanged sources, memoized dataset reused");
        return Ok(dataset);
    }
    let mut dataset = Dataset::new(directory.display().to_string());
    for (logical, path, bytes) in &files {
        if dataset.contains(*logical) {
            warn!(file = %path.display(), table = %logical, "table already loaded from another file, skipping");
            continue;
        }
        let raw = delimited::read_delimited(bytes)
            .map_err(PilotageError::from)
            .with_prefix(&path.display().to_string())?;
        if raw.headers.is_empty() {
            warn!(file = %path.display(), "file is empty, section will have no data");
            continue;
        }
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();
        let table = clean_table(&name, raw.headers, raw.rows, &options.clean);
        info!(table = %logical, file = %path.display(), rows = table.row_count(), "table loaded");
        dataset.insert(*logical, table);
    }
    if dataset.is_empty() {
        return Err(LoadError::NoTablesFound {
            path: directory.display().to_string(),
        }
        .into());
    }
    Ok(cache_put(key, dataset))
}

/// Content fingerprint over source names, source bytes and the cleaning
/// options; the memo key of a load.
fn fingerprint(sources: &[(&str, &[u8])], options: &LoadOptions) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for (name, bytes) in sources {
        hasher.update(name.as_bytes());
        hasher.update([0u8]);
        hasher.update(bytes);
    }
    hasher.update(options.clean.year_placeholder.to_le_bytes());
    let keywords = &options.clean.keywords;
    for list in [
        &keywords.protected,
        &keywords.rate,
        &keywords.year,
        &keywords.month,
    ] {
        for keyword in list {
            hasher.update(keyword.as_bytes());
            hasher.update([1u8]);
        }
        hasher.update([2u8]);
    }
    hasher.finalize().into()
}

fn cache_get(key: &[u8; 32]) -> Option<Arc<Dataset>> {
    LOAD_CACHE.lock().expect("load cache").get(key).cloned()
}

fn cache_put(key: [u8; 32], dataset: Dataset) -> Arc<Dataset> {
    let dataset = Arc::new(dataset);
    LOAD_CACHE
        .lock()
        .expect("load cache")
        .insert(key, dataset.clone());
    dataset
}
