use crate::clean::columns::ColumnRole;
use crate::clean::value::{CellValue, ParseStats};

/// A column of a cleaned table: trimmed name, classified role and cleaning
/// diagnostics.
#[derive(Clone, Debug)]
pub struct Column {
    /// Column name from the header row, surrounding whitespace removed
    pub name: String,
    /// Role assigned by the column classifier
    pub role: ColumnRole,
    /// Per-column parse statistics
    pub stats: ParseStats,
}

/// A cleaned dataset: ordered columns and ordered rows of normalized cells.
///
/// Every row holds exactly one cell per column; short source rows are padded
/// with missing cells during cleaning.
#[derive(Clone, Debug)]
pub struct DataTable {
    /// Sheet or file name the table was read from
    pub name: String,
    /// Ordered column list
    pub columns: Vec<Column>,
    /// Ordered row sequence
    pub rows: Vec<Vec<CellValue>>,
}

impl DataTable {
    /// Finds a column by name: trimmed and case-insensitive, exact match
    /// first, then substring containment.
    pub fn find_column(&self, needle: &str) -> Option<usize> {
        let needle = needle.trim().to_lowercase();
        self.columns
            .iter()
            .position(|column| column.name.trim().to_lowercase() == needle)
            .or_else(|| {
                self.columns
                    .iter()
                    .position(|column| column.name.trim().to_lowercase().contains(&needle))
            })
    }

    /// Finds the first column carrying the given role.
    pub fn column_by_role(&self, role: ColumnRole) -> Option<usize> {
        self.columns.iter().position(|column| column.role == role)
    }

    /// Index of the fiscal-year column, if the table has one.
    pub fn year_column(&self) -> Option<usize> {
        self.column_by_role(ColumnRole::Year)
    }

    /// Iterates the cells of one column, top to bottom.
    pub fn values(&self, index: usize) -> impl Iterator<Item = &CellValue> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table holds no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
