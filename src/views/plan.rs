use crate::clean::value::CellValue;
use crate::dataset::table::DataTable;
use crate::views::{require_column, ViewError};

/// Marker identifying the single row carrying the overall program
/// completion, matched case-insensitively inside the category label.
const GLOBAL_MARKER: &str = "global";

/// Overall action-plan completion percentage for the gauge display.
///
/// Returns `None` when no row carries the global marker; all other rows are
/// detail rows with no special treatment.
pub fn global_completion(table: &DataTable) -> Result<Option<f64>, ViewError> {
    let category = table
        .find_column("catégorie")
        .or_else(|| table.find_column("section"))
        .ok_or_else(|| ViewError::MissingColumn {
            table: table.name.clone(),
            column: "Catégorie / Section".to_owned(),
        })?;
    let completion = require_column(table, "atteinte")?;
    Ok(table.rows.iter().find_map(|row| {
        let label = row[category].as_text()?;
        if label.to_lowercase().contains(GLOBAL_MARKER) {
            row[completion].as_number()
        } else {
            None
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::{clean_table, CleanOptions};

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_owned())
    }

    fn plan_table(rows: Vec<Vec<CellValue>>) -> DataTable {
        clean_table(
            "Suivi_Plan_Action",
            vec!["Catégorie / Section".to_owned(), "% Atteinte".to_owned()],
            rows,
            &CleanOptions::default(),
        )
    }

    #[test]
    fn global_row_feeds_the_gauge() {
        let table = plan_table(vec![
            vec![text("Recrutement"), text("0,40")],
            vec![text("Avancement GLOBAL"), text("0,75")],
            vec![text("Formation"), text("0,90")],
        ]);
        // The rate column max is 0.9, so the whole column was rescaled.
        assert_eq!(global_completion(&table).unwrap(), Some(75.0));
    }

    #[test]
    fn missing_global_row_is_not_an_error() {
        let table = plan_table(vec![vec![text("Recrutement"), text("40")]]);
        assert_eq!(global_completion(&table).unwrap(), None);
    }

    #[test]
    fn missing_completion_column_fails_only_this_section() {
        let table = clean_table(
            "Suivi_Plan_Action",
            vec!["Catégorie / Section".to_owned()],
            vec![vec![text("GLOBAL")]],
            &CleanOptions::default(),
        );
        let error = global_completion(&table).unwrap_err();
        assert!(matches!(error, ViewError::MissingColumn { .. }));
    }
}
