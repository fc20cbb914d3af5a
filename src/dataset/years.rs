use crate::clean::value::CellValue;
use crate::dataset::table::DataTable;
use crate::dataset::Dataset;
use std::collections::BTreeSet;
use std::fmt::Display;

/// Years at or below this value are placeholders or noise and never appear
/// in the selectable set. The rows carrying them stay in their tables.
pub const YEAR_FLOOR: i32 = 2020;

/// The global period selection scoping every section.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum YearSelection {
    /// A single fiscal year
    Year(i32),
    /// All periods, bypassing the filter
    All,
}

impl Display for YearSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YearSelection::Year(year) => write!(f, "{}", year),
            YearSelection::All => write!(f, "Vue Globale"),
        }
    }
}

/// Distinct valid fiscal years across every loaded table, most recent first.
pub fn available_years(dataset: &Dataset) -> Vec<i32> {
    let mut years = BTreeSet::new();
    for (_, table) in dataset.tables() {
        let Some(index) = table.year_column() else { continue };
        for cell in table.values(index) {
            if let CellValue::Number(value) = cell {
                let year = value.trunc() as i32;
                if year > YEAR_FLOOR {
                    years.insert(year);
                }
            }
        }
    }
    years.into_iter().rev().collect()
}

/// The selector options: available years plus the trailing all-periods
/// entry. The first option is the most recent year when one exists.
pub fn year_options(dataset: &Dataset) -> Vec<YearSelection> {
    let mut options: Vec<YearSelection> = available_years(dataset)
        .into_iter()
        .map(YearSelection::Year)
        .collect();
    options.push(YearSelection::All);
    options
}

/// Projects a table onto the selected year.
///
/// Pure and non-mutating: rows whose year cell equals the selection are
/// copied out; columns and cell types are untouched. Tables without a year
/// column, and the all-periods selection, pass through row for row.
pub fn filter_by_year(table: &DataTable, selection: YearSelection) -> DataTable {
    let (year, index) = match (selection, table.year_column()) {
        (YearSelection::Year(year), Some(index)) => (year, index),
        _ => return table.clone(),
    };
    DataTable {
        name: table.name.clone(),
        columns: table.columns.clone(),
        rows: table
            .rows
            .iter()
            .filter(|row| {
                matches!(row.get(index), Some(CellValue::Number(value)) if value.trunc() as i32 == year)
            })
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::{clean_table, CleanOptions};

    fn dataset() -> Dataset {
        let headers = vec!["Mois".to_owned(), "Année".to_owned(), "Taux Absentéisme".to_owned()];
        let rows = vec![
            vec![
                CellValue::Number(1.0),
                CellValue::Number(2025.0),
                CellValue::Number(4.2),
            ],
            vec![
                CellValue::Number(2.0),
                CellValue::Number(2024.0),
                CellValue::Number(5.1),
            ],
            vec![
                CellValue::Number(3.0),
                CellValue::Missing,
                CellValue::Number(3.9),
            ],
        ];
        let table = clean_table(
            "Absentéisme_Global_Mois",
            headers,
            rows,
            &CleanOptions::default(),
        );
        let mut dataset = Dataset::new("test");
        dataset.insert(crate::dataset::LogicalName::AbsenceGlobal, table);
        dataset
    }

    #[test]
    fn years_are_distinct_valid_and_descending() {
        let years = available_years(&dataset());
        // The placeholder year 0 from the missing cell is excluded.
        assert_eq!(years, vec![2025, 2024]);
    }

    #[test]
    fn options_end_with_all_periods() {
        let options = year_options(&dataset());
        assert_eq!(
            options,
            vec![
                YearSelection::Year(2025),
                YearSelection::Year(2024),
                YearSelection::All
            ]
        );
        assert_eq!(options.last().unwrap().to_string(), "Vue Globale");
    }

    #[test]
    fn filtering_keeps_only_the_selected_year() {
        let dataset = dataset();
        let table = dataset.get(crate::dataset::LogicalName::AbsenceGlobal).unwrap();
        let filtered = filter_by_year(table, YearSelection::Year(2025));
        assert_eq!(filtered.row_count(), 1);
        let index = filtered.year_column().unwrap();
        for row in &filtered.rows {
            assert_eq!(row[index], CellValue::Number(2025.0));
        }
    }

    #[test]
    fn all_periods_returns_every_row() {
        let dataset = dataset();
        let table = dataset.get(crate::dataset::LogicalName::AbsenceGlobal).unwrap();
        let filtered = filter_by_year(table, YearSelection::All);
        assert_eq!(filtered.row_count(), table.row_count());
    }

    #[test]
    fn tables_without_year_column_pass_through() {
        let table = clean_table(
            "Absentéisme_Par_Service",
            vec!["Service".to_owned(), "Taux Absentéisme".to_owned()],
            vec![vec![
                CellValue::Text("Logistique".to_owned()),
                CellValue::Number(3.1),
            ]],
            &CleanOptions::default(),
        );
        let filtered = filter_by_year(&table, YearSelection::Year(2025));
        assert_eq!(filtered.row_count(), 1);
    }
}
