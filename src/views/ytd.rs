use crate::clean::value::CellValue;
use crate::dataset::table::DataTable;
use crate::views::{require_column, ViewError};

/// One consolidated indicator row, ready for a metric tile.
#[derive(Clone, Debug, PartialEq)]
pub struct YtdMetric {
    /// Indicator label
    pub indicator: String,
    /// Cleaned value; numeric for percentage indicators, text otherwise
    pub value: CellValue,
    /// Fiscal year of the row, for all-periods labeling
    pub year: Option<i32>,
}

/// Extracts the YTD metric rows, most recent year first.
pub fn ytd_metrics(table: &DataTable) -> Result<Vec<YtdMetric>, ViewError> {
    let indicator = require_column(table, "indicateur")?;
    let value = require_column(table, "valeur")?;
    let year = table.year_column();
    let mut metrics: Vec<YtdMetric> = table
        .rows
        .iter()
        .map(|row| YtdMetric {
            indicator: row[indicator].to_string(),
            value: row[value].clone(),
            year: year.and_then(|index| row[index].as_number()).map(|value| value as i32),
        })
        .collect();
    metrics.sort_by(|left, right| right.year.cmp(&left.year));
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::{clean_table, CleanOptions};

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_owned())
    }

    #[test]
    fn metrics_come_out_cleaned_and_most_recent_first() {
        let table = clean_table(
            "CONSOLIDATION_YTD",
            vec![
                "Indicateur".to_owned(),
                "Valeur YTD".to_owned(),
                "Année".to_owned(),
            ],
            vec![
                vec![text("Taux Service"), text("0,88"), text("2024")],
                vec![text("Taux Transfo"), text("0,92"), text("2025")],
            ],
            &CleanOptions::default(),
        );
        let metrics = ytd_metrics(&table).unwrap();
        assert_eq!(metrics[0].indicator, "Taux Transfo");
        assert_eq!(metrics[0].value, CellValue::Number(92.0));
        assert_eq!(metrics[0].year, Some(2025));
        assert_eq!(metrics[1].value, CellValue::Number(88.0));
    }

    #[test]
    fn missing_value_column_fails_only_this_section() {
        let table = clean_table(
            "CONSOLIDATION_YTD",
            vec!["Indicateur".to_owned(), "Année".to_owned()],
            vec![vec![text("Taux Service"), text("2025")]],
            &CleanOptions::default(),
        );
        let error = ytd_metrics(&table).unwrap_err();
        assert!(matches!(
            error,
            ViewError::MissingColumn { column, .. } if column == "valeur"
        ));
    }
}
