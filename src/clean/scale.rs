use crate::clean::columns::ColumnRole;
use crate::clean::value::CellValue;
use crate::dataset::table::DataTable;

/// Ratio window: a rate column whose maximum lies inside it is assumed to be
/// stored as a fraction (0.88 meaning 88%) and is multiplied by 100.
const RATIO_LOWER_BOUND: f64 = -1.5;
const RATIO_UPPER_BOUND: f64 = 1.5;

/// Corrects the percentage scale of every rate column, in place.
///
/// The decision is column-level, not cell-level: one factor applies
/// uniformly based on the column's maximum finite value. A maximum of
/// exactly zero, or a column without finite values, is left unchanged.
/// Re-running the pass on a rescaled column is a no-op since its maximum
/// has left the ratio window.
pub(crate) fn rescale_rate_columns(table: &mut DataTable) {
    for index in 0..table.columns.len() {
        if table.columns[index].role != ColumnRole::Rate {
            continue;
        }
        let maximum = table
            .rows
            .iter()
            .filter_map(|row| row.get(index))
            .filter_map(CellValue::as_number)
            .filter(|value| value.is_finite())
            .fold(None::<f64>, |maximum, value| {
                Some(maximum.map_or(value, |current| current.max(value)))
            });
        let Some(maximum) = maximum else { continue };
        if maximum == 0.0 || !(RATIO_LOWER_BOUND..=RATIO_UPPER_BOUND).contains(&maximum) {
            continue;
        }
        for row in &mut table.rows {
            if let Some(CellValue::Number(value)) = row.get_mut(index) {
                *value *= 100.0;
            }
        }
        table.columns[index].stats.rescaled = true;
    }
}
