use crate::clean::value::CellValue;
use crate::dataset::table::DataTable;
use std::collections::BTreeMap;
use tracing::warn;

/// Sourcing channel singled out for dedicated summary metrics, matched by
/// substring.
pub const TALENT_CENTER_KEYWORD: &str = "TALENT";

/// Summed recruitment funnel for one normalized channel name.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceAggregate {
    /// Channel name, case-folded and trimmed
    pub channel: String,
    /// Calls received
    pub calls: f64,
    /// Candidates validated after selection
    pub validated: f64,
    /// Candidates integrated/delegated
    pub integrated: f64,
}

impl SourceAggregate {
    fn new(channel: String) -> Self {
        SourceAggregate {
            channel,
            calls: 0.0,
            validated: 0.0,
            integrated: 0.0,
        }
    }

    /// Integration yield in percent; exactly zero when no call was
    /// received.
    pub fn yield_rate(&self) -> f64 {
        if self.calls > 0.0 {
            self.integrated / self.calls * 100.0
        } else {
            0.0
        }
    }
}

/// Groups the sourcing table by normalized channel and sums the funnel
/// counters, sorted by channel name.
///
/// Two schemas are recognized: the pre-aggregated one (calls/validated/
/// integrated columns) and a raw per-candidate one (one row per candidate
/// with a selection flag and a delegation count). Anything else yields an
/// empty aggregate rather than failing.
pub fn aggregate_sources(table: &DataTable) -> Vec<SourceAggregate> {
    let Some(channel) = table.find_column("source") else {
        warn!(table = %table.name, "no channel column, sourcing section will have no data");
        return Vec::new();
    };
    if let Some(calls) = table.find_column("appels") {
        let validated = table.find_column("valid");
        // Accent-less exports spell the column "Integres".
        let integrated = table
            .find_column("intégr")
            .or_else(|| table.find_column("integr"));
        aggregate_preaggregated(table, channel, calls, validated, integrated)
    } else if let Some(selection) = table
        .find_column("retenu sél")
        .or_else(|| table.find_column("retenu sel"))
    {
        let delegated = table
            .find_column("délégué")
            .or_else(|| table.find_column("delegue"));
        aggregate_candidates(table, channel, selection, delegated)
    } else {
        warn!(table = %table.name, "sourcing table matches no known schema, section will have no data");
        Vec::new()
    }
}

fn aggregate_preaggregated(
    table: &DataTable,
    channel: usize,
    calls: usize,
    validated: Option<usize>,
    integrated: Option<usize>,
) -> Vec<SourceAggregate> {
    let mut groups: BTreeMap<String, SourceAggregate> = BTreeMap::new();
    for row in &table.rows {
        let Some(name) = normalized_channel(&row[channel]) else { continue };
        let entry = groups
            .entry(name.clone())
            .or_insert_with(|| SourceAggregate::new(name));
        entry.calls += row[calls].as_number().unwrap_or(0.0);
        if let Some(index) = validated {
            entry.validated += row[index].as_number().unwrap_or(0.0);
        }
        if let Some(index) = integrated {
            entry.integrated += row[index].as_number().unwrap_or(0.0);
        }
    }
    groups.into_values().collect()
}

fn aggregate_candidates(
    table: &DataTable,
    channel: usize,
    selection: usize,
    delegated: Option<usize>,
) -> Vec<SourceAggregate> {
    let mut groups: BTreeMap<String, SourceAggregate> = BTreeMap::new();
    for row in &table.rows {
        let Some(name) = normalized_channel(&row[channel]) else { continue };
        let entry = groups
            .entry(name.clone())
            .or_insert_with(|| SourceAggregate::new(name));
        entry.calls += 1.0;
        if is_affirmative(&row[selection]) {
            entry.validated += 1.0;
        }
        if let Some(index) = delegated {
            entry.integrated += row[index].as_number().unwrap_or(0.0);
        }
    }
    groups.into_values().collect()
}

/// Case-folds and trims a channel cell so `Talent Center`, `TALENT CENTER `
/// and `talent center` collapse to one key.
fn normalized_channel(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Text(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_uppercase())
        }
        CellValue::Number(_) => Some(cell.to_string()),
        CellValue::Missing => None,
    }
}

fn is_affirmative(cell: &CellValue) -> bool {
    match cell {
        CellValue::Number(value) => *value != 0.0,
        CellValue::Text(text) => {
            let text = text.trim().to_lowercase();
            ["oui", "yes", "vrai", "true"]
                .iter()
                .any(|marker| text.contains(marker))
                || text == "x"
                || text == "1"
        }
        CellValue::Missing => false,
    }
}

/// Sums the aggregates whose channel contains the keyword. `None` when no
/// channel matches on the current period.
pub fn channel_focus(aggregates: &[SourceAggregate], keyword: &str) -> Option<SourceAggregate> {
    let keyword = keyword.trim().to_uppercase();
    let mut focus: Option<SourceAggregate> = None;
    for aggregate in aggregates.iter().filter(|aggregate| aggregate.channel.contains(&keyword)) {
        let entry = focus.get_or_insert_with(|| SourceAggregate::new(keyword.clone()));
        entry.calls += aggregate.calls;
        entry.validated += aggregate.validated;
        entry.integrated += aggregate.integrated;
    }
    focus
}

/// Top channels by integration count, calls received breaking ties,
/// truncated to `count`.
pub fn top_sources(aggregates: &[SourceAggregate], count: usize) -> Vec<SourceAggregate> {
    let mut ranked = aggregates.to_vec();
    ranked.sort_by(|left, right| {
        right
            .integrated
            .total_cmp(&left.integrated)
            .then(right.calls.total_cmp(&left.calls))
    });
    ranked.truncate(count);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::{clean_table, CleanOptions};

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_owned())
    }

    fn preaggregated_table(rows: Vec<Vec<CellValue>>) -> DataTable {
        clean_table(
            "KPI_Sourcing_Rendement",
            vec![
                "Source".to_owned(),
                "1. Appels Reçus".to_owned(),
                "2. Validés (Sél.)".to_owned(),
                "3. Intégrés (Délégués)".to_owned(),
            ],
            rows,
            &CleanOptions::default(),
        )
    }

    #[test]
    fn channel_names_collapse_to_one_key() {
        let table = preaggregated_table(vec![
            vec![text("Talent Center"), text("100"), text("40"), text("10")],
            vec![text("TALENT CENTER "), text("50"), text("20"), text("5")],
            vec![text("talent center"), text("25"), text("10"), text("2")],
        ]);
        let aggregates = aggregate_sources(&table);
        assert_eq!(aggregates.len(), 1);
        assert_eq!(aggregates[0].channel, "TALENT CENTER");
        assert_eq!(aggregates[0].calls, 175.0);
        assert_eq!(aggregates[0].validated, 70.0);
        assert_eq!(aggregates[0].integrated, 17.0);
    }

    #[test]
    fn aggregation_is_order_independent() {
        let rows = vec![
            vec![text("A"), text("10"), text("4"), text("1")],
            vec![text("B"), text("20"), text("8"), text("2")],
            vec![text("A"), text("30"), text("12"), text("3")],
        ];
        let mut reversed = rows.clone();
        reversed.reverse();
        let forward = aggregate_sources(&preaggregated_table(rows));
        let backward = aggregate_sources(&preaggregated_table(reversed));
        assert_eq!(forward, backward);
    }

    #[test]
    fn raw_candidate_schema_derives_the_funnel() {
        let table = clean_table(
            "KPI_Sourcing",
            vec![
                "Source".to_owned(),
                "Retenu Présel.".to_owned(),
                "Retenu Sél.".to_owned(),
                "Délégué".to_owned(),
            ],
            vec![
                vec![text("Talent Center"), text("Oui"), text("Oui"), text("1")],
                vec![text("Talent Center"), text("Oui"), text("Non"), text("0")],
                vec![text("Jobboard"), text("Non"), text("X"), text("1")],
            ],
            &CleanOptions::default(),
        );
        let aggregates = aggregate_sources(&table);
        assert_eq!(aggregates.len(), 2);
        let talent = aggregates.iter().find(|a| a.channel == "TALENT CENTER").unwrap();
        assert_eq!(talent.calls, 2.0);
        assert_eq!(talent.validated, 1.0);
        assert_eq!(talent.integrated, 1.0);
        let jobboard = aggregates.iter().find(|a| a.channel == "JOBBOARD").unwrap();
        assert_eq!(jobboard.calls, 1.0);
        assert_eq!(jobboard.validated, 1.0);
    }

    #[test]
    fn unrecognized_schema_yields_an_empty_aggregate() {
        let table = clean_table(
            "KPI_Sourcing",
            vec!["Source".to_owned(), "Commentaire".to_owned()],
            vec![vec![text("Talent Center"), text("ras")]],
            &CleanOptions::default(),
        );
        assert!(aggregate_sources(&table).is_empty());
    }

    #[test]
    fn zero_calls_yield_zero_rate() {
        let aggregate = SourceAggregate {
            channel: "X".to_owned(),
            calls: 0.0,
            validated: 0.0,
            integrated: 7.0,
        };
        assert_eq!(aggregate.yield_rate(), 0.0);
    }

    #[test]
    fn talent_center_focus_sums_matching_channels() {
        let table = preaggregated_table(vec![
            vec![text("Talent Center Lyon"), text("100"), text("40"), text("10")],
            vec![text("TALENT CENTER PARIS"), text("50"), text("20"), text("5")],
            vec![text("Jobboard"), text("200"), text("30"), text("8")],
        ]);
        let aggregates = aggregate_sources(&table);
        let focus = channel_focus(&aggregates, TALENT_CENTER_KEYWORD).unwrap();
        assert_eq!(focus.calls, 150.0);
        assert_eq!(focus.integrated, 15.0);
        assert_eq!(focus.yield_rate(), 10.0);

        assert!(channel_focus(&aggregates, "AGENCE").is_none());
    }

    #[test]
    fn ranking_breaks_integration_ties_on_calls() {
        let aggregates = vec![
            SourceAggregate {
                channel: "A".to_owned(),
                calls: 10.0,
                validated: 0.0,
                integrated: 5.0,
            },
            SourceAggregate {
                channel: "B".to_owned(),
                calls: 20.0,
                validated: 0.0,
                integrated: 5.0,
            },
            SourceAggregate {
                channel: "C".to_owned(),
                calls: 1.0,
                validated: 0.0,
                integrated: 8.0,
            },
        ];
        let top = top_sources(&aggregates, 5);
        let channels: Vec<&str> = top.iter().map(|a| a.channel.as_str()).collect();
        assert_eq!(channels, vec!["C", "B", "A"]);

        assert_eq!(top_sources(&aggregates, 2).len(), 2);
    }
}
