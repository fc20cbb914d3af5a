//! # Dataset Registry
//!
//! The seven logical tables the pipeline expects, the cleaned [`DataTable`]
//! type holding them, and the fiscal-year filter. Logical names are
//! independent of physical sheet/file naming; matching is case-insensitive
//! and tolerates renamed sources by substring containment.
pub mod table;
pub mod years;

use crate::dataset::table::DataTable;
use std::collections::BTreeMap;
use std::fmt::Display;

/// The logical datasets a source can provide. A missing table is not an
/// error; the section consuming it simply has no data.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogicalName {
    /// Year-to-date consolidated indicators
    Ytd,
    /// Monthly recruitment funnel and quality rates
    Recruitment,
    /// Global monthly absenteeism rate
    AbsenceGlobal,
    /// Absenteeism broken down by reason
    AbsenceByReason,
    /// Absenteeism broken down by service
    AbsenceByService,
    /// Sourcing channel KPIs
    Sourcing,
    /// Action-plan tracking
    ActionPlan,
}

impl LogicalName {
    /// All logical tables, in registry order.
    pub const ALL: [LogicalName; 7] = [
        LogicalName::Ytd,
        LogicalName::Recruitment,
        LogicalName::AbsenceGlobal,
        LogicalName::AbsenceByReason,
        LogicalName::AbsenceByService,
        LogicalName::Sourcing,
        LogicalName::ActionPlan,
    ];

    /// Expected sheet name in a consolidated workbook.
    pub const fn sheet_name(self) -> &'static str {
        match self {
            LogicalName::Ytd => "CONSOLIDATION_YTD",
            LogicalName::Recruitment => "Recrutement_Mensuel",
            LogicalName::AbsenceGlobal => "Absentéisme_Global_Mois",
            LogicalName::AbsenceByReason => "Absentéisme_Par_Motif",
            LogicalName::AbsenceByService => "Absentéisme_Par_Service",
            LogicalName::Sourcing => "KPI_Sourcing_Rendement",
            LogicalName::ActionPlan => "Suivi_Plan_Action",
        }
    }

    /// Lowercase fallback patterns for tolerant sheet and file-stem
    /// matching, with and without accents.
    pub(crate) const fn patterns(self) -> &'static [&'static str] {
        match self {
            LogicalName::Ytd => &["consolidation_ytd", "consolidation", "ytd"],
            LogicalName::Recruitment => &["recrutement_mensuel", "recrutement"],
            LogicalName::AbsenceGlobal => &["absentéisme_global", "absenteisme_global"],
            LogicalName::AbsenceByReason => {
                &["absentéisme_par_motif", "absenteisme_par_motif", "par_motif"]
            }
            LogicalName::AbsenceByService => {
                &["absentéisme_par_service", "absenteisme_par_service", "par_service"]
            }
            LogicalName::Sourcing => &["kpi_sourcing"],
            LogicalName::ActionPlan => &["suivi_plan_action", "plan_action"],
        }
    }

    /// Returns true if a sheet name or file stem designates this table.
    pub fn matches(self, candidate: &str) -> bool {
        let candidate = candidate.trim().to_lowercase();
        self.patterns().iter().any(|pattern| candidate.contains(pattern))
    }
}

impl Display for LogicalName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sheet_name())
    }
}

/// In-memory registry of cleaned tables keyed by logical name, rebuilt
/// fresh on every load.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    /// Description of where the data came from
    pub source: String,
    tables: BTreeMap<LogicalName, DataTable>,
}

impl Dataset {
    /// Creates an empty registry for the given source description.
    pub fn new(source: impl Into<String>) -> Self {
        Dataset {
            source: source.into(),
            tables: BTreeMap::new(),
        }
    }

    /// Registers a cleaned table under its logical name.
    pub fn insert(&mut self, logical: LogicalName, table: DataTable) {
        self.tables.insert(logical, table);
    }

    /// Looks up a logical table. Absence means "no data for this section".
    pub fn get(&self, logical: LogicalName) -> Option<&DataTable> {
        self.tables.get(&logical)
    }

    /// Returns true if the logical table was loaded.
    pub fn contains(&self, logical: LogicalName) -> bool {
        self.tables.contains_key(&logical)
    }

    /// Iterates loaded tables in registry order.
    pub fn tables(&self) -> impl Iterator<Item = (LogicalName, &DataTable)> {
        self.tables.iter().map(|(logical, table)| (*logical, table))
    }

    /// Number of loaded tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true when no logical table was loaded at all.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
