/// Role assigned to a column from its header name.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColumnRole {
    /// Identifier/free-text column, never numerically converted
    Protected,
    /// Percentage/ratio metric, subject to scale correction
    Rate,
    /// Fiscal year column, coerced to integers
    Year,
    /// Month column, used for period ordering
    Month,
    /// Plain numeric candidate
    Plain,
}

/// Keyword table driving column classification.
///
/// Input files vary in exact column sets release to release; matching header
/// names against keywords tolerates renamed, added and missing columns
/// without failing the load. All keywords are lowercase.
#[derive(Clone, Debug)]
pub struct Keywords {
    /// Identifier/free-text column names, matched as a prefix of the header
    pub protected: Vec<String>,
    /// Rate/percentage markers, matched as a substring of the header
    pub rate: Vec<String>,
    /// Year column names, matched whole
    pub year: Vec<String>,
    /// Month column names, matched whole
    pub month: Vec<String>,
}

impl Default for Keywords {
    fn default() -> Self {
        Keywords {
            protected: to_owned(&[
                "indicateur",
                "source",
                "service",
                "motif",
                "rôle",
                "role",
                "catégorie",
                "categorie",
                "section",
            ]),
            rate: to_owned(&[
                "taux",
                "%",
                "atteinte",
                "rendement",
                "validation",
                "service",
                "transfo",
                "impact",
                "ytd",
            ]),
            year: to_owned(&["année", "annee", "year"]),
            month: to_owned(&["mois"]),
        }
    }
}

impl Keywords {
    /// Classifies a column by its header name (trimmed, case-insensitive).
    ///
    /// Precedence is year > month > protected > rate > plain. Protected
    /// keywords match as a prefix so that `Service` stays textual while
    /// `Taux Service` and `Impact Motif (%)` remain rate columns.
    pub fn classify(&self, column_name: &str) -> ColumnRole {
        let name = column_name.trim().to_lowercase();
        if self.year.iter().any(|keyword| name == *keyword) {
            ColumnRole::Year
        } else if self.month.iter().any(|keyword| name == *keyword) {
            ColumnRole::Month
        } else if self.protected.iter().any(|keyword| name.starts_with(keyword.as_str())) {
            ColumnRole::Protected
        } else if self.rate.iter().any(|keyword| name.contains(keyword.as_str())) {
            ColumnRole::Rate
        } else {
            ColumnRole::Plain
        }
    }
}

fn to_owned(keywords: &[&str]) -> Vec<String> {
    keywords.iter().map(|keyword| (*keyword).to_owned()).collect()
}
