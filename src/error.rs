use thiserror::Error;

/// Main error type for the pipeline.
/// Aggregates errors from the standard library, dependencies and internal
/// modules.
#[derive(Error, Debug)]
pub enum PilotageError {
    #[error("{0}")]
    WithContext(String),

    // Standard library errors
    #[error("{0}")]
    Io(#[from] std::io::Error),

    // Third-party library errors
    #[error("{0}")]
    Pattern(#[from] glob::PatternError),

    #[error("{0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("{0}")]
    Delimited(#[from] csv::Error),

    // Internal module errors
    #[error("{0}")]
    Load(#[from] crate::load::LoadError),

    #[error("{0}")]
    View(#[from] crate::views::ViewError),
}

pub trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, PilotageError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|error| PilotageError::WithContext(format!("{}: {}", message, error)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_prefix_prepends_the_source() {
        let result: Result<(), PilotageError> = Err(PilotageError::Load(
            crate::load::LoadError::NoTablesFound {
                path: "data.xlsx".to_owned(),
            },
        ));
        let message = result.with_prefix("loading").unwrap_err().to_string();
        assert!(message.starts_with("loading: "));
        assert!(message.contains("data.xlsx"));
    }
}
