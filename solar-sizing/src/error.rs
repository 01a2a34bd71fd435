use thiserror::Error;

/// Failure classes of the sizing and finance engines.
///
/// `MissingConfigData` and `InvalidInput` are recoverable: the calculation
/// pipeline substitutes a zero record and reports them as diagnostics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("{table} table has not been loaded")]
    TableNotLoaded { table: &'static str },

    #[error("missing {table} data for {key}")]
    MissingConfigData { table: &'static str, key: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("division by zero: {0}")]
    DivisionByZero(&'static str),

    #[error("IRR did not converge after {iterations} iterations")]
    NonConvergence { iterations: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CalcError {
    /// Whether the pipeline may continue with a zero value.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CalcError::MissingConfigData { .. } | CalcError::InvalidInput(_)
        )
    }
}

pub type CalcResult<T> = Result<T, CalcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classes() {
        assert!(
            CalcError::MissingConfigData {
                table: "tariff",
                key: "x".into()
            }
            .is_recoverable()
        );
        assert!(CalcError::InvalidInput("len".into()).is_recoverable());
        assert!(!CalcError::DivisionByZero("irradiance").is_recoverable());
        assert!(!CalcError::NonConvergence { iterations: 1000 }.is_recoverable());
        assert!(!CalcError::TableNotLoaded { table: "tariff" }.is_recoverable());
    }

    #[test]
    fn test_messages() {
        let err = CalcError::MissingConfigData {
            table: "tariff",
            key: "EEGSA / BTS / Peten".into(),
        };
        assert_eq!(err.to_string(), "missing tariff data for EEGSA / BTS / Peten");
    }
}
