//! Error types for simulation requests.

use thiserror::Error;

use crate::models::TransitionError;
use crate::validation::ValidationError;

/// Errors returned before (or instead of) running a simulation.
///
/// A request that fails never yields a partial result.
#[derive(Error, Debug)]
pub enum SimulationError {
    /// The request is malformed or contradictory.
    #[error("invalid simulation request: {}", summarize(.0))]
    Validation(Vec<ValidationError>),

    /// The policy identifier is not registered.
    #[error("unknown algorithm '{0}'")]
    InvalidAlgorithm(String),

    /// The engine attempted an illegal task state change.
    #[error("engine invariant violated: {0}")]
    Transition(#[from] TransitionError),

    /// No built-in scenario with that id.
    #[error("unknown scenario '{0}'")]
    UnknownScenario(String),

    /// Reading or writing a payload failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A payload could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A CSV export failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl SimulationError {
    /// Validation problems carried by this error (empty for other kinds).
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            SimulationError::Validation(errors) => errors,
            _ => &[],
        }
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_display_joins_messages() {
        let err = SimulationError::Validation(vec![
            ValidationError::new(
                ValidationErrorKind::NoMachines,
                "num_machines must be at least 1",
            ),
            ValidationError::new(ValidationErrorKind::EmptyTaskSet, "task set is empty"),
        ]);
        assert_eq!(
            err.to_string(),
            "invalid simulation request: num_machines must be at least 1; task set is empty"
        );
        assert_eq!(err.validation_errors().len(), 2);
    }

    #[test]
    fn test_invalid_algorithm_display() {
        let err = SimulationError::InvalidAlgorithm("RR".into());
        assert_eq!(err.to_string(), "unknown algorithm 'RR'");
        assert!(err.validation_errors().is_empty());
    }
}
