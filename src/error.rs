use crate::core::validation::ValidationError;
use thiserror::Error;

/// Errors surfaced to callers of the evaluator service.
///
/// Ordinary business conditions (an uncovered shortfall, an empty set to
/// normalize) are not errors; they are reported inside results.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("{0} is disabled in the current configuration")]
    CapabilityDisabled(&'static str),
    #[error("no accounts available for float")]
    NoFloatAccounts,
    #[error("storage error: {0}")]
    Storage(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EvaluatorError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        EvaluatorError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EvaluatorError>;
