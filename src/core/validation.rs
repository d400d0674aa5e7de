use chrono::NaiveDate;
use thiserror::Error;

/// Malformed or out-of-range input rejected at the record boundary.
///
/// These are never retried: the caller supplied a value the engine
/// cannot reason about and must correct it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyName { field: &'static str },
    #[error("turnaround_days must be positive, got {0}")]
    NonPositiveTurnaround(i64),
    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: &'static str, value: i64 },
    #[error("{field} must be positive, got {value}")]
    NonPositiveAmount { field: &'static str, value: f64 },
    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("end date {end} is before start date {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("simulation span of {days} days exceeds the maximum of {max} days")]
    SpanTooLong { days: i64, max: u32 },
    #[error("invalid value for {key}: {value}")]
    InvalidSetting { key: String, value: String },
}

/// Check that `value` lies in the closed interval `[min, max]`.
///
/// NaN never lies in any interval.
pub(crate) fn check_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ValidationError> {
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

pub(crate) fn check_non_negative(field: &'static str, value: i64) -> Result<(), ValidationError> {
    if value < 0 {
        return Err(ValidationError::NegativeAmount { field, value });
    }
    Ok(())
}
