use crate::core::ids::AccountId;
use crate::core::validation::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a scheduled cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashflowKind {
    Inflow,
    Outflow,
}

impl fmt::Display for CashflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CashflowKind::Inflow => f.write_str("inflow"),
            CashflowKind::Outflow => f.write_str("outflow"),
        }
    }
}

/// A dated inflow or outflow such as a paycheck or a rent payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowEvent {
    pub amount: i64,
    pub kind: CashflowKind,
    pub date: NaiveDate,
    #[serde(default)]
    pub account_id: Option<AccountId>,
    #[serde(default)]
    pub description: Option<String>,
}

impl CashflowEvent {
    pub fn new(kind: CashflowKind, amount: i64, date: NaiveDate) -> Self {
        Self {
            amount,
            kind,
            date,
            account_id: None,
            description: None,
        }
    }

    pub fn inflow(amount: i64, date: NaiveDate) -> Self {
        Self::new(CashflowKind::Inflow, amount, date)
    }

    pub fn outflow(amount: i64, date: NaiveDate) -> Self {
        Self::new(CashflowKind::Outflow, amount, date)
    }

    pub fn with_account(mut self, account_id: impl Into<AccountId>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether the event falls inside the inclusive range `[start, end]`.
    pub fn within(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.date && self.date <= end
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount <= 0 {
            return Err(ValidationError::NonPositiveAmount {
                field: "amount",
                value: self.amount as f64,
            });
        }
        Ok(())
    }
}
