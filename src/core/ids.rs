use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an opportunity as assigned by the storage layer.
///
/// # Examples
///
/// ```
/// use opportunity_evaluator::core::ids::OpportunityId;
///
/// let a = OpportunityId::new(1);
/// let b = OpportunityId::from(2);
/// assert_ne!(a, b);
/// assert_eq!(a.to_string(), "1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpportunityId(i64);

impl OpportunityId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for OpportunityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for OpportunityId {
    fn from(id: i64) -> Self {
        Self::new(id)
    }
}

/// Identifier of a financial account (card, bank account, loan, credit line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(i64);

impl AccountId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for AccountId {
    fn from(id: i64) -> Self {
        Self::new(id)
    }
}
