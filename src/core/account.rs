use crate::core::ids::AccountId;
use crate::core::validation::{check_non_negative, check_range, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of financial account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    CreditCard,
    BankAccount,
    Loan,
    LineOfCredit,
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AccountType::CreditCard => "credit_card",
            AccountType::BankAccount => "bank_account",
            AccountType::Loan => "loan",
            AccountType::LineOfCredit => "line_of_credit",
        };
        f.write_str(s)
    }
}

/// A source of money or credit.
///
/// Only credit cards are drawn on by the float simulator; the other types
/// are carried so the storage layer can hand over a full account list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    #[serde(default)]
    pub credit_limit: i64,
    #[serde(default)]
    pub current_balance: i64,
    #[serde(default)]
    pub available_credit: i64,
    #[serde(default)]
    pub apr_percent: f64,
    #[serde(default)]
    pub statement_day: Option<u8>,
    #[serde(default)]
    pub due_day: Option<u8>,
}

impl Account {
    pub fn new(
        id: impl Into<AccountId>,
        name: impl Into<String>,
        account_type: AccountType,
        available_credit: i64,
        apr_percent: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            account_type,
            credit_limit: available_credit,
            current_balance: 0,
            available_credit,
            apr_percent,
            statement_day: None,
            due_day: None,
        }
    }

    /// Shorthand for a credit card whose limit equals its available credit.
    pub fn credit_card(
        id: impl Into<AccountId>,
        name: impl Into<String>,
        available_credit: i64,
        apr_percent: f64,
    ) -> Self {
        Self::new(id, name, AccountType::CreditCard, available_credit, apr_percent)
    }

    pub fn with_credit_limit(mut self, credit_limit: i64) -> Self {
        self.credit_limit = credit_limit;
        self
    }

    /// Whether the simulator may draw float from this account.
    pub fn is_float_source(&self) -> bool {
        self.account_type == AccountType::CreditCard
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_non_negative("credit_limit", self.credit_limit)?;
        check_non_negative("available_credit", self.available_credit)?;
        check_range("apr_percent", self.apr_percent, 0.0, 100.0)?;
        for (field, day) in [("statement_day", self.statement_day), ("due_day", self.due_day)] {
            if let Some(d) = day {
                check_range(field, f64::from(d), 1.0, 31.0)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_credit_cards_are_float_sources() {
        assert!(Account::credit_card(1, "Card", 1000, 18.0).is_float_source());
        let loan = Account::new(2, "Loan", AccountType::Loan, 1000, 6.0);
        assert!(!loan.is_float_source());
        let loc = Account::new(3, "LOC", AccountType::LineOfCredit, 1000, 9.0);
        assert!(!loc.is_float_source());
    }

    #[test]
    fn test_apr_bounds() {
        assert!(Account::credit_card(1, "Card", 0, 100.0).validate().is_ok());
        assert!(Account::credit_card(1, "Card", 0, 100.5).validate().is_err());
        assert!(Account::credit_card(1, "Card", 0, -1.0).validate().is_err());
    }

    #[test]
    fn test_negative_credit_rejected() {
        assert!(Account::credit_card(1, "Card", -1, 10.0).validate().is_err());
    }

    #[test]
    fn test_type_serializes_snake_case() {
        let acct = Account::credit_card(1, "Card", 500, 24.0);
        let json = serde_json::to_value(&acct).unwrap();
        assert_eq!(json["type"], "credit_card");

        let parsed: Account = serde_json::from_str(
            r#"{"id": 4, "type": "line_of_credit", "available_credit": 10, "apr_percent": 9.5}"#,
        )
        .unwrap();
        assert_eq!(parsed.account_type, AccountType::LineOfCredit);
    }
}
