//! Read-only access to persisted records.
//!
//! The engines never perform I/O. Callers fetch everything they need
//! through a [`Store`] first and then hand the materialized records over.

use crate::core::account::Account;
use crate::core::cashflow::CashflowEvent;
use crate::core::ids::{AccountId, OpportunityId};
use crate::core::opportunity::Opportunity;
use crate::core::validation::ValidationError;
use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Storage collaborator interface.
pub trait Store {
    /// Every opportunity, in storage order.
    fn opportunities(&self) -> Result<Vec<Opportunity>>;

    /// Opportunities with the given ids. Missing ids are silently skipped;
    /// the caller decides whether that is an error.
    fn opportunities_by_ids(&self, ids: &[OpportunityId]) -> Result<Vec<Opportunity>>;

    /// Accounts with the given ids, or every credit card when `ids` is `None`.
    fn accounts(&self, ids: Option<&[AccountId]>) -> Result<Vec<Account>>;

    /// Cashflow events dated within `[start, end]`, ordered by date.
    fn cashflow_events(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<CashflowEvent>>;
}

/// A store backed by vectors, loadable from a portfolio JSON file:
///
/// ```json
/// { "opportunities": [...], "accounts": [...], "cashflow_events": [...] }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryStore {
    #[serde(default)]
    opportunities: Vec<Opportunity>,
    #[serde(default)]
    accounts: Vec<Account>,
    #[serde(default)]
    cashflow_events: Vec<CashflowEvent>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a portfolio document.
    pub fn from_json(json: &str) -> Result<Self> {
        let store: InMemoryStore = serde_json::from_str(json)?;
        store.validate()?;
        Ok(store)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn add_opportunity(&mut self, opportunity: Opportunity) {
        self.opportunities.push(opportunity);
    }

    pub fn add_account(&mut self, account: Account) {
        self.accounts.push(account);
    }

    pub fn add_cashflow(&mut self, event: CashflowEvent) {
        self.cashflow_events.push(event);
    }

    pub fn opportunities_slice(&self) -> &[Opportunity] {
        &self.opportunities
    }

    pub fn accounts_slice(&self) -> &[Account] {
        &self.accounts
    }

    pub fn cashflows_slice(&self) -> &[CashflowEvent] {
        &self.cashflow_events
    }

    /// Check every record held by the store.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        for opp in &self.opportunities {
            opp.validate()?;
        }
        for account in &self.accounts {
            account.validate()?;
        }
        for event in &self.cashflow_events {
            event.validate()?;
        }
        Ok(())
    }
}

impl Store for InMemoryStore {
    fn opportunities(&self) -> Result<Vec<Opportunity>> {
        Ok(self.opportunities.clone())
    }

    fn opportunities_by_ids(&self, ids: &[OpportunityId]) -> Result<Vec<Opportunity>> {
        Ok(self
            .opportunities
            .iter()
            .filter(|o| ids.contains(&o.id))
            .cloned()
            .collect())
    }

    fn accounts(&self, ids: Option<&[AccountId]>) -> Result<Vec<Account>> {
        let selected = self.accounts.iter().filter(|a| match ids {
            Some(ids) if !ids.is_empty() => ids.contains(&a.id),
            _ => a.is_float_source(),
        });
        Ok(selected.cloned().collect())
    }

    fn cashflow_events(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<CashflowEvent>> {
        let mut events: Vec<CashflowEvent> = self
            .cashflow_events
            .iter()
            .filter(|e| e.within(start, end))
            .cloned()
            .collect();
        events.sort_by_key(|e| e.date);
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::account::AccountType;
    use crate::error::EvaluatorError;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn sample_store() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        store.add_opportunity(Opportunity::new(1, "A", 100, 200, 10));
        store.add_opportunity(Opportunity::new(2, "B", 100, 300, 20));
        store.add_account(Account::credit_card(1, "Card", 1000, 20.0));
        store.add_account(Account::new(2, "Checking", AccountType::BankAccount, 0, 0.0));
        store.add_cashflow(CashflowEvent::inflow(50, day(20)));
        store.add_cashflow(CashflowEvent::outflow(70, day(5)));
        store.add_cashflow(CashflowEvent::outflow(90, day(31)));
        store
    }

    #[test]
    fn test_opportunities_by_ids_skips_missing() {
        let store = sample_store();
        let found = store
            .opportunities_by_ids(&[OpportunityId::new(2), OpportunityId::new(99)])
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "B");
    }

    #[test]
    fn test_accounts_default_to_credit_cards() {
        let store = sample_store();
        let all_cards = store.accounts(None).unwrap();
        assert_eq!(all_cards.len(), 1);
        assert_eq!(all_cards[0].id, AccountId::new(1));

        let explicit = store.accounts(Some(&[AccountId::new(2)])).unwrap();
        assert_eq!(explicit.len(), 1);
        assert_eq!(explicit[0].account_type, AccountType::BankAccount);
    }

    #[test]
    fn test_cashflows_in_range_sorted() {
        let store = sample_store();
        let events = store.cashflow_events(day(1), day(30)).unwrap();
        let dates: Vec<NaiveDate> = events.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![day(5), day(20)]);
    }

    #[test]
    fn test_from_json_validates_records() {
        let json = r#"{
            "opportunities": [
                {"id": 1, "name": "Bad", "expected_return": 10, "turnaround_days": 0}
            ]
        }"#;
        let err = InMemoryStore::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            EvaluatorError::Validation(ValidationError::NonPositiveTurnaround(0))
        ));
    }

    #[test]
    fn test_from_json_round_trip() {
        let store = sample_store();
        let json = serde_json::to_string(&store).unwrap();
        let loaded = InMemoryStore::from_json(&json).unwrap();
        assert_eq!(loaded.opportunities_slice().len(), 2);
        assert_eq!(loaded.cashflows_slice().len(), 3);
    }
}
