//! Random portfolio generation for benchmarks and manual exploration.
//!
//! Every generated record passes validation, so generated portfolios can
//! be fed straight into the rankers, the simulator or an `InMemoryStore`.

use crate::core::account::{Account, AccountType};
use crate::core::cashflow::{CashflowEvent, CashflowKind};
use crate::core::opportunity::Opportunity;
use crate::store::InMemoryStore;
use chrono::{Duration, NaiveDate};
use rand::Rng;

const CATEGORIES: [&str; 4] = ["bonus", "gig", "arbitrage", "resale"];

/// Configuration for generating a random portfolio.
#[derive(Debug, Clone)]
pub struct PortfolioConfig {
    pub opportunity_count: usize,
    pub account_count: usize,
    pub cashflow_count: usize,
    /// Cashflow dates are drawn from `[start_date, start_date + horizon_days)`.
    pub start_date: NaiveDate,
    pub horizon_days: i64,
    /// Largest initial investment, in minor units.
    pub max_investment: i64,
    /// Largest available credit per account, in minor units.
    pub max_credit: i64,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            opportunity_count: 10,
            account_count: 3,
            cashflow_count: 12,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
            horizon_days: 90,
            max_investment: 500_000,
            max_credit: 1_000_000,
        }
    }
}

/// Generate a random but valid portfolio.
pub fn generate_random_portfolio(config: &PortfolioConfig) -> InMemoryStore {
    let mut rng = rand::thread_rng();
    let mut store = InMemoryStore::new();

    for i in 0..config.opportunity_count {
        let investment = if rng.gen_bool(0.2) {
            0
        } else {
            rng.gen_range(0..=config.max_investment.max(1))
        };
        let markup = rng.gen_range(0.9..2.0);
        let expected_return = ((investment.max(1_000) as f64) * markup).round() as i64;
        let category = CATEGORIES[rng.gen_range(0..CATEGORIES.len())];

        let mut opp = Opportunity::new(
            (i + 1) as i64,
            format!("OPP-{:03}", i + 1),
            investment,
            expected_return,
            rng.gen_range(1..=config.horizon_days.max(1)),
        )
        .with_effort(rng.gen_range(0.0..40.0_f64).round(), rng.gen_range(10.0..150.0_f64).round())
        .with_risk(rng.gen_range(0.0..=1.0), rng.gen_range(0.0..=1.0))
        .with_category(category)
        .with_ice(rng.gen_range(0..=10), rng.gen_range(0..=10), rng.gen_range(0..=10));
        if rng.gen_bool(0.25) {
            opp = opp.recurring();
        }
        store.add_opportunity(opp);
    }

    for i in 0..config.account_count {
        let account_type = if rng.gen_bool(0.75) {
            AccountType::CreditCard
        } else {
            AccountType::LineOfCredit
        };
        let apr = (rng.gen_range(0.0..36.0_f64) * 100.0).round() / 100.0;
        store.add_account(Account::new(
            (i + 1) as i64,
            format!("ACCT-{:03}", i + 1),
            account_type,
            rng.gen_range(0..=config.max_credit.max(0)),
            apr,
        ));
    }

    for _ in 0..config.cashflow_count {
        let kind = if rng.gen_bool(0.5) {
            CashflowKind::Inflow
        } else {
            CashflowKind::Outflow
        };
        let offset = rng.gen_range(0..config.horizon_days.max(1));
        store.add_cashflow(CashflowEvent::new(
            kind,
            rng.gen_range(1..=config.max_investment.max(1)),
            config.start_date + Duration::days(offset),
        ));
    }

    store
}
