//! Request-level entry points over a [`Store`].
//!
//! This is the layer an HTTP handler or the CLI talks to: it loads records,
//! enforces request-level limits and capability switches, and hands fully
//! materialized data to the pure engines.

use crate::config::Config;
use crate::core::account::Account;
use crate::core::ids::{AccountId, OpportunityId};
use crate::core::validation::ValidationError;
use crate::error::{EvaluatorError, Result};
use crate::scoring::composite::{CompositeRanker, RankedOpportunity, RankingQuery};
use crate::scoring::debug::MetricsDebug;
use crate::scoring::ice::{IceRanked, IceRanker, RankComparison};
use crate::scoring::metrics::ComputedMetrics;
use crate::simulation::float::{FloatSimulator, SimulationInput, SimulationResult};
use crate::store::Store;
use chrono::{Days, NaiveDate};
use log::info;
use serde::{Deserialize, Serialize};

/// Recommendations returned when the caller does not ask for a count.
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 10;
/// Upper bound on a recommendation request.
pub const MAX_RECOMMENDATION_LIMIT: usize = 100;

/// A request to simulate a set of stored opportunities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulateRequest {
    /// Starting cash in minor units.
    pub available_cash: i64,
    pub opportunity_ids: Vec<OpportunityId>,
    pub start_date: NaiveDate,
    /// Defaults to `start_date + default_simulation_days`.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Restrict float sources; every credit card is eligible when omitted.
    #[serde(default)]
    pub account_ids: Option<Vec<AccountId>>,
}

pub struct EvaluatorService<S> {
    store: S,
    config: Config,
}

impl<S: Store> EvaluatorService<S> {
    pub fn new(store: S, config: Config) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Top opportunities by composite score.
    pub fn recommendations(&self, query: &RankingQuery) -> Result<Vec<RankedOpportunity>> {
        let limit = query.limit.unwrap_or(DEFAULT_RECOMMENDATION_LIMIT);
        if limit == 0 || limit > MAX_RECOMMENDATION_LIMIT {
            return Err(ValidationError::OutOfRange {
                field: "limit",
                value: limit as f64,
                min: 1.0,
                max: MAX_RECOMMENDATION_LIMIT as f64,
            }
            .into());
        }
        let query = RankingQuery {
            category: query.category.clone(),
            limit: Some(limit),
        };
        Ok(CompositeRanker::rank_with(&self.store.opportunities()?, &query))
    }

    /// Raw metrics for every opportunity, or for one.
    pub fn computed_metrics(&self, id: Option<OpportunityId>) -> Result<Vec<ComputedMetrics>> {
        let opportunities = match id {
            Some(id) => {
                let found = self.store.opportunities_by_ids(&[id])?;
                if found.is_empty() {
                    return Err(EvaluatorError::not_found("opportunity", id));
                }
                found
            }
            None => self.store.opportunities()?,
        };
        Ok(opportunities
            .into_iter()
            .map(ComputedMetrics::from_opportunity)
            .collect())
    }

    /// Formula-level breakdown of one opportunity's score.
    pub fn metrics_debug(&self, id: OpportunityId) -> Result<MetricsDebug> {
        let opportunities = self.store.opportunities()?;
        let opportunity = opportunities
            .iter()
            .find(|o| o.id == id)
            .ok_or_else(|| EvaluatorError::not_found("opportunity", id))?;
        let ranked = CompositeRanker::rank(&opportunities);
        let row = ranked
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| EvaluatorError::not_found("ranked opportunity", id))?;
        Ok(MetricsDebug::new(opportunity, row))
    }

    /// Accounts known to the store.
    pub fn accounts(&self, ids: Option<&[AccountId]>) -> Result<Vec<Account>> {
        self.require(self.config.capabilities.accounts, "account management")?;
        self.store.accounts(ids)
    }

    /// All opportunities ranked by ICE score.
    pub fn ice_ranking(&self) -> Result<Vec<IceRanked>> {
        self.require(self.config.capabilities.ice_scoring, "ICE scoring")?;
        Ok(IceRanker::rank(&self.store.opportunities()?))
    }

    /// How far the ICE order diverges from the composite order.
    pub fn ice_vs_roi(&self) -> Result<RankComparison> {
        self.require(self.config.capabilities.ice_scoring, "ICE scoring")?;
        let opportunities = self.store.opportunities()?;
        let composite = CompositeRanker::rank(&opportunities);
        Ok(IceRanker::compare_with_roi(&opportunities, &composite))
    }

    /// Load the requested records and run the float simulation.
    pub fn simulate(&self, request: &SimulateRequest) -> Result<SimulationResult> {
        self.require(self.config.capabilities.simulation, "float simulation")?;

        if request.available_cash < 0 {
            return Err(ValidationError::NegativeAmount {
                field: "available_cash",
                value: request.available_cash,
            }
            .into());
        }

        let start_date = request.start_date;
        let end_date = match request.end_date {
            Some(end_date) => end_date,
            None => start_date
                .checked_add_days(Days::new(u64::from(self.config.default_simulation_days)))
                .ok_or(ValidationError::InvalidDateRange {
                    start: start_date,
                    end: NaiveDate::MAX,
                })?,
        };
        if end_date < start_date {
            return Err(ValidationError::InvalidDateRange {
                start: start_date,
                end: end_date,
            }
            .into());
        }
        let span = (end_date - start_date).num_days();
        if span > i64::from(self.config.max_simulation_days) {
            return Err(ValidationError::SpanTooLong {
                days: span,
                max: self.config.max_simulation_days,
            }
            .into());
        }

        let opportunities = self.store.opportunities_by_ids(&request.opportunity_ids)?;
        if let Some(missing) = request
            .opportunity_ids
            .iter()
            .find(|id| !opportunities.iter().any(|o| o.id == **id))
        {
            return Err(EvaluatorError::not_found("opportunity", missing));
        }

        let accounts = self.store.accounts(request.account_ids.as_deref())?;
        if accounts.is_empty() {
            return Err(EvaluatorError::NoFloatAccounts);
        }

        let cashflow_events = self.store.cashflow_events(start_date, end_date)?;

        info!(
            "simulating {} opportunities over {} .. {} with {} account(s)",
            opportunities.len(),
            start_date,
            end_date,
            accounts.len()
        );

        Ok(FloatSimulator::simulate(&SimulationInput {
            available_cash: request.available_cash,
            start_date,
            end_date,
            opportunities,
            accounts,
            cashflow_events,
        }))
    }

    fn require(&self, enabled: bool, capability: &'static str) -> Result<()> {
        if enabled {
            Ok(())
        } else {
            Err(EvaluatorError::CapabilityDisabled(capability))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::opportunity::Opportunity;
    use crate::store::InMemoryStore;
    use chrono::Duration;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn store() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        store.add_opportunity(Opportunity::new(1, "A", 50_000, 60_000, 10).with_category("gig"));
        store.add_opportunity(Opportunity::new(2, "B", 0, 3_000, 30).with_category("bonus"));
        store.add_account(Account::credit_card(1, "Card", 200_000, 24.0));
        store
    }

    fn request(ids: &[i64]) -> SimulateRequest {
        SimulateRequest {
            available_cash: 100_000,
            opportunity_ids: ids.iter().map(|&i| OpportunityId::new(i)).collect(),
            start_date: day(1, 1),
            end_date: Some(day(1, 31)),
            account_ids: None,
        }
    }

    #[test]
    fn test_simulation_requires_capability() {
        let service = EvaluatorService::new(store(), Config::default());
        let err = service.simulate(&request(&[1])).unwrap_err();
        assert!(matches!(err, EvaluatorError::CapabilityDisabled(_)));
        assert!(matches!(
            service.ice_ranking().unwrap_err(),
            EvaluatorError::CapabilityDisabled(_)
        ));
        assert!(service.accounts(None).is_err());
    }

    #[test]
    fn test_ranking_always_available() {
        let service = EvaluatorService::new(store(), Config::default());
        let ranked = service.recommendations(&RankingQuery::new()).unwrap();
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_recommendation_limit_bounds() {
        let service = EvaluatorService::new(store(), Config::default());
        assert!(service.recommendations(&RankingQuery::new().with_limit(0)).is_err());
        assert!(service.recommendations(&RankingQuery::new().with_limit(101)).is_err());
        let one = service.recommendations(&RankingQuery::new().with_limit(1)).unwrap();
        assert_eq!(one.len(), 1);
    }

    #[test]
    fn test_simulate_missing_opportunity() {
        let service = EvaluatorService::new(store(), Config::extended());
        let err = service.simulate(&request(&[1, 42])).unwrap_err();
        assert_eq!(err.to_string(), "opportunity 42 not found");
    }

    #[test]
    fn test_simulate_without_accounts() {
        let service = EvaluatorService::new(store(), Config::extended());
        let mut req = request(&[1]);
        req.account_ids = Some(vec![AccountId::new(77)]);
        assert!(matches!(
            service.simulate(&req).unwrap_err(),
            EvaluatorError::NoFloatAccounts
        ));
    }

    #[test]
    fn test_simulate_rejects_bad_window() {
        let service = EvaluatorService::new(store(), Config::extended());

        let mut backwards = request(&[1]);
        backwards.end_date = Some(day(1, 1) - Duration::days(1));
        assert!(matches!(
            service.simulate(&backwards).unwrap_err(),
            EvaluatorError::Validation(ValidationError::InvalidDateRange { .. })
        ));

        let mut too_long = request(&[1]);
        too_long.end_date = Some(day(1, 1) + Duration::days(400));
        assert!(matches!(
            service.simulate(&too_long).unwrap_err(),
            EvaluatorError::Validation(ValidationError::SpanTooLong { .. })
        ));

        let mut negative = request(&[1]);
        negative.available_cash = -1;
        assert!(service.simulate(&negative).is_err());
    }

    #[test]
    fn test_simulate_default_end_date() {
        let service = EvaluatorService::new(store(), Config::extended());
        let mut req = request(&[1]);
        req.end_date = None;
        let result = service.simulate(&req).unwrap();
        assert_eq!(result.input_snapshot.end_date, day(1, 1) + Duration::days(90));
        assert_eq!(result.timeline.len(), 91);
    }

    #[test]
    fn test_default_end_past_calendar_is_rejected() {
        let service = EvaluatorService::new(store(), Config::extended());
        let mut req = request(&[1]);
        req.start_date = NaiveDate::MAX;
        req.end_date = None;
        assert!(matches!(
            service.simulate(&req).unwrap_err(),
            EvaluatorError::Validation(ValidationError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_simulate_happy_path() {
        let service = EvaluatorService::new(store(), Config::extended());
        let result = service.simulate(&request(&[1, 2])).unwrap();
        assert!(result.success);
        assert!(result.float_usage.is_empty());
        assert_eq!(
            result.input_snapshot.opportunity_ids,
            vec![OpportunityId::new(1), OpportunityId::new(2)]
        );
    }

    #[test]
    fn test_metrics_debug_not_found() {
        let service = EvaluatorService::new(store(), Config::default());
        assert!(matches!(
            service.metrics_debug(OpportunityId::new(9)).unwrap_err(),
            EvaluatorError::NotFound { .. }
        ));
        let dbg = service.metrics_debug(OpportunityId::new(2)).unwrap();
        assert_eq!(dbg.profit_formula, "3000 - 0");
    }

    #[test]
    fn test_computed_metrics_single_and_all() {
        let service = EvaluatorService::new(store(), Config::default());
        assert_eq!(service.computed_metrics(None).unwrap().len(), 2);
        let one = service.computed_metrics(Some(OpportunityId::new(2))).unwrap();
        assert_eq!(one[0].metrics.profit, 3000.0);
        assert!(service.computed_metrics(Some(OpportunityId::new(5))).is_err());
    }
}
