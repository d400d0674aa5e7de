//! Day-stepped liquidity simulation.
//!
//! Runs a set of opportunities against starting cash, scheduled cashflows
//! and revolving credit. Whenever an outflow exceeds the cash balance the
//! shortfall is drawn from the cheapest credit card that can absorb it in
//! full, and the draw accrues daily-compounded interest until the end of
//! the simulation window.
//!
//! Every call to [`FloatSimulator::simulate`] builds its event list,
//! float draws and warnings from scratch; nothing is kept between runs.

use crate::core::account::Account;
use crate::core::cashflow::CashflowEvent;
use crate::core::ids::{AccountId, OpportunityId};
use crate::core::opportunity::Opportunity;
use crate::finance::apr::{apr_to_daily_rate, compound_cost};
use crate::finance::money::{cost_to_major_units, to_major_units};
use crate::simulation::timeline::{build_timeline, TimelineEvent, TimelineEventKind};
use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything a simulation run consumes, fully materialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationInput {
    /// Starting cash in minor units.
    pub available_cash: i64,
    pub start_date: NaiveDate,
    /// Inclusive.
    pub end_date: NaiveDate,
    pub opportunities: Vec<Opportunity>,
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub cashflow_events: Vec<CashflowEvent>,
}

/// Echo of the inputs a result was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub available_cash: i64,
    pub opportunity_ids: Vec<OpportunityId>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub num_accounts: usize,
    pub num_cashflow_events: usize,
}

/// Balance at the close of one simulated day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySnapshot {
    pub date: NaiveDate,
    pub balance: i64,
    pub event_count: usize,
    pub descriptions: Vec<String>,
}

/// A single draw on a credit account and what it costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatUsage {
    pub account_id: AccountId,
    pub amount_used: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub apr_percent: f64,
    pub total_cost: f64,
}

impl FloatUsage {
    /// Price a draw of `amount` on `account` held from `start` to `end`.
    fn new(account: &Account, amount: i64, start: NaiveDate, end: NaiveDate) -> Self {
        let days = u32::try_from((end - start).num_days()).unwrap_or(0);
        let daily_rate = apr_to_daily_rate(account.apr_percent);
        Self {
            account_id: account.id,
            amount_used: amount,
            start_date: start,
            end_date: end,
            apr_percent: account.apr_percent,
            total_cost: compound_cost(amount as f64, daily_rate, days),
        }
    }
}

/// Outcome of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub input_snapshot: InputSnapshot,
    pub timeline: Vec<DailySnapshot>,
    pub float_usage: Vec<FloatUsage>,
    pub total_apr_cost: f64,
    pub projected_net_profit: f64,
    pub warnings: Vec<String>,
    pub success: bool,
}

impl SimulationResult {
    /// Balance after the last simulated day, if any day was simulated.
    pub fn final_balance(&self) -> Option<i64> {
        self.timeline.last().map(|s| s.balance)
    }

    /// Total principal drawn from credit across the run.
    pub fn total_float_drawn(&self) -> i64 {
        self.float_usage
            .iter()
            .fold(0i64, |total, f| total.saturating_add(f.amount_used))
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snap = &self.input_snapshot;
        writeln!(f, "=== Float Simulation ===")?;
        writeln!(f, "Window:          {} .. {}", snap.start_date, snap.end_date)?;
        writeln!(f, "Starting cash:   ${}", to_major_units(snap.available_cash))?;
        writeln!(f, "Opportunities:   {}", snap.opportunity_ids.len())?;
        if let Some(balance) = self.final_balance() {
            writeln!(f, "Final balance:   ${}", to_major_units(balance))?;
        }
        writeln!(f, "Float drawn:     ${}", to_major_units(self.total_float_drawn()))?;
        writeln!(f, "APR cost:        ${}", cost_to_major_units(self.total_apr_cost))?;
        writeln!(
            f,
            "Net profit:      ${}",
            cost_to_major_units(self.projected_net_profit)
        )?;
        writeln!(f, "Success:         {}", self.success)?;

        if !self.float_usage.is_empty() {
            writeln!(f, "\nFloat Usage:")?;
            for usage in &self.float_usage {
                writeln!(
                    f,
                    "  account {} drew ${} on {} at {}% APR -> ${} through {}",
                    usage.account_id,
                    to_major_units(usage.amount_used),
                    usage.start_date,
                    usage.apr_percent,
                    cost_to_major_units(usage.total_cost),
                    usage.end_date
                )?;
            }
        }

        let active: Vec<&DailySnapshot> =
            self.timeline.iter().filter(|s| s.event_count > 0).collect();
        if !active.is_empty() {
            writeln!(f, "\nActive Days:")?;
            for snap in active {
                writeln!(
                    f,
                    "  {}  ${:>12}  {}",
                    snap.date,
                    to_major_units(snap.balance),
                    snap.descriptions.join(", ")
                )?;
            }
        }

        if !self.warnings.is_empty() {
            writeln!(f, "\nWarnings:")?;
            for w in &self.warnings {
                writeln!(f, "  - {}", w)?;
            }
        }
        Ok(())
    }
}

/// The float simulation engine.
pub struct FloatSimulator;

impl FloatSimulator {
    /// Run the simulation described by `input`.
    ///
    /// # Algorithm
    ///
    /// 1. Build the event timeline and stable-sort it by date.
    /// 2. Step one day at a time from `start_date` through `end_date`.
    ///    Inflows and payouts add to the balance. Outflows and opportunity
    ///    starts are paid from cash when it covers them; otherwise the
    ///    balance drops to zero and the shortfall is drawn from the
    ///    lowest-APR credit card with enough available credit. An uncovered
    ///    shortfall becomes a warning.
    /// 3. Snapshot the balance at the end of every day.
    /// 4. Sum float costs and payouts.
    ///
    /// Every draw is costed through `end_date`, and draws are not netted
    /// against each other or against the account's available credit.
    pub fn simulate(input: &SimulationInput) -> SimulationResult {
        let input_snapshot = InputSnapshot {
            available_cash: input.available_cash,
            opportunity_ids: input.opportunities.iter().map(|o| o.id).collect(),
            start_date: input.start_date,
            end_date: input.end_date,
            num_accounts: input.accounts.len(),
            num_cashflow_events: input.cashflow_events.len(),
        };

        let events = build_timeline(
            &input.opportunities,
            &input.cashflow_events,
            input.start_date,
            input.end_date,
        );

        let mut timeline = Vec::new();
        let mut float_usage = Vec::new();
        let mut warnings = Vec::new();
        let mut balance = input.available_cash;
        let mut cursor = 0;

        let mut day = Some(input.start_date);
        while let Some(current) = day.filter(|d| *d <= input.end_date) {
            while cursor < events.len() && events[cursor].date < current {
                cursor += 1;
            }
            let day_start = cursor;
            while cursor < events.len() && events[cursor].date == current {
                cursor += 1;
            }
            let daily_events = &events[day_start..cursor];

            for event in daily_events {
                balance = Self::apply_event(
                    event,
                    balance,
                    &input.accounts,
                    input.end_date,
                    &mut float_usage,
                    &mut warnings,
                );
            }

            if !daily_events.is_empty() {
                debug!(
                    "{}: {} event(s), balance {}",
                    current,
                    daily_events.len(),
                    balance
                );
            }

            timeline.push(DailySnapshot {
                date: current,
                balance,
                event_count: daily_events.len(),
                descriptions: daily_events.iter().map(|e| e.description.clone()).collect(),
            });

            day = current.succ_opt();
        }

        let total_apr_cost: f64 = float_usage.iter().map(|u: &FloatUsage| u.total_cost).sum();
        let total_revenue: i64 = events
            .iter()
            .filter(|e| e.kind == TimelineEventKind::OpportunityEnd)
            .fold(0i64, |total, e| total.saturating_add(e.amount));
        let projected_net_profit = total_revenue as f64 - total_apr_cost;

        if balance < 0 {
            warnings.push("Ended simulation with negative balance".to_string());
        }

        let success = warnings.is_empty();
        info!(
            "simulated {} day(s): {} float draw(s), APR cost {:.2}, success {}",
            timeline.len(),
            float_usage.len(),
            total_apr_cost,
            success
        );

        SimulationResult {
            input_snapshot,
            timeline,
            float_usage,
            total_apr_cost,
            projected_net_profit,
            warnings,
            success,
        }
    }

    /// Apply one event to `balance` and return the new balance.
    fn apply_event(
        event: &TimelineEvent,
        balance: i64,
        accounts: &[Account],
        end_date: NaiveDate,
        float_usage: &mut Vec<FloatUsage>,
        warnings: &mut Vec<String>,
    ) -> i64 {
        match event.kind {
            TimelineEventKind::Inflow | TimelineEventKind::OpportunityEnd => {
                balance.saturating_add(event.amount)
            }
            TimelineEventKind::Outflow | TimelineEventKind::OpportunityStart => {
                if balance >= event.amount {
                    return balance - event.amount;
                }

                let shortfall = event.amount.saturating_sub(balance);
                match Self::find_best_float_account(accounts, shortfall) {
                    Some(account) => {
                        debug!(
                            "{}: drawing {} from account {} at {}% APR",
                            event.date, shortfall, account.id, account.apr_percent
                        );
                        float_usage.push(FloatUsage::new(account, shortfall, event.date, end_date));
                    }
                    None => {
                        let message = format!(
                            "Insufficient funds on {}: needed ${}",
                            event.date,
                            to_major_units(shortfall)
                        );
                        warn!("{}", message);
                        warnings.push(message);
                    }
                }
                0
            }
        }
    }

    /// The credit card with the lowest APR whose available credit covers
    /// `amount_needed`. The first such account in input order wins ties.
    pub fn find_best_float_account(accounts: &[Account], amount_needed: i64) -> Option<&Account> {
        accounts
            .iter()
            .filter(|a| a.is_float_source() && a.available_credit >= amount_needed)
            .min_by(|a, b| a.apr_percent.total_cmp(&b.apr_percent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::account::AccountType;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn input(
        cash: i64,
        opportunities: Vec<Opportunity>,
        accounts: Vec<Account>,
        end: NaiveDate,
    ) -> SimulationInput {
        SimulationInput {
            available_cash: cash,
            start_date: day(1, 1),
            end_date: end,
            opportunities,
            accounts,
            cashflow_events: Vec::new(),
        }
    }

    #[test]
    fn test_float_selection_lowest_apr() {
        let accounts = vec![
            Account::credit_card(1, "High APR", 500_000, 24.0),
            Account::credit_card(2, "Low APR", 500_000, 12.0),
            Account::credit_card(3, "Mid APR", 500_000, 18.0),
        ];
        let best = FloatSimulator::find_best_float_account(&accounts, 100_000).unwrap();
        assert_eq!(best.id, AccountId::new(2));
        assert_eq!(best.apr_percent, 12.0);
    }

    #[test]
    fn test_float_selection_insufficient_credit() {
        let accounts = vec![
            Account::credit_card(1, "A", 50_000, 12.0),
            Account::credit_card(2, "B", 30_000, 10.0),
        ];
        assert!(FloatSimulator::find_best_float_account(&accounts, 100_000).is_none());
    }

    #[test]
    fn test_float_selection_skips_non_cards_and_small_limits() {
        let accounts = vec![
            Account::new(1, "Cheap LOC", AccountType::LineOfCredit, 900_000, 5.0),
            Account::credit_card(2, "Too small", 10, 1.0),
            Account::credit_card(3, "Fits", 900_000, 20.0),
        ];
        let best = FloatSimulator::find_best_float_account(&accounts, 1000).unwrap();
        assert_eq!(best.id, AccountId::new(3));
    }

    #[test]
    fn test_float_selection_tie_prefers_first() {
        let accounts = vec![
            Account::credit_card(8, "First", 1000, 15.0),
            Account::credit_card(4, "Second", 1000, 15.0),
        ];
        let best = FloatSimulator::find_best_float_account(&accounts, 500).unwrap();
        assert_eq!(best.id, AccountId::new(8));
    }

    #[test]
    fn test_simulation_with_sufficient_cash() {
        let result = FloatSimulator::simulate(&input(
            100_000,
            vec![Opportunity::new(1, "Flip", 50_000, 60_000, 10)],
            vec![Account::credit_card(1, "Card", 100_000, 24.0)],
            day(1, 31),
        ));

        assert!(result.float_usage.is_empty());
        assert_eq!(result.total_apr_cost, 0.0);
        assert!(result.success);
        assert!(result.warnings.is_empty());
        assert_eq!(result.timeline.len(), 31);
        assert_eq!(result.timeline[0].balance, 50_000);
        assert_eq!(result.final_balance(), Some(110_000));
        assert_eq!(result.projected_net_profit, 60_000.0);
    }

    #[test]
    fn test_simulation_with_float_usage() {
        let result = FloatSimulator::simulate(&input(
            50_000,
            vec![Opportunity::new(1, "Flip", 200_000, 250_000, 20)],
            vec![Account::credit_card(1, "Card", 300_000, 24.0)],
            day(1, 31),
        ));

        assert_eq!(result.float_usage.len(), 1);
        let usage = &result.float_usage[0];
        assert_eq!(usage.account_id, AccountId::new(1));
        assert_eq!(usage.amount_used, 150_000);
        assert_eq!(usage.start_date, day(1, 1));
        assert_eq!(usage.end_date, day(1, 31));
        assert_eq!(result.timeline[0].balance, 0);
        assert!(result.total_apr_cost > 0.0);
        assert!(result.projected_net_profit > 0.0);
        assert!(result.success);
    }

    #[test]
    fn test_cost_window_runs_to_end_date() {
        let result = FloatSimulator::simulate(&input(
            0,
            vec![Opportunity::new(1, "Quick", 10_000, 12_000, 2)],
            vec![Account::credit_card(1, "Card", 50_000, 36.5)],
            day(1, 11),
        ));
        let expected = compound_cost(10_000.0, apr_to_daily_rate(36.5), 10);
        assert_eq!(result.float_usage[0].end_date, day(1, 11));
        assert!((result.total_apr_cost - expected).abs() < 1e-9);
    }

    #[test]
    fn test_simulation_impossible_timeline() {
        let result = FloatSimulator::simulate(&input(
            100_000,
            vec![Opportunity::new(1, "Huge", 1_000_000, 1_200_000, 10)],
            vec![Account::credit_card(1, "Card", 500_000, 24.0)],
            day(1, 31),
        ));

        assert!(!result.success);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(
            result.warnings[0],
            "Insufficient funds on 2025-01-01: needed $9000.00"
        );
        assert!(result.float_usage.is_empty());
        assert_eq!(result.timeline[0].balance, 0);
    }

    #[test]
    fn test_same_day_inflow_credited_before_later_outflow() {
        let mut sim = input(0, Vec::new(), vec![Account::credit_card(1, "Card", 1_000, 20.0)], day(1, 5));
        sim.cashflow_events = vec![
            CashflowEvent::inflow(5_000, day(1, 3)),
            CashflowEvent::outflow(4_000, day(1, 3)),
        ];
        let result = FloatSimulator::simulate(&sim);
        assert!(result.float_usage.is_empty());
        assert_eq!(result.timeline[2].balance, 1_000);
        assert_eq!(result.timeline[2].event_count, 2);
    }

    #[test]
    fn test_opportunity_start_precedes_same_day_cashflow() {
        // The start event is generated first, so it is paid before the inflow lands.
        let mut sim = input(
            0,
            vec![Opportunity::new(1, "Buy", 5_000, 6_000, 60)],
            vec![Account::credit_card(1, "Card", 10_000, 20.0)],
            day(1, 10),
        );
        sim.cashflow_events = vec![CashflowEvent::inflow(5_000, day(1, 1))];
        let result = FloatSimulator::simulate(&sim);
        assert_eq!(result.float_usage.len(), 1);
        assert_eq!(result.float_usage[0].amount_used, 5_000);
        assert_eq!(result.timeline[0].balance, 5_000);
        assert_eq!(
            result.timeline[0].descriptions,
            vec!["Start: Buy".to_string(), "inflow".to_string()]
        );
    }

    #[test]
    fn test_repeated_draws_stay_separate() {
        let mut sim = input(0, Vec::new(), vec![Account::credit_card(1, "Card", 10_000, 20.0)], day(1, 10));
        sim.cashflow_events = vec![
            CashflowEvent::outflow(6_000, day(1, 2)),
            CashflowEvent::outflow(6_000, day(1, 4)),
        ];
        let result = FloatSimulator::simulate(&sim);
        assert_eq!(result.float_usage.len(), 2);
        assert_eq!(result.total_float_drawn(), 12_000);
        let sum: f64 = result.float_usage.iter().map(|u| u.total_cost).sum();
        assert_eq!(result.total_apr_cost, sum);
    }

    #[test]
    fn test_net_profit_is_revenue_minus_cost() {
        let result = FloatSimulator::simulate(&input(
            0,
            vec![Opportunity::new(1, "Full float", 100_000, 150_000, 30)],
            vec![Account::credit_card(1, "Card", 200_000, 24.0)],
            day(2, 28),
        ));
        assert!(result.total_apr_cost > 0.0);
        assert!((result.projected_net_profit - (150_000.0 - result.total_apr_cost)).abs() < 1e-9);
    }

    #[test]
    fn test_empty_window() {
        let result = FloatSimulator::simulate(&input(
            1_000,
            vec![Opportunity::new(1, "Late", 0, 500, 5)],
            Vec::new(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        ));
        assert!(result.timeline.is_empty());
        assert!(result.success);
        assert_eq!(result.projected_net_profit, 0.0);
    }

    #[test]
    fn test_runs_are_independent() {
        let sim = input(
            0,
            vec![Opportunity::new(1, "Huge", 1_000_000, 1_100_000, 5)],
            Vec::new(),
            day(1, 10),
        );
        let first = FloatSimulator::simulate(&sim);
        let second = FloatSimulator::simulate(&sim);
        assert_eq!(first, second);
        assert_eq!(second.warnings.len(), 1);
    }

    #[test]
    fn test_display_summarizes_run() {
        let result = FloatSimulator::simulate(&input(
            0,
            vec![Opportunity::new(1, "Flip", 100_000, 150_000, 30)],
            vec![Account::credit_card(1, "Card", 200_000, 24.0)],
            day(2, 28),
        ));
        let text = result.to_string();
        assert!(text.contains("Float Usage"));
        assert!(text.contains("Start: Flip"));
        assert!(text.contains("Success:         true"));
    }

    #[test]
    fn test_huge_amounts_saturate_instead_of_overflowing() {
        let big = i64::MAX / 2 + 1;
        let mut sim = input(
            0,
            vec![
                Opportunity::new(1, "Windfall A", 0, big, 1),
                Opportunity::new(2, "Windfall B", 0, big, 1),
            ],
            Vec::new(),
            day(1, 5),
        );
        sim.cashflow_events = vec![
            CashflowEvent::inflow(big, day(1, 3)),
            CashflowEvent::inflow(big, day(1, 4)),
        ];

        let result = FloatSimulator::simulate(&sim);
        assert!(result.success);
        assert_eq!(result.timeline.len(), 5);
        assert_eq!(result.final_balance(), Some(i64::MAX));
        assert_eq!(result.projected_net_profit, i64::MAX as f64);
    }

    #[test]
    fn test_window_ending_on_last_calendar_day() {
        let end = NaiveDate::MAX;
        let start = end.pred_opt().and_then(|d| d.pred_opt()).unwrap();
        let sim = SimulationInput {
            available_cash: 0,
            start_date: start,
            end_date: end,
            opportunities: vec![Opportunity::new(1, "Late", 500, 900, 10)],
            accounts: vec![Account::credit_card(1, "Card", 1_000, 12.0)],
            cashflow_events: Vec::new(),
        };

        let result = FloatSimulator::simulate(&sim);
        assert_eq!(result.timeline.len(), 3);
        assert_eq!(result.timeline[2].date, end);
        assert_eq!(result.float_usage.len(), 1);
        assert_eq!(result.float_usage[0].end_date, end);
        assert_eq!(result.projected_net_profit, -result.total_apr_cost);
    }
}
