use crate::core::cashflow::{CashflowEvent, CashflowKind};
use crate::core::ids::AccountId;
use crate::core::opportunity::Opportunity;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Kind of a dated cash movement inside one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineEventKind {
    Inflow,
    Outflow,
    OpportunityStart,
    OpportunityEnd,
}

impl From<CashflowKind> for TimelineEventKind {
    fn from(kind: CashflowKind) -> Self {
        match kind {
            CashflowKind::Inflow => TimelineEventKind::Inflow,
            CashflowKind::Outflow => TimelineEventKind::Outflow,
        }
    }
}

/// One dated cash movement. Exists only for the duration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub date: NaiveDate,
    pub kind: TimelineEventKind,
    pub amount: i64,
    pub description: String,
    pub account_id: Option<AccountId>,
}

impl TimelineEvent {
    /// Whether the event takes money out of the balance.
    pub fn is_debit(&self) -> bool {
        matches!(
            self.kind,
            TimelineEventKind::Outflow | TimelineEventKind::OpportunityStart
        )
    }
}

/// The day `turnaround_days` after `start_date`, or `None` when that lies
/// outside the representable calendar. Such a payout can never fall inside
/// a simulation window.
fn payout_date(start_date: NaiveDate, turnaround_days: i64) -> Option<NaiveDate> {
    let days = u64::try_from(turnaround_days).ok()?;
    start_date.checked_add_days(Days::new(days))
}

/// Build the event list for `[start_date, end_date]` and sort it by date.
///
/// Opportunities come first, in input order: each one with a positive
/// investment spends it on `start_date`, and pays out `expected_return`
/// after `turnaround_days` if that falls on or before `end_date`. Cashflow
/// events inside the range follow. The sort is stable, so same-day events
/// keep this generation order. Nothing is deduplicated.
pub fn build_timeline(
    opportunities: &[Opportunity],
    cashflow_events: &[CashflowEvent],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Vec<TimelineEvent> {
    let mut events = Vec::new();

    for opp in opportunities {
        if opp.initial_investment > 0 {
            events.push(TimelineEvent {
                date: start_date,
                kind: TimelineEventKind::OpportunityStart,
                amount: opp.initial_investment,
                description: format!("Start: {}", opp.name),
                account_id: None,
            });
        }

        if let Some(paid_on) =
            payout_date(start_date, opp.turnaround_days).filter(|d| *d <= end_date)
        {
            events.push(TimelineEvent {
                date: paid_on,
                kind: TimelineEventKind::OpportunityEnd,
                amount: opp.expected_return,
                description: format!("Payout: {}", opp.name),
                account_id: None,
            });
        }
    }

    for cf in cashflow_events.iter().filter(|cf| cf.within(start_date, end_date)) {
        events.push(TimelineEvent {
            date: cf.date,
            kind: cf.kind.into(),
            amount: cf.amount,
            description: cf
                .description
                .clone()
                .unwrap_or_else(|| cf.kind.to_string()),
            account_id: cf.account_id,
        });
    }

    events.sort_by_key(|e| e.date);
    events
}
