use crate::core::ids::OpportunityId;
use crate::core::opportunity::Opportunity;
use crate::scoring::composite::{RankedOpportunity, CERTAINTY_WEIGHT, COST_WEIGHT, ROI_WEIGHT};
use crate::scoring::metrics::compute_metrics;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Step-by-step breakdown of how an opportunity was scored, with every
/// formula rendered using the actual numbers that went into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsDebug {
    pub opportunity_id: OpportunityId,
    pub opportunity_name: String,

    pub initial_investment: i64,
    pub expected_return: i64,
    pub turnaround_days: i64,
    pub time_required_hours: f64,
    pub hourly_rate: f64,
    pub risk_factor: f64,
    pub certainty_score: f64,

    pub profit: f64,
    pub profit_formula: String,
    pub daily_roi_pct: f64,
    pub daily_roi_pct_formula: String,
    pub risk_adjusted_roi: f64,
    pub risk_adjusted_roi_formula: String,
    pub opportunity_cost: f64,
    pub opportunity_cost_formula: String,

    pub scored_roi: f64,
    pub scored_cost: f64,
    pub scored_certainty: f64,
    pub composite_score: f64,
    pub composite_score_formula: String,
}

impl MetricsDebug {
    /// Build the breakdown from the raw record and its row in the
    /// composite ranking.
    pub fn new(opportunity: &Opportunity, ranked: &RankedOpportunity) -> Self {
        let m = compute_metrics(opportunity);
        let o = opportunity;

        Self {
            opportunity_id: o.id,
            opportunity_name: o.name.clone(),
            initial_investment: o.initial_investment,
            expected_return: o.expected_return,
            turnaround_days: o.turnaround_days,
            time_required_hours: o.time_required_hours,
            hourly_rate: o.hourly_rate,
            risk_factor: o.risk_factor,
            certainty_score: o.certainty_score,
            profit: m.profit,
            profit_formula: format!("{} - {}", o.expected_return, o.initial_investment),
            daily_roi_pct: m.daily_roi_pct,
            daily_roi_pct_formula: format!(
                "(({} - {}) / max({}, 1)) / {} * 100",
                o.expected_return, o.initial_investment, o.initial_investment, o.turnaround_days
            ),
            risk_adjusted_roi: m.risk_adjusted_roi,
            risk_adjusted_roi_formula: format!("{} * (1 - {})", m.daily_roi_pct, o.risk_factor),
            opportunity_cost: m.opportunity_cost,
            opportunity_cost_formula: format!("{} * {}", o.time_required_hours, o.hourly_rate),
            scored_roi: ranked.scored_roi,
            scored_cost: ranked.scored_cost,
            scored_certainty: ranked.scored_certainty,
            composite_score: ranked.composite_score,
            composite_score_formula: format!(
                "({} * {}) + ({} * {}) + ({} * {})",
                ranked.scored_roi,
                ROI_WEIGHT,
                ranked.scored_cost,
                COST_WEIGHT,
                ranked.scored_certainty,
                CERTAINTY_WEIGHT
            ),
        }
    }
}

impl fmt::Display for MetricsDebug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "=== Metrics: {} (#{}) ===",
            self.opportunity_name, self.opportunity_id
        )?;
        writeln!(f, "Profit:            {} = {}", self.profit_formula, self.profit)?;
        writeln!(
            f,
            "Daily ROI %:       {} = {}",
            self.daily_roi_pct_formula, self.daily_roi_pct
        )?;
        writeln!(
            f,
            "Risk-adj. ROI:     {} = {}",
            self.risk_adjusted_roi_formula, self.risk_adjusted_roi
        )?;
        writeln!(
            f,
            "Opportunity cost:  {} = {}",
            self.opportunity_cost_formula, self.opportunity_cost
        )?;
        writeln!(f, "\nNormalized:")?;
        writeln!(f, "  ROI:       {:.4}", self.scored_roi)?;
        writeln!(f, "  Cost:      {:.4}", self.scored_cost)?;
        writeln!(f, "  Certainty: {:.4}", self.scored_certainty)?;
        writeln!(
            f,
            "Composite:         {} = {}",
            self.composite_score_formula, self.composite_score
        )
    }
}
