use crate::core::opportunity::Opportunity;
use serde::{Deserialize, Serialize};

/// Raw financial metrics of a single opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub profit: f64,
    pub daily_roi_pct: f64,
    pub risk_adjusted_roi: f64,
    pub opportunity_cost: f64,
}

/// Compute the four raw metrics of an opportunity.
///
/// Daily ROI divides by `max(initial_investment, 1)`: a zero-investment
/// opportunity is scored against a one-unit baseline, which yields very
/// large ROI values on purpose.
///
/// The opportunity must already be validated (`turnaround_days > 0`).
///
/// # Examples
///
/// ```
/// use opportunity_evaluator::core::opportunity::Opportunity;
/// use opportunity_evaluator::scoring::metrics::compute_metrics;
///
/// let m = compute_metrics(&Opportunity::new(1, "Referral", 0, 3000, 30));
/// assert_eq!(m.profit, 3000.0);
/// assert_eq!(m.daily_roi_pct, 10_000.0);
/// ```
pub fn compute_metrics(opportunity: &Opportunity) -> Metrics {
    let investment = opportunity.initial_investment as f64;
    let profit = opportunity.expected_return as f64 - investment;
    let daily_roi_pct = (profit / investment.max(1.0)) / opportunity.turnaround_days as f64 * 100.0;
    let risk_adjusted_roi = daily_roi_pct * (1.0 - opportunity.risk_factor);
    let opportunity_cost = opportunity.time_required_hours * opportunity.hourly_rate;

    Metrics {
        profit,
        daily_roi_pct,
        risk_adjusted_roi,
        opportunity_cost,
    }
}

/// An opportunity snapshot alongside its computed metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedMetrics {
    #[serde(flatten)]
    pub opportunity: Opportunity,
    #[serde(flatten)]
    pub metrics: Metrics,
}

impl ComputedMetrics {
    pub fn from_opportunity(opportunity: Opportunity) -> Self {
        let metrics = compute_metrics(&opportunity);
        Self {
            opportunity,
            metrics,
        }
    }
}
