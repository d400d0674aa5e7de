use crate::core::ids::OpportunityId;
use crate::core::opportunity::Opportunity;
use crate::scoring::metrics::{compute_metrics, Metrics};
use crate::scoring::normalize::normalize;
use log::debug;
use serde::{Deserialize, Serialize};

/// Weight of normalized risk-adjusted ROI in the composite score.
pub const ROI_WEIGHT: f64 = 0.5;
/// Weight of normalized inverse opportunity cost.
pub const COST_WEIGHT: f64 = 0.3;
/// Weight of normalized certainty.
pub const CERTAINTY_WEIGHT: f64 = 0.2;

/// An opportunity with its raw metrics, normalized components and
/// composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedOpportunity {
    pub id: OpportunityId,
    pub name: String,
    pub category: Option<String>,
    pub profit: f64,
    pub daily_roi_pct: f64,
    pub risk_adjusted_roi: f64,
    pub opportunity_cost: f64,
    pub certainty_score: f64,
    pub is_recurring: bool,
    pub liquidation_risk: Option<f64>,
    pub scored_roi: f64,
    pub scored_cost: f64,
    pub scored_certainty: f64,
    pub composite_score: f64,
}

/// Filter and truncation applied after scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankingQuery {
    pub category: Option<String>,
    pub limit: Option<usize>,
}

impl RankingQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Weighted blend of the three normalized components.
pub fn composite_score(scored_roi: f64, scored_cost: f64, scored_certainty: f64) -> f64 {
    ROI_WEIGHT * scored_roi + COST_WEIGHT * scored_cost + CERTAINTY_WEIGHT * scored_certainty
}

/// Cost component before normalization: cheaper opportunities score higher.
///
/// Costs below one unit are floored at one so free opportunities stay finite.
fn inverse_cost(opportunity_cost: f64) -> f64 {
    1.0 / opportunity_cost.max(1.0)
}

/// Ranks opportunities by composite ROI score.
///
/// Normalization always runs over the full candidate set; the category
/// filter and limit only select which rows are returned.
pub struct CompositeRanker;

impl CompositeRanker {
    /// Score every opportunity and return rows sorted by composite score,
    /// highest first. Ties keep input order.
    pub fn rank(opportunities: &[Opportunity]) -> Vec<RankedOpportunity> {
        let metrics: Vec<Metrics> = opportunities.iter().map(compute_metrics).collect();

        let roi: Vec<f64> = metrics.iter().map(|m| m.risk_adjusted_roi).collect();
        let cost: Vec<f64> = metrics.iter().map(|m| inverse_cost(m.opportunity_cost)).collect();
        let certainty: Vec<f64> = opportunities.iter().map(|o| o.certainty_score).collect();

        let scored_roi = normalize(&roi);
        let scored_cost = normalize(&cost);
        let scored_certainty = normalize(&certainty);

        let mut ranked: Vec<RankedOpportunity> = opportunities
            .iter()
            .zip(metrics)
            .enumerate()
            .map(|(i, (opp, m))| RankedOpportunity {
                id: opp.id,
                name: opp.name.clone(),
                category: opp.category.clone(),
                profit: m.profit,
                daily_roi_pct: m.daily_roi_pct,
                risk_adjusted_roi: m.risk_adjusted_roi,
                opportunity_cost: m.opportunity_cost,
                certainty_score: opp.certainty_score,
                is_recurring: opp.is_recurring,
                liquidation_risk: opp.liquidation_risk,
                scored_roi: scored_roi[i],
                scored_cost: scored_cost[i],
                scored_certainty: scored_certainty[i],
                composite_score: composite_score(
                    scored_roi[i],
                    scored_cost[i],
                    scored_certainty[i],
                ),
            })
            .collect();

        ranked.sort_by(|a, b| b.composite_score.total_cmp(&a.composite_score));
        debug!("ranked {} opportunities by composite score", ranked.len());
        ranked
    }

    /// Rank, then apply the category filter and the result limit.
    pub fn rank_with(opportunities: &[Opportunity], query: &RankingQuery) -> Vec<RankedOpportunity> {
        let ranked = Self::rank(opportunities).into_iter().filter(|row| {
            query
                .category
                .as_deref()
                .map_or(true, |c| row.category.as_deref() == Some(c))
        });
        match query.limit {
            Some(limit) => ranked.take(limit).collect(),
            None => ranked.collect(),
        }
    }
}
