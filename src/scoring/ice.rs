//! Impact/Confidence/Ease scoring.
//!
//! A lightweight prioritization heuristic that ranks opportunities without
//! looking at their financials, plus a diagnostic that measures how far
//! the ICE order drifts from the composite ROI order.

use crate::core::ids::OpportunityId;
use crate::core::opportunity::Opportunity;
use crate::scoring::composite::RankedOpportunity;
use crate::scoring::normalize::normalize;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw ICE score: `impact * confidence / max(ease, 1)`.
///
/// # Examples
///
/// ```
/// use opportunity_evaluator::scoring::ice::ice_score;
///
/// assert_eq!(ice_score(9, 9, 5), 16.2);
/// assert_eq!(ice_score(10, 10, 0), 100.0);
/// ```
pub fn ice_score(impact: u8, confidence: u8, ease: u8) -> f64 {
    (f64::from(impact) * f64::from(confidence)) / f64::from(ease.max(1))
}

/// Linear blend of a normalized ICE score and a normalized ROI score.
///
/// `ice_weight` is expected in `[0, 1]` and is not clamped.
pub fn combined_score(ice_norm: f64, roi_norm: f64, ice_weight: f64) -> f64 {
    ice_weight * ice_norm + (1.0 - ice_weight) * roi_norm
}

/// An opportunity with its raw and normalized ICE scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IceRanked {
    pub opportunity: Opportunity,
    pub raw_score: f64,
    pub normalized_score: f64,
}

/// Rank position of one opportunity under both schemes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankDifference {
    pub id: OpportunityId,
    pub ice_rank: usize,
    pub roi_rank: usize,
    pub difference: usize,
}

/// Divergence between the ICE ranking and the composite ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankComparison {
    pub total_opportunities: usize,
    /// Sorted by `difference`, largest first.
    pub rank_differences: Vec<RankDifference>,
    pub max_difference: usize,
    pub avg_difference: f64,
}

pub struct IceRanker;

impl IceRanker {
    /// Score, normalize across the set and sort by normalized score,
    /// highest first. Equal scores keep their input order.
    pub fn rank(opportunities: &[Opportunity]) -> Vec<IceRanked> {
        let raw: Vec<f64> = opportunities
            .iter()
            .map(|opp| {
                let (impact, confidence, ease) = opp.ice_components();
                ice_score(impact, confidence, ease)
            })
            .collect();
        let normalized = normalize(&raw);

        let mut ranked: Vec<IceRanked> = opportunities
            .iter()
            .zip(raw.into_iter().zip(normalized))
            .map(|(opp, (raw_score, normalized_score))| IceRanked {
                opportunity: opp.clone(),
                raw_score,
                normalized_score,
            })
            .collect();

        ranked.sort_by(|a, b| b.normalized_score.total_cmp(&a.normalized_score));
        ranked
    }

    /// Compare ICE positions against composite positions for every
    /// opportunity present in both rankings.
    ///
    /// `composite` is expected in ranked order, as returned by
    /// [`CompositeRanker::rank`](crate::scoring::composite::CompositeRanker::rank).
    pub fn compare_with_roi(
        opportunities: &[Opportunity],
        composite: &[RankedOpportunity],
    ) -> RankComparison {
        let roi_positions: HashMap<OpportunityId, usize> = composite
            .iter()
            .enumerate()
            .map(|(idx, row)| (row.id, idx))
            .collect();

        let mut differences: Vec<RankDifference> = Self::rank(opportunities)
            .iter()
            .enumerate()
            .filter_map(|(ice_rank, row)| {
                let id = row.opportunity.id;
                roi_positions.get(&id).map(|&roi_rank| RankDifference {
                    id,
                    ice_rank,
                    roi_rank,
                    difference: ice_rank.abs_diff(roi_rank),
                })
            })
            .collect();

        differences.sort_by(|a, b| b.difference.cmp(&a.difference));

        let max_difference = differences.iter().map(|d| d.difference).max().unwrap_or(0);
        let avg_difference = if differences.is_empty() {
            0.0
        } else {
            differences.iter().map(|d| d.difference).sum::<usize>() as f64
                / differences.len() as f64
        };

        debug!(
            "ICE vs ROI: {} compared, max difference {}, avg {:.2}",
            differences.len(),
            max_difference,
            avg_difference
        );

        RankComparison {
            total_opportunities: opportunities.len(),
            rank_differences: differences,
            max_difference,
            avg_difference,
        }
    }
}
