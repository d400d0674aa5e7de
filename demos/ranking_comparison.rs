//! Rank a generated portfolio two ways and show where the ICE heuristic
//! disagrees with the composite ROI score.
//!
//! ```bash
//! cargo run --example ranking_comparison
//! ```

use opportunity_evaluator::prelude::*;
use opportunity_evaluator::scoring::debug::MetricsDebug;
use opportunity_evaluator::simulation::scenario_gen::{generate_random_portfolio, PortfolioConfig};

fn main() {
    env_logger::init();

    let store = generate_random_portfolio(&PortfolioConfig {
        opportunity_count: 15,
        ..Default::default()
    });
    let service = EvaluatorService::new(store, Config::extended());

    let top = match service.recommendations(&RankingQuery::new().with_limit(5)) {
        Ok(top) => top,
        Err(e) => {
            eprintln!("ranking failed: {}", e);
            return;
        }
    };

    println!("=== Top 5 by composite score ===");
    for (i, r) in top.iter().enumerate() {
        println!(
            "{:>2}. {:<10} score {:.4}  daily ROI {:>10.2}%",
            i + 1,
            r.name,
            r.composite_score,
            r.daily_roi_pct
        );
    }

    if let Some(best) = top.first() {
        let opportunities = service.store().opportunities_slice();
        if let Some(opp) = opportunities.iter().find(|o| o.id == best.id) {
            println!("\n{}", MetricsDebug::new(opp, best));
        }
    }

    match service.ice_vs_roi() {
        Ok(comparison) => {
            println!("=== ICE vs composite ===");
            println!("Max rank shift: {}", comparison.max_difference);
            println!("Avg rank shift: {:.2}", comparison.avg_difference);
            for d in comparison.rank_differences.iter().take(3) {
                println!(
                    "  #{} ICE {} vs composite {}",
                    d.id, d.ice_rank, d.roi_rank
                );
            }
        }
        Err(e) => eprintln!("comparison failed: {}", e),
    }
}
