//! Walk through a float simulation where starting cash cannot cover an
//! up-front investment and a rent payment, so the gap is drawn on the
//! cheapest credit card until the payout arrives.
//!
//! ```bash
//! cargo run --example float_simulation
//! ```

use chrono::NaiveDate;
use opportunity_evaluator::prelude::*;

fn main() {
    env_logger::init();

    let date = |m, d| NaiveDate::from_ymd_opt(2025, m, d).unwrap_or_default();

    let input = SimulationInput {
        available_cash: 40_000,
        start_date: date(1, 1),
        end_date: date(2, 28),
        opportunities: vec![
            Opportunity::new(1, "Wholesale lot resale", 100_000, 150_000, 30)
                .with_effort(12.0, 40.0)
                .with_risk(0.15, 0.8),
            Opportunity::new(2, "Weekend delivery gig", 0, 18_000, 3).with_effort(10.0, 18.0),
        ],
        accounts: vec![
            Account::credit_card(1, "Rewards card", 250_000, 27.99),
            Account::credit_card(2, "Balance-transfer card", 80_000, 12.99),
            Account::credit_card(3, "Store card", 500_000, 19.5),
        ],
        cashflow_events: vec![
            CashflowEvent::outflow(120_000, date(1, 3)).with_description("Rent"),
            CashflowEvent::inflow(210_000, date(1, 15)).with_description("Paycheck"),
            CashflowEvent::outflow(35_000, date(2, 10)).with_description("Utilities"),
        ],
    };

    let result = FloatSimulator::simulate(&input);
    println!("{}", result);

    match serde_json::to_string_pretty(&result.float_usage) {
        Ok(json) => println!("Float usage as JSON:\n{}", json),
        Err(e) => eprintln!("could not serialize float usage: {}", e),
    }
}
