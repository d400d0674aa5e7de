//! opportunity-evaluator CLI
//!
//! Rank, inspect and simulate opportunities from a portfolio file.
//!
//! # Usage
//!
//! ```bash
//! # Top ten opportunities by composite score
//! opportunity-evaluator rank --input portfolio.json
//!
//! # Formula breakdown for one opportunity
//! opportunity-evaluator debug --input portfolio.json --id 3
//!
//! # Replay cash and credit over a window (needs EVALUATOR_EXTENDED=true)
//! opportunity-evaluator simulate --input portfolio.json --cash 100000 --start 2025-01-01
//!
//! # Generate a random portfolio for testing
//! opportunity-evaluator generate --opportunities 20 --output portfolio.json
//! ```

use chrono::NaiveDate;
use log::{debug, error};
use opportunity_evaluator::config::Config;
use opportunity_evaluator::core::ids::{AccountId, OpportunityId};
use opportunity_evaluator::finance::money::to_major_units;
use opportunity_evaluator::scoring::composite::RankingQuery;
use opportunity_evaluator::service::{EvaluatorService, SimulateRequest};
use opportunity_evaluator::simulation::scenario_gen::{generate_random_portfolio, PortfolioConfig};
use opportunity_evaluator::store::InMemoryStore;
use serde::Serialize;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"opportunity-evaluator: opportunity scoring and credit float simulation

USAGE:
    opportunity-evaluator <COMMAND> [OPTIONS]

COMMANDS:
    rank        Rank opportunities by composite score
    metrics     Show raw metrics for every opportunity (or one)
    debug       Show the formula breakdown behind one opportunity's score
    ice         Rank opportunities by ICE score
    compare     Compare the ICE ranking against the composite ranking
    simulate    Run the day-by-day float simulation
    generate    Generate a random portfolio (for testing)
    help        Show this message

COMMON OPTIONS:
    --input <FILE>      Path to portfolio JSON file
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (rank):
    --category <NAME>   Only keep opportunities in this category
    --limit <N>         Number of results, 1-100 (default: 10)

OPTIONS (metrics, debug):
    --id <N>            Opportunity id (required for debug)

OPTIONS (simulate):
    --cash <MINOR>          Starting cash in minor units (cents)
    --start <YYYY-MM-DD>    First simulated day
    --end <YYYY-MM-DD>      Last simulated day (default: start + 90 days)
    --opportunities <IDS>   Comma-separated opportunity ids (default: all)
    --accounts <IDS>        Comma-separated account ids (default: credit cards)

OPTIONS (generate):
    --opportunities <N>  Number of opportunities (default: 10)
    --accounts <N>       Number of accounts (default: 3)
    --cashflows <N>      Number of cashflow events (default: 12)
    --output <FILE>      Write to file instead of stdout

ENVIRONMENT:
    EVALUATOR_EXTENDED=true               Enable accounts, simulation and ICE scoring
    EVALUATOR_DEFAULT_SIMULATION_DAYS=N   Default simulation span (default: 90)
    EVALUATOR_MAX_SIMULATION_DAYS=N       Longest allowed span (default: 365)
    RUST_LOG=debug                        Log verbosity

EXAMPLES:
    opportunity-evaluator rank --input portfolio.json --limit 5
    opportunity-evaluator rank --input portfolio.json --category gig --format json
    opportunity-evaluator debug --input portfolio.json --id 3
    EVALUATOR_EXTENDED=true opportunity-evaluator compare --input portfolio.json
    EVALUATOR_EXTENDED=true opportunity-evaluator simulate --input portfolio.json \
        --cash 100000 --start 2025-01-01 --end 2025-03-31
    opportunity-evaluator generate --opportunities 20 --output portfolio.json"#
    );
}

/// Options shared by every command that reads a portfolio.
struct CommonOptions {
    input: String,
    json: bool,
}

/// JSON output row for `rank`.
#[derive(Serialize)]
struct RankOutput {
    rank: usize,
    id: i64,
    name: String,
    category: Option<String>,
    profit: String,
    daily_roi_pct: f64,
    risk_adjusted_roi: f64,
    composite_score: f64,
}

#[derive(Serialize)]
struct CompareOutput {
    total_opportunities: usize,
    max_difference: usize,
    avg_difference: f64,
    most_divergent: Vec<DivergenceOutput>,
}

#[derive(Serialize)]
struct DivergenceOutput {
    id: i64,
    ice_rank: usize,
    roi_rank: usize,
    difference: usize,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn next_value(args: &[String], i: usize, flag: &str, what: &str) -> String {
    args.get(i)
        .cloned()
        .unwrap_or_else(|| fail(format!("{} requires {}", flag, what)))
}

fn parse_number<T: std::str::FromStr>(value: &str, flag: &str) -> T {
    value
        .parse()
        .unwrap_or_else(|_| fail(format!("{} requires a number, got '{}'", flag, value)))
}

fn parse_date(value: &str, flag: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .unwrap_or_else(|_| fail(format!("{} requires a YYYY-MM-DD date, got '{}'", flag, value)))
}

fn parse_ids(value: &str, flag: &str) -> Vec<i64> {
    value
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| parse_number(s.trim(), flag))
        .collect()
}

/// Split `args` into the common options and whatever the command handles
/// itself, returned as `(flag, value)` pairs.
fn parse_common(args: &[String]) -> (CommonOptions, Vec<(String, String)>) {
    let mut input = None;
    let mut format = "text".to_string();
    let mut rest = Vec::new();
    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        i += 1;
        match flag {
            "--input" => input = Some(next_value(args, i, flag, "a file path")),
            "--format" => format = next_value(args, i, flag, "'text' or 'json'"),
            _ if flag.starts_with("--") => {
                rest.push((flag.to_string(), next_value(args, i, flag, "a value")))
            }
            _ => fail(format!("Unknown option: {}", flag)),
        }
        i += 1;
    }

    if format != "text" && format != "json" {
        fail(format!("--format requires 'text' or 'json', got '{}'", format));
    }
    let input = input.unwrap_or_else(|| fail("--input <FILE> is required"));
    (
        CommonOptions {
            input,
            json: format == "json",
        },
        rest,
    )
}

fn load_service(path: &str) -> EvaluatorService<InMemoryStore> {
    let config = Config::from_env().unwrap_or_else(|e| fail(format!("bad configuration: {}", e)));
    debug!("configuration: {:?}", config);

    let store = InMemoryStore::from_json_file(path).unwrap_or_else(|e| {
        eprintln!("Error loading portfolio '{}': {}", path, e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "opportunities": [
    {{ "id": 1, "name": "Resell bundle", "initial_investment": 50000,
       "expected_return": 60000, "turnaround_days": 10 }}
  ],
  "accounts": [
    {{ "id": 1, "name": "Card", "type": "credit_card",
       "available_credit": 200000, "apr_percent": 24.0 }}
  ],
  "cashflow_events": [
    {{ "amount": 20000, "kind": "outflow", "date": "2025-01-05" }}
  ]
}}"#
        );
        process::exit(1);
    });
    EvaluatorService::new(store, config)
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(e),
    }
}

fn reject_unknown(flag: &str) -> ! {
    fail(format!("Unknown option: {}", flag))
}

fn cmd_rank(args: &[String]) {
    let (common, rest) = parse_common(args);
    let mut query = RankingQuery::new();
    for (flag, value) in rest {
        match flag.as_str() {
            "--category" => query = query.with_category(value),
            "--limit" => query = query.with_limit(parse_number(&value, &flag)),
            _ => reject_unknown(&flag),
        }
    }

    let service = load_service(&common.input);
    let ranked = service.recommendations(&query).unwrap_or_else(|e| fail(e));

    if common.json {
        let rows: Vec<RankOutput> = ranked
            .iter()
            .enumerate()
            .map(|(i, r)| RankOutput {
                rank: i + 1,
                id: r.id.value(),
                name: r.name.clone(),
                category: r.category.clone(),
                profit: to_major_units(r.profit.round() as i64).to_string(),
                daily_roi_pct: r.daily_roi_pct,
                risk_adjusted_roi: r.risk_adjusted_roi,
                composite_score: r.composite_score,
            })
            .collect();
        print_json(&rows);
    } else {
        println!("=== Recommendations ===");
        println!(
            "{:>4}  {:>6}  {:<28} {:>12} {:>12} {:>9}",
            "#", "id", "name", "profit", "daily ROI %", "score"
        );
        for (i, r) in ranked.iter().enumerate() {
            println!(
                "{:>4}  {:>6}  {:<28} {:>12} {:>12.2} {:>9.4}",
                i + 1,
                r.id.value(),
                r.name,
                to_major_units(r.profit.round() as i64),
                r.daily_roi_pct,
                r.composite_score
            );
        }
        if ranked.is_empty() {
            println!("No opportunities matched.");
        }
    }
}

fn cmd_metrics(args: &[String]) {
    let (common, rest) = parse_common(args);
    let mut id = None;
    for (flag, value) in rest {
        match flag.as_str() {
            "--id" => id = Some(OpportunityId::new(parse_number(&value, &flag))),
            _ => reject_unknown(&flag),
        }
    }

    let service = load_service(&common.input);
    let metrics = service.computed_metrics(id).unwrap_or_else(|e| fail(e));

    if common.json {
        print_json(&metrics);
    } else {
        println!("=== Metrics ===");
        for row in &metrics {
            let m = &row.metrics;
            println!("#{} {}", row.opportunity.id, row.opportunity.name);
            println!("  Profit:            {}", m.profit);
            println!("  Daily ROI %:       {:.4}", m.daily_roi_pct);
            println!("  Risk-adj. ROI:     {:.4}", m.risk_adjusted_roi);
            println!("  Opportunity cost:  {}", m.opportunity_cost);
        }
    }
}

fn cmd_debug(args: &[String]) {
    let (common, rest) = parse_common(args);
    let mut id = None;
    for (flag, value) in rest {
        match flag.as_str() {
            "--id" => id = Some(OpportunityId::new(parse_number(&value, &flag))),
            _ => reject_unknown(&flag),
        }
    }
    let id = id.unwrap_or_else(|| fail("--id <N> is required"));

    let service = load_service(&common.input);
    let breakdown = service.metrics_debug(id).unwrap_or_else(|e| fail(e));

    if common.json {
        print_json(&breakdown);
    } else {
        print!("{}", breakdown);
    }
}

fn cmd_ice(args: &[String]) {
    let (common, rest) = parse_common(args);
    if let Some((flag, _)) = rest.first() {
        reject_unknown(flag);
    }

    let service = load_service(&common.input);
    let ranked = service.ice_ranking().unwrap_or_else(|e| fail(e));

    if common.json {
        print_json(&ranked);
    } else {
        println!("=== ICE Ranking ===");
        for (i, r) in ranked.iter().enumerate() {
            let (impact, confidence, ease) = r.opportunity.ice_components();
            println!(
                "{:>4}  {:<28} I={:<2} C={:<2} E={:<2} raw={:<8.2} normalized={:.4}",
                i + 1,
                r.opportunity.name,
                impact,
                confidence,
                ease,
                r.raw_score,
                r.normalized_score
            );
        }
    }
}

fn cmd_compare(args: &[String]) {
    let (common, rest) = parse_common(args);
    if let Some((flag, _)) = rest.first() {
        reject_unknown(flag);
    }

    let service = load_service(&common.input);
    let comparison = service.ice_vs_roi().unwrap_or_else(|e| fail(e));

    if common.json {
        let output = CompareOutput {
            total_opportunities: comparison.total_opportunities,
            max_difference: comparison.max_difference,
            avg_difference: comparison.avg_difference,
            most_divergent: comparison
                .rank_differences
                .iter()
                .take(10)
                .map(|d| DivergenceOutput {
                    id: d.id.value(),
                    ice_rank: d.ice_rank,
                    roi_rank: d.roi_rank,
                    difference: d.difference,
                })
                .collect(),
        };
        print_json(&output);
    } else {
        println!("=== ICE vs Composite ===");
        println!("Opportunities:   {}", comparison.total_opportunities);
        println!("Max difference:  {}", comparison.max_difference);
        println!("Avg difference:  {:.2}", comparison.avg_difference);
        if !comparison.rank_differences.is_empty() {
            println!("\nMost divergent:");
            for d in comparison.rank_differences.iter().take(10) {
                println!(
                    "  #{:<6} ICE rank {:>3}  composite rank {:>3}  (moved {})",
                    d.id.value(),
                    d.ice_rank,
                    d.roi_rank,
                    d.difference
                );
            }
        }
    }
}

fn cmd_simulate(args: &[String]) {
    let (common, rest) = parse_common(args);
    let mut cash = None;
    let mut start = None;
    let mut end = None;
    let mut opportunity_ids = None;
    let mut account_ids = None;
    for (flag, value) in rest {
        match flag.as_str() {
            "--cash" => cash = Some(parse_number::<i64>(&value, &flag)),
            "--start" => start = Some(parse_date(&value, &flag)),
            "--end" => end = Some(parse_date(&value, &flag)),
            "--opportunities" => opportunity_ids = Some(parse_ids(&value, &flag)),
            "--accounts" => account_ids = Some(parse_ids(&value, &flag)),
            _ => reject_unknown(&flag),
        }
    }
    let cash = cash.unwrap_or_else(|| fail("--cash <MINOR> is required"));
    let start = start.unwrap_or_else(|| fail("--start <YYYY-MM-DD> is required"));

    let service = load_service(&common.input);
    let opportunity_ids: Vec<OpportunityId> = match opportunity_ids {
        Some(ids) => ids.into_iter().map(OpportunityId::new).collect(),
        None => service
            .store()
            .opportunities_slice()
            .iter()
            .map(|o| o.id)
            .collect(),
    };

    let request = SimulateRequest {
        available_cash: cash,
        opportunity_ids,
        start_date: start,
        end_date: end,
        account_ids: account_ids.map(|ids| ids.into_iter().map(AccountId::new).collect()),
    };
    let result = service.simulate(&request).unwrap_or_else(|e| {
        error!("simulation rejected: {}", e);
        fail(e)
    });

    if common.json {
        print_json(&result);
    } else {
        print!("{}", result);
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = PortfolioConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        i += 1;
        match flag {
            "--opportunities" => {
                config.opportunity_count = parse_number(&next_value(args, i, flag, "a number"), flag)
            }
            "--accounts" => {
                config.account_count = parse_number(&next_value(args, i, flag, "a number"), flag)
            }
            "--cashflows" => {
                config.cashflow_count = parse_number(&next_value(args, i, flag, "a number"), flag)
            }
            "--output" => output_path = Some(next_value(args, i, flag, "a file path")),
            _ => reject_unknown(flag),
        }
        i += 1;
    }

    let store = generate_random_portfolio(&config);
    let json = serde_json::to_string_pretty(&store).unwrap_or_else(|e| fail(e));

    if let Some(path) = output_path {
        fs::write(&path, &json)
            .unwrap_or_else(|e| fail(format!("could not write to '{}': {}", path, e)));
        eprintln!(
            "Generated {} opportunities, {} accounts, {} cashflows → {}",
            config.opportunity_count, config.account_count, config.cashflow_count, path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "rank" => cmd_rank(rest),
        "metrics" => cmd_metrics(rest),
        "debug" => cmd_debug(rest),
        "ice" => cmd_ice(rest),
        "compare" => cmd_compare(rest),
        "simulate" => cmd_simulate(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
