//! # opportunity-evaluator
//!
//! Scores, ranks and simulates money-making opportunities.
//!
//! Each opportunity carries an up-front investment, an expected return and a
//! turnaround. The engine derives per-opportunity metrics, blends them into a
//! composite score, optionally ranks by ICE (impact × confidence / ease), and
//! replays a day-by-day cash timeline that borrows from credit accounts
//! whenever cash runs short.
//!
//! ## Architecture
//!
//! - **core**: Records: opportunities, accounts, cashflow events, ids
//! - **finance**: APR and interest arithmetic, minor-unit conversion
//! - **scoring**: Metrics, min-max normalization, composite and ICE rankers
//! - **simulation**: Event timeline and the float simulator
//! - **store** / **service**: Storage seam and request-level entry points
//! - **config**: Capability switches and simulation limits

pub mod config;
pub mod core;
pub mod error;
pub mod finance;
pub mod scoring;
pub mod service;
pub mod simulation;
pub mod store;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::config::{Capabilities, Config};
    pub use crate::core::account::{Account, AccountType};
    pub use crate::core::cashflow::{CashflowEvent, CashflowKind};
    pub use crate::core::ids::{AccountId, OpportunityId};
    pub use crate::core::opportunity::Opportunity;
    pub use crate::error::{EvaluatorError, Result};
    pub use crate::scoring::composite::{CompositeRanker, RankedOpportunity, RankingQuery};
    pub use crate::scoring::ice::{IceRanked, IceRanker, RankComparison};
    pub use crate::scoring::metrics::{compute_metrics, Metrics};
    pub use crate::service::{EvaluatorService, SimulateRequest};
    pub use crate::simulation::float::{FloatSimulator, SimulationInput, SimulationResult};
    pub use crate::store::{InMemoryStore, Store};
}
