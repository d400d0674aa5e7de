pub mod account;
pub mod cashflow;
pub mod ids;
pub mod opportunity;
pub mod validation;
