pub mod apr;
pub mod money;
