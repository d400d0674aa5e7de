pub mod float;
pub mod scenario_gen;
pub mod timeline;
