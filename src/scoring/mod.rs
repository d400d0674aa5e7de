pub mod composite;
pub mod debug;
pub mod ice;
pub mod metrics;
pub mod normalize;
