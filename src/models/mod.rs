pub mod chart;
pub mod error;
pub mod metrics;
pub mod selection;
