pub mod aggregate;
pub mod animator;
pub mod api;
pub mod orchestrator;
pub mod persistence;
pub mod query;
