//! Engine services: history, indicators, classification, planning,
//! accuracy tracking, index aggregation and the refresh scheduler.

pub mod accuracy;
pub mod classifier;
pub mod coordinator;
pub mod history;
pub mod indicators;
pub mod planner;
pub mod store;
pub mod summary;
