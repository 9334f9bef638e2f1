//! Common functionality for fleetplan.
#![warn(missing_docs)]
pub mod catalog;
pub mod cli;
pub mod demand;
pub mod fleet;
pub mod gap;
pub mod id;
pub mod input;
pub mod log;
pub mod output;
pub mod planner;
pub mod planning;
pub mod scenario;
pub mod schedule;
pub mod series;
pub mod settings;
pub mod units;

#[cfg(test)]
mod fixture;
