//! Common functionality for fleetreport.
#![warn(missing_docs)]
pub mod analysis;
pub mod classify;
pub mod cli;
pub mod config;
pub mod input;
pub mod log;
pub mod metrics;
pub mod output;
pub mod summary;
pub mod units;
pub mod vehicle;

#[cfg(test)]
mod fixture;
