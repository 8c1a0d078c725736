//! Code for loading the analysis configuration.
//!
//! The configuration covers the fixed constants of a run: the service time embedded in
//! each logistics truck's reported duration, the grid carbon-intensity factor used for
//! indirect-emissions accounting and the `vType` labels recognised as EV or Diesel. It is
//! read once per run and never mutated afterwards.
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Default service (loading/unloading) time per logistics truck, in seconds
const DEFAULT_SERVICE_TIME_S: f64 = 600.0;

/// Default grid CO2 factor in kg per kWh (typical Austrian grid mix)
const DEFAULT_GRID_CO2_KG_PER_KWH: f64 = 0.20;

fn default_service_time_s() -> f64 {
    DEFAULT_SERVICE_TIME_S
}

fn default_grid_co2_kg_per_kwh() -> f64 {
    DEFAULT_GRID_CO2_KG_PER_KWH
}

fn default_ev_types() -> HashSet<String> {
    ["truck_ev".to_string()].into_iter().collect()
}

fn default_diesel_types() -> HashSet<String> {
    ["truck_euro6".to_string()].into_iter().collect()
}

fn default_log_level() -> String {
    crate::log::DEFAULT_LOG_LEVEL.to_string()
}

/// Analysis configuration, read from an optional TOML file
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    /// Service (discharge/loading) time per logistics truck in seconds
    #[serde(default = "default_service_time_s")]
    pub service_time_s: f64,
    /// Grid CO2 emission factor in kg per kWh, for indirect emissions of EVs
    #[serde(default = "default_grid_co2_kg_per_kwh")]
    pub grid_co2_kg_per_kwh: f64,
    /// `vType` ids classified as battery-electric
    #[serde(default = "default_ev_types")]
    pub ev_types: HashSet<String>,
    /// `vType` ids classified as Diesel
    #[serde(default = "default_diesel_types")]
    pub diesel_types: HashSet<String>,
    /// The default program log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        toml::from_str("").expect("Cannot create config from empty TOML file")
    }
}

impl AnalysisConfig {
    /// Read the configuration from the given file, if provided.
    ///
    /// With no file the documented defaults are used; naming a file that does not
    /// exist is an error.
    pub fn load(file_path: Option<&Path>) -> Result<Self> {
        let Some(file_path) = file_path else {
            return Ok(Self::default());
        };

        let contents = fs::read_to_string(file_path)
            .with_context(|| format!("Could not read config file {}", file_path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Could not parse config file {}", file_path.display()))
    }
}
