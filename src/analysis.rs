//! Orchestration of a single analysis run.
//!
//! One invocation is one linear pass: load the mandatory streams, load the optional
//! battery stream, classify and derive, aggregate, write. Structural errors abort
//! before anything is written; a missing battery stream merely leaves the energy
//! columns empty. No state survives between runs, so independent runs can be processed
//! in parallel by independent processes.
use crate::config::AnalysisConfig;
use crate::input::battery::load_battery_totals;
use crate::input::tripinfo::load_tripinfo;
use crate::metrics::derive_records;
use crate::output::DataWriter;
use crate::summary::{summarize_by_group, summarize_by_group_powertrain, summarize_trucks_by_hub};
use crate::vehicle::VehicleRecord;
use anyhow::{Context, Result};
use log::info;
use std::path::Path;

/// Run the full pipeline and write all output tables.
///
/// # Arguments
///
/// * `tripinfo_path` - The mandatory tripinfo file
/// * `battery_path` - The optional battery file (skipped silently when absent)
/// * `config` - The analysis configuration
/// * `output_path` - Folder where the CSV tables will be saved
pub fn run(
    tripinfo_path: &Path,
    battery_path: &Path,
    config: &AnalysisConfig,
    output_path: &Path,
) -> Result<()> {
    let records = load_records(tripinfo_path, battery_path, config)?;

    let group_summary = summarize_by_group(&records);
    let group_powertrain_summary = summarize_by_group_powertrain(&records);
    let hub_summary = summarize_trucks_by_hub(&records);

    info!("Summary by vehicle group:");
    for row in &group_summary {
        info!(
            "  {}: {} vehicles, {:.1} km mean distance, {:.3} kg combined CO2",
            row.vehicle_group, row.n_vehicles, row.mean_distance_km, row.combined_co2_kg
        );
    }
    if hub_summary.is_empty() {
        info!("No logistics trucks found in this run; skipping the hub summary");
    }

    let mut writer = DataWriter::create(output_path)
        .with_context(|| format!("Failed to create output files in {}", output_path.display()))?;
    writer.write_vehicles(&records)?;
    writer.write_group_summary(&group_summary)?;
    writer.write_group_powertrain_summary(&group_powertrain_summary)?;
    writer.write_hub_summary(&hub_summary)?;
    writer.flush()?;
    info!("CSV tables written to {}", output_path.display());

    Ok(())
}

/// Load both telemetry streams and build the per-vehicle table.
///
/// Shared by the analyze and validate commands; validation stops here.
pub fn load_records(
    tripinfo_path: &Path,
    battery_path: &Path,
    config: &AnalysisConfig,
) -> Result<Vec<VehicleRecord>> {
    let trips = load_tripinfo(tripinfo_path)
        .with_context(|| format!("Failed to load {}", tripinfo_path.display()))?;
    info!(
        "Loaded {} vehicles from {}",
        trips.len(),
        tripinfo_path.display()
    );

    let energy_totals = load_battery_totals(battery_path);
    if let Some(totals) = &energy_totals {
        info!(
            "Loaded energy totals for {} vehicles from {}",
            totals.len(),
            battery_path.display()
        );
    }

    derive_records(trips, energy_totals.as_ref(), config)
}
