//! Aggregation of the per-vehicle table into summary tables.
//!
//! Three independent groupby-reduces over the same immutable slice: by fleet role, by
//! role and powertrain, and (for logistics trucks only) by hub and powertrain. Groups
//! are formed only from values present in the data; absent categories produce no row.
//! Means over optional columns average the values that exist and stay empty when none
//! do, mirroring how missing energy data flows through the rest of the pipeline.
use crate::classify::{Hub, Powertrain, VehicleGroup};
use crate::vehicle::VehicleRecord;
use itertools::Itertools;
use serde::Serialize;
use std::hash::Hash;

/// Summary of all vehicles sharing one fleet role
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummaryRow {
    /// The fleet role this row covers
    pub vehicle_group: VehicleGroup,
    /// Number of vehicles in the group
    pub n_vehicles: usize,
    /// Mean total trip time in minutes
    pub mean_travel_time_min: f64,
    /// Mean trip time net of service stops, in minutes
    pub mean_driving_time_min: f64,
    /// Mean trip distance in km
    pub mean_distance_km: f64,
    /// Total tailpipe CO2 in kg
    #[serde(rename = "tailpipe_CO2_kg")]
    pub tailpipe_co2_kg: f64,
    /// Total indirect (electricity-sourced) CO2 in kg
    #[serde(rename = "indirect_CO2_kg")]
    pub indirect_co2_kg: f64,
    /// Total combined CO2 in kg
    #[serde(rename = "combined_CO2_kg")]
    pub combined_co2_kg: f64,
    /// Mean tailpipe CO2 per vehicle in kg
    #[serde(rename = "mean_CO2_kg")]
    pub mean_co2_kg: f64,
    /// Mean tailpipe CO2 per km, over vehicles with a defined ratio
    #[serde(rename = "mean_CO2_kg_per_km")]
    pub mean_co2_kg_per_km: Option<f64>,
    /// Mean energy use in kWh, over vehicles with energy data
    #[serde(rename = "mean_energy_kWh")]
    pub mean_energy_kwh: Option<f64>,
    /// Total energy use in kWh; empty when no vehicle in the group has energy data
    #[serde(rename = "total_energy_kWh")]
    pub total_energy_kwh: Option<f64>,
}

/// Summary of all vehicles sharing a fleet role and a powertrain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupPowertrainSummaryRow {
    /// The fleet role this row covers
    pub vehicle_group: VehicleGroup,
    /// The powertrain this row covers
    pub powertrain: Powertrain,
    /// Number of vehicles in the partition
    pub n_vehicles: usize,
    /// Mean trip distance in km
    pub mean_distance_km: f64,
    /// Total tailpipe CO2 in kg
    #[serde(rename = "tailpipe_CO2_kg")]
    pub tailpipe_co2_kg: f64,
    /// Total indirect CO2 in kg
    #[serde(rename = "indirect_CO2_kg")]
    pub indirect_co2_kg: f64,
    /// Total combined CO2 in kg
    #[serde(rename = "combined_CO2_kg")]
    pub combined_co2_kg: f64,
    /// Total energy use in kWh
    #[serde(rename = "total_energy_kWh")]
    pub total_energy_kwh: Option<f64>,
}

/// Summary of the logistics trucks serving one hub with one powertrain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HubSummaryRow {
    /// The hub this row covers
    pub hub: Hub,
    /// The powertrain this row covers
    pub powertrain: Powertrain,
    /// Number of trucks in the partition
    pub n_vehicles: usize,
    /// Mean total trip time in minutes
    pub mean_travel_time_min: f64,
    /// Mean trip time net of service stops, in minutes
    pub mean_driving_time_min: f64,
    /// Mean trip distance in km
    pub mean_distance_km: f64,
    /// Total tailpipe CO2 in kg
    #[serde(rename = "tailpipe_CO2_kg")]
    pub tailpipe_co2_kg: f64,
    /// Total indirect CO2 in kg
    #[serde(rename = "indirect_CO2_kg")]
    pub indirect_co2_kg: f64,
    /// Total combined CO2 in kg
    #[serde(rename = "combined_CO2_kg")]
    pub combined_co2_kg: f64,
    /// Total energy use in kWh
    #[serde(rename = "total_energy_kWh")]
    pub total_energy_kwh: Option<f64>,
}

/// Summarise the whole table by fleet role
pub fn summarize_by_group(records: &[VehicleRecord]) -> Vec<GroupSummaryRow> {
    partition(records.iter(), |record| record.vehicle_group)
        .map(|(vehicle_group, rows)| GroupSummaryRow {
            vehicle_group,
            n_vehicles: rows.len(),
            mean_travel_time_min: mean(&rows, |r| r.travel_time_min),
            mean_driving_time_min: mean(&rows, |r| r.driving_time_min),
            mean_distance_km: mean(&rows, |r| r.distance_km),
            tailpipe_co2_kg: sum(&rows, |r| r.co2_kg),
            indirect_co2_kg: sum(&rows, |r| r.indirect_co2_kg),
            combined_co2_kg: sum(&rows, |r| r.total_co2_kg_combined),
            mean_co2_kg: mean(&rows, |r| r.co2_kg),
            mean_co2_kg_per_km: mean_present(&rows, |r| r.co2_kg_per_km),
            mean_energy_kwh: mean_present(&rows, |r| r.energy_kwh),
            total_energy_kwh: sum_present(&rows, |r| r.energy_kwh),
        })
        .collect()
}

/// Summarise the whole table by fleet role and powertrain
pub fn summarize_by_group_powertrain(records: &[VehicleRecord]) -> Vec<GroupPowertrainSummaryRow> {
    partition(records.iter(), |record| {
        (record.vehicle_group, record.powertrain)
    })
    .map(|((vehicle_group, powertrain), rows)| GroupPowertrainSummaryRow {
        vehicle_group,
        powertrain,
        n_vehicles: rows.len(),
        mean_distance_km: mean(&rows, |r| r.distance_km),
        tailpipe_co2_kg: sum(&rows, |r| r.co2_kg),
        indirect_co2_kg: sum(&rows, |r| r.indirect_co2_kg),
        combined_co2_kg: sum(&rows, |r| r.total_co2_kg_combined),
        total_energy_kwh: sum_present(&rows, |r| r.energy_kwh),
    })
    .collect()
}

/// Summarise the logistics truck fleet by hub and powertrain.
///
/// Returns an empty table when the run contains no logistics trucks; the caller skips
/// the corresponding output file in that case.
pub fn summarize_trucks_by_hub(records: &[VehicleRecord]) -> Vec<HubSummaryRow> {
    let trucks = records.iter().filter(|r| r.is_logistics_truck());
    partition(trucks, |record| (record.hub, record.powertrain))
        .map(|((hub, powertrain), rows)| HubSummaryRow {
            hub,
            powertrain,
            n_vehicles: rows.len(),
            mean_travel_time_min: mean(&rows, |r| r.travel_time_min),
            mean_driving_time_min: mean(&rows, |r| r.driving_time_min),
            mean_distance_km: mean(&rows, |r| r.distance_km),
            tailpipe_co2_kg: sum(&rows, |r| r.co2_kg),
            indirect_co2_kg: sum(&rows, |r| r.indirect_co2_kg),
            combined_co2_kg: sum(&rows, |r| r.total_co2_kg_combined),
            total_energy_kwh: sum_present(&rows, |r| r.energy_kwh),
        })
        .collect()
}

/// Group records by a key, yielding groups in ascending key order for stable output
fn partition<'a, K, I>(
    records: I,
    key: impl Fn(&VehicleRecord) -> K,
) -> impl Iterator<Item = (K, Vec<&'a VehicleRecord>)>
where
    K: Copy + Ord + Hash,
    I: Iterator<Item = &'a VehicleRecord>,
{
    records
        .map(|record| (key(record), record))
        .into_group_map()
        .into_iter()
        .sorted_by_key(|(key, _)| *key)
}

/// Mean of a column over a (non-empty) group
fn mean(rows: &[&VehicleRecord], column: impl Fn(&VehicleRecord) -> f64) -> f64 {
    sum(rows, column) / rows.len() as f64
}

/// Sum of a column over a group
fn sum(rows: &[&VehicleRecord], column: impl Fn(&VehicleRecord) -> f64) -> f64 {
    rows.iter().map(|row| column(row)).sum()
}

/// Mean of an optional column over the rows where it is defined
fn mean_present(
    rows: &[&VehicleRecord],
    column: impl Fn(&VehicleRecord) -> Option<f64>,
) -> Option<f64> {
    let values: Vec<f64> = rows.iter().filter_map(|row| column(row)).collect();
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

/// Sum of an optional column; `None` when no row defines it
fn sum_present(
    rows: &[&VehicleRecord],
    column: impl Fn(&VehicleRecord) -> Option<f64>,
) -> Option<f64> {
    rows.iter()
        .filter_map(|row| column(row))
        .fold(None, |acc, value| Some(acc.unwrap_or(0.0) + value))
}
