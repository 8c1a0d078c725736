//! The per-vehicle table at the centre of the pipeline.
use crate::classify::{Hub, Powertrain, VehicleGroup};
use serde::Serialize;

/// One fully derived row of the per-vehicle table.
///
/// Built once per run by [`crate::metrics::derive_records`] and immutable afterwards;
/// every aggregation reads the same slice. Column names follow the simulator's
/// attribute names for the raw fields so the CSV lines up with the XML source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleRecord {
    /// Unique vehicle id assigned by the simulator
    pub id: String,
    /// Vehicle type label, if the simulator reported one
    #[serde(rename = "vType")]
    pub v_type: Option<String>,
    /// Route length in metres
    #[serde(rename = "routeLength")]
    pub route_length_m: f64,
    /// Total trip duration in seconds, service stops included
    #[serde(rename = "duration")]
    pub duration_s: f64,
    /// Absolute tailpipe CO2 over the trip in milligrams (HBEFA)
    #[serde(rename = "CO2_abs")]
    pub co2_mg: f64,
    /// Absolute fuel use over the trip in milligrams (HBEFA)
    #[serde(rename = "fuel_abs")]
    pub fuel_mg: f64,
    /// Electrical energy in Wh, whichever source supplied it
    #[serde(rename = "energy_Wh")]
    pub energy_wh: Option<f64>,

    /// Operational role, classified from the id prefix
    pub vehicle_group: VehicleGroup,
    /// Logistics hub, classified from the id prefix (meaningful for trucks)
    pub hub: Hub,
    /// Propulsion technology, inferred from the `vType` label
    pub powertrain: Powertrain,

    /// Route length in km
    pub distance_km: f64,
    /// Total trip duration in minutes
    pub travel_time_min: f64,
    /// Tailpipe CO2 in grams
    #[serde(rename = "CO2_g")]
    pub co2_g: f64,
    /// Tailpipe CO2 in kilograms
    #[serde(rename = "CO2_kg")]
    pub co2_kg: f64,
    /// Fuel in grams
    pub fuel_g: f64,
    /// Fuel in kilograms
    pub fuel_kg: f64,
    /// Tailpipe CO2 per km; undefined for zero-distance trips
    #[serde(rename = "CO2_kg_per_km")]
    pub co2_kg_per_km: Option<f64>,
    /// Fuel per km; undefined for zero-distance trips
    pub fuel_kg_per_km: Option<f64>,
    /// Electrical energy in kWh, if known
    #[serde(rename = "energy_kWh")]
    pub energy_kwh: Option<f64>,
    /// Electrical energy per km; undefined without energy data or for zero distance
    #[serde(rename = "energy_kWh_per_km")]
    pub energy_kwh_per_km: Option<f64>,
    /// Fixed service (loading/unloading) time in seconds; zero outside the truck fleet
    pub service_time_s: f64,
    /// Trip duration net of service time, in minutes.
    ///
    /// Negative values are possible when a trip was shorter than the configured service
    /// time and are deliberately left visible as a data-quality signal.
    pub driving_time_min: f64,
    /// CO2 attributed to electricity generation, in kg; zero for non-EVs and for EVs
    /// with no energy data
    #[serde(rename = "indirect_CO2_kg")]
    pub indirect_co2_kg: f64,
    /// Tailpipe plus indirect CO2, in kg
    #[serde(rename = "total_CO2_kg_combined")]
    pub total_co2_kg_combined: f64,
}

impl VehicleRecord {
    /// Whether this vehicle belongs to the logistics truck fleet
    pub fn is_logistics_truck(&self) -> bool {
        self.vehicle_group == VehicleGroup::LogisticsTruck
    }
}
