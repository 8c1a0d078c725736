//! Derivation of the per-vehicle table from the raw telemetry.
//!
//! This is the only place derived columns are computed; downstream stages read them as
//! plain data and never recompute. Missing energy figures stay `None` all the way into
//! the output tables, and a negative driving time is left visible rather than clamped.
use crate::classify::{Hub, Powertrain, VehicleGroup};
use crate::config::AnalysisConfig;
use crate::input::battery::EnergyTotals;
use crate::input::tripinfo::TripRecord;
use crate::units;
use crate::vehicle::VehicleRecord;
use anyhow::{Result, bail};

/// Build the per-vehicle table: classify each trip record and compute every derived
/// column.
///
/// `energy_totals` carries the battery stream, when one was usable. A vehicle with both
/// an inline `electricity_abs` figure and a battery total is rejected as a
/// configuration error; the two sources must never be summed.
pub fn derive_records(
    trips: Vec<TripRecord>,
    energy_totals: Option<&EnergyTotals>,
    config: &AnalysisConfig,
) -> Result<Vec<VehicleRecord>> {
    trips
        .into_iter()
        .map(|trip| derive_record(trip, energy_totals, config))
        .collect()
}

/// Derive one row of the per-vehicle table
fn derive_record(
    trip: TripRecord,
    energy_totals: Option<&EnergyTotals>,
    config: &AnalysisConfig,
) -> Result<VehicleRecord> {
    let vehicle_group = VehicleGroup::from_id(&trip.id);
    let hub = Hub::from_id(&trip.id);
    let powertrain = Powertrain::from_vtype(trip.v_type.as_deref(), config);

    let battery_wh = energy_totals.and_then(|totals| totals.get(&trip.id).copied());
    let energy_wh = match (trip.electricity_wh, battery_wh) {
        (Some(_), Some(_)) => bail!(
            "Vehicle '{}' has both an inline electricity_abs figure and a battery \
             total; the two energy sources cannot be combined",
            trip.id
        ),
        (inline, battery) => inline.or(battery),
    };

    let distance_km = units::m_to_km(trip.route_length_m);
    let co2_kg = units::mg_to_kg(trip.co2_mg);
    let fuel_kg = units::mg_to_kg(trip.fuel_mg);
    let energy_kwh = energy_wh.map(units::wh_to_kwh);

    let service_time_s = if vehicle_group == VehicleGroup::LogisticsTruck {
        config.service_time_s
    } else {
        0.0
    };

    // Only EVs with known energy accrue indirect emissions; nothing is imputed
    let indirect_co2_kg = match (powertrain, energy_kwh) {
        (Powertrain::Ev, Some(energy_kwh)) => energy_kwh * config.grid_co2_kg_per_kwh,
        _ => 0.0,
    };

    Ok(VehicleRecord {
        vehicle_group,
        hub,
        powertrain,
        distance_km,
        travel_time_min: units::s_to_min(trip.duration_s),
        co2_g: units::mg_to_g(trip.co2_mg),
        co2_kg,
        fuel_g: units::mg_to_g(trip.fuel_mg),
        fuel_kg,
        co2_kg_per_km: units::per_km(co2_kg, distance_km),
        fuel_kg_per_km: units::per_km(fuel_kg, distance_km),
        energy_kwh,
        energy_kwh_per_km: energy_kwh.and_then(|kwh| units::per_km(kwh, distance_km)),
        service_time_s,
        driving_time_min: units::s_to_min(trip.duration_s - service_time_s),
        indirect_co2_kg,
        total_co2_kg_combined: co2_kg + indirect_co2_kg,
        id: trip.id,
        v_type: trip.v_type,
        route_length_m: trip.route_length_m,
        duration_s: trip.duration_s,
        co2_mg: trip.co2_mg,
        fuel_mg: trip.fuel_mg,
        energy_wh,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, config, diesel_trip, ev_trip};
    use float_cmp::assert_approx_eq;
    use indexmap::indexmap;
    use rstest::rstest;

    #[rstest]
    fn test_truck_driving_time(config: AnalysisConfig, ev_trip: TripRecord) {
        let trip = TripRecord {
            duration_s: 1200.0,
            ..ev_trip
        };

        let record = derive_record(trip, None, &config).unwrap();
        assert_approx_eq!(f64, record.service_time_s, 600.0);
        assert_approx_eq!(f64, record.driving_time_min, 10.0);
    }

    #[rstest]
    fn test_background_vehicles_have_no_service_time(config: AnalysisConfig) {
        let trip = TripRecord {
            id: "bgc_1".into(),
            v_type: Some("car".into()),
            route_length_m: 3000.0,
            duration_s: 300.0,
            co2_mg: 0.0,
            fuel_mg: 0.0,
            electricity_wh: None,
        };

        let record = derive_record(trip, None, &config).unwrap();
        assert_approx_eq!(f64, record.service_time_s, 0.0);
        assert_approx_eq!(f64, record.driving_time_min, 5.0);
    }

    /// A trip shorter than the service time surfaces as a negative driving time
    #[rstest]
    fn test_negative_driving_time_is_not_clamped(config: AnalysisConfig, ev_trip: TripRecord) {
        let trip = TripRecord {
            duration_s: 300.0,
            ..ev_trip
        };

        let record = derive_record(trip, None, &config).unwrap();
        assert_approx_eq!(f64, record.driving_time_min, -5.0);
    }

    #[rstest]
    fn test_indirect_co2_for_ev(config: AnalysisConfig, ev_trip: TripRecord) {
        let totals = indexmap! { ev_trip.id.clone() => 50_000.0 };

        let record = derive_record(ev_trip, Some(&totals), &config).unwrap();
        assert_approx_eq!(f64, record.energy_kwh.unwrap(), 50.0);
        assert_approx_eq!(f64, record.indirect_co2_kg, 10.0); // 50 kWh * 0.20 kg/kWh
        assert_approx_eq!(f64, record.total_co2_kg_combined, 10.0);
    }

    #[rstest]
    fn test_no_indirect_co2_for_diesel(config: AnalysisConfig, diesel_trip: TripRecord) {
        let totals = indexmap! { diesel_trip.id.clone() => 50_000.0 };

        let record = derive_record(diesel_trip, Some(&totals), &config).unwrap();
        assert_approx_eq!(f64, record.indirect_co2_kg, 0.0);

        // Tailpipe CO2 still counts towards the combined figure
        assert_approx_eq!(f64, record.total_co2_kg_combined, record.co2_kg);
    }

    #[rstest]
    fn test_ev_without_energy_data(config: AnalysisConfig, ev_trip: TripRecord) {
        let record = derive_record(ev_trip, None, &config).unwrap();
        assert_eq!(record.energy_kwh, None);
        assert_eq!(record.energy_kwh_per_km, None);
        assert_approx_eq!(f64, record.indirect_co2_kg, 0.0);
    }

    #[rstest]
    fn test_zero_distance_ratios_are_undefined(config: AnalysisConfig, diesel_trip: TripRecord) {
        let trip = TripRecord {
            route_length_m: 0.0,
            ..diesel_trip
        };

        let record = derive_record(trip, None, &config).unwrap();
        assert_eq!(record.co2_kg_per_km, None);
        assert_eq!(record.fuel_kg_per_km, None);
    }

    #[rstest]
    fn test_both_energy_sources_rejected(config: AnalysisConfig, ev_trip: TripRecord) {
        let trip = TripRecord {
            electricity_wh: Some(1000.0),
            ..ev_trip
        };
        let totals = indexmap! { trip.id.clone() => 2000.0 };

        assert_error!(
            derive_record(trip, Some(&totals), &config),
            "both an inline electricity_abs figure and a battery"
        );
    }

    #[rstest]
    fn test_inline_electricity_feeds_energy_column(config: AnalysisConfig, ev_trip: TripRecord) {
        let trip = TripRecord {
            electricity_wh: Some(8000.0),
            ..ev_trip
        };

        let record = derive_record(trip, None, &config).unwrap();
        assert_approx_eq!(f64, record.energy_kwh.unwrap(), 8.0);
        assert_approx_eq!(f64, record.indirect_co2_kg, 1.6);
    }
}
