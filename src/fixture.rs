//! Fixtures for tests
use crate::config::AnalysisConfig;
use crate::input::battery::EnergyTotals;
use crate::input::tripinfo::TripRecord;
use crate::metrics::derive_records;
use crate::vehicle::VehicleRecord;
use indexmap::indexmap;
use rstest::fixture;

/// Assert that an error whose message contains the given text occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {{
        let message = $result.unwrap_err().to_string();
        assert!(
            message.contains($msg),
            "error message '{message}' does not contain '{}'",
            $msg
        );
    }};
}
pub(crate) use assert_error;

#[fixture]
pub fn config() -> AnalysisConfig {
    AnalysisConfig::default()
}

/// An electric logistics truck with no emissions and no inline electricity
#[fixture]
pub fn ev_trip() -> TripRecord {
    TripRecord {
        id: "T_SPAR_9".into(),
        v_type: Some("truck_ev".into()),
        route_length_m: 12000.0,
        duration_s: 1800.0,
        co2_mg: 0.0,
        fuel_mg: 0.0,
        electricity_wh: None,
    }
}

/// A Diesel logistics truck with tailpipe emissions
#[fixture]
pub fn diesel_trip() -> TripRecord {
    TripRecord {
        id: "T_UCS_3".into(),
        v_type: Some("truck_euro6".into()),
        route_length_m: 9000.0,
        duration_s: 1500.0,
        co2_mg: 1_500_000.0,
        fuel_mg: 480_000.0,
        electricity_wh: None,
    }
}

/// A small run covering every fleet role, three hubs and all powertrain categories
#[fixture]
pub fn mixed_trips() -> Vec<TripRecord> {
    let trip = |id: &str, v_type: Option<&str>, route_m: f64, duration_s: f64, co2_mg: f64| {
        TripRecord {
            id: id.into(),
            v_type: v_type.map(str::to_string),
            route_length_m: route_m,
            duration_s,
            co2_mg,
            fuel_mg: co2_mg * 0.32,
            electricity_wh: None,
        }
    };

    vec![
        trip("T_ROS2_1", Some("truck_ev"), 10000.0, 1800.0, 0.0),
        trip("T_ROS34_1", Some("truck_ev"), 8000.0, 1700.0, 0.0),
        trip("T_SPAR_1", Some("truck_euro6"), 11000.0, 2000.0, 2_000_000.0),
        trip("bgt_1", Some("truck_euro6"), 6000.0, 900.0, 1_000_000.0),
        trip("bgc_1", Some("car"), 3000.0, 400.0, 500_000.0),
        trip("F_2", None, 2500.0, 350.0, 400_000.0),
        trip("tram_1", None, 0.0, 600.0, 100_000.0),
    ]
}

/// Battery totals for the two EV trucks in [`mixed_trips`]
#[fixture]
pub fn energy_totals() -> EnergyTotals {
    indexmap! {
        "T_ROS2_1".to_string() => 15000.0,
        "T_ROS34_1".to_string() => 5000.0,
    }
}

/// The fully derived per-vehicle table for [`mixed_trips`]
#[fixture]
pub fn mixed_records(
    mixed_trips: Vec<TripRecord>,
    energy_totals: EnergyTotals,
    config: AnalysisConfig,
) -> Vec<VehicleRecord> {
    derive_records(mixed_trips, Some(&energy_totals), &config).unwrap()
}

/// The same table derived without any energy source
#[fixture]
pub fn records_without_energy(
    mixed_trips: Vec<TripRecord>,
    config: AnalysisConfig,
) -> Vec<VehicleRecord> {
    derive_records(mixed_trips, None, &config).unwrap()
}
