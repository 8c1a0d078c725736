//! Unit conversions for the quantities SUMO reports.
//!
//! Trip distances arrive in metres, times in seconds, HBEFA emission and fuel totals in
//! milligrams and battery energy in watt-hours. All report columns use km, minutes,
//! g/kg and kWh.

/// Metres per kilometre
pub const M_PER_KM: f64 = 1000.0;

/// Seconds per minute
pub const S_PER_MIN: f64 = 60.0;

/// Milligrams per gram
pub const MG_PER_G: f64 = 1000.0;

/// Milligrams per kilogram
pub const MG_PER_KG: f64 = 1_000_000.0;

/// Watt-hours per kilowatt-hour
pub const WH_PER_KWH: f64 = 1000.0;

/// Convert a distance in metres to kilometres
pub fn m_to_km(metres: f64) -> f64 {
    metres / M_PER_KM
}

/// Convert a duration in seconds to minutes
pub fn s_to_min(seconds: f64) -> f64 {
    seconds / S_PER_MIN
}

/// Convert an HBEFA absolute total in milligrams to grams
pub fn mg_to_g(milligrams: f64) -> f64 {
    milligrams / MG_PER_G
}

/// Convert an HBEFA absolute total in milligrams to kilograms
pub fn mg_to_kg(milligrams: f64) -> f64 {
    milligrams / MG_PER_KG
}

/// Convert an energy total in watt-hours to kilowatt-hours
pub fn wh_to_kwh(watt_hours: f64) -> f64 {
    watt_hours / WH_PER_KWH
}

/// Divide `quantity` by a distance in kilometres, treating a zero distance as undefined.
///
/// A vehicle that never moved has no meaningful per-km figure; returning `None` keeps
/// the undefined value out of downstream means instead of poisoning them with
/// infinities.
pub fn per_km(quantity: f64, distance_km: f64) -> Option<f64> {
    (distance_km != 0.0).then(|| quantity / distance_km)
}
