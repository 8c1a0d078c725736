//! Classification of vehicles from their simulator identifiers.
//!
//! All three classifiers are pure and total: any input string maps to exactly one
//! category, with an explicit catch-all for ids and types outside the naming scheme.
//! Unmatched values are a data-quality signal for the reviewer, not an error.
use crate::config::AnalysisConfig;
use serde::Serializer;
use std::fmt::Display;

/// Serialize an enum via its `Display` label so CSV columns carry the report names
macro_rules! serialize_via_display {
    ($t:ty) => {
        impl serde::Serialize for $t {
            fn serialize<S: Serializer>(&self, serialiser: S) -> Result<S::Ok, S::Error> {
                serialiser.collect_str(self)
            }
        }
    };
}

/// The operational role of a vehicle in the scenario
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VehicleGroup {
    /// A truck belonging to one of the logistics hubs
    LogisticsTruck,
    /// Background freight traffic
    BackgroundTruck,
    /// Background passenger traffic
    BackgroundCar,
    /// Anything outside the naming scheme
    Other,
}

impl VehicleGroup {
    /// Classify a vehicle by its id prefix; first matching rule wins.
    pub fn from_id(id: &str) -> Self {
        if id.starts_with("T_") {
            Self::LogisticsTruck
        } else if id.starts_with("bgt_") {
            Self::BackgroundTruck
        } else if id.starts_with("bgc_") || id.starts_with("F_") {
            Self::BackgroundCar
        } else {
            Self::Other
        }
    }
}

impl Display for VehicleGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::LogisticsTruck => "logistics_truck",
            Self::BackgroundTruck => "background_truck",
            Self::BackgroundCar => "background_car",
            Self::Other => "other",
        };
        write!(f, "{label}")
    }
}
serialize_via_display!(VehicleGroup);

/// The logistics hub a truck belongs to, encoded in its id
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Hub {
    /// SPAR distribution centre
    Spar,
    /// UCS depot
    Ucs,
    /// TGW depot
    Tgw,
    /// Roswell site 2
    Roswell2,
    /// Roswell sites 3 and 4 (served jointly)
    Roswell34,
    /// No recognised hub prefix
    Other,
}

impl Hub {
    /// Map a logistics truck id to its hub.
    ///
    /// Matches the current naming scheme: `T_SPAR_*`, `T_UCS_*`, `T_TGW_*`, `T_ROS2_*`,
    /// `T_ROS34_*`. The Roswell rules use the full site prefixes so that `T_ROS2` and
    /// `T_ROS34` ids, which share the `T_ROS` stem, cannot shadow each other.
    pub fn from_id(id: &str) -> Self {
        if id.starts_with("T_SPAR") {
            Self::Spar
        } else if id.starts_with("T_UCS") {
            Self::Ucs
        } else if id.starts_with("T_TGW") {
            Self::Tgw
        } else if id.starts_with("T_ROS34") {
            Self::Roswell34
        } else if id.starts_with("T_ROS2") {
            Self::Roswell2
        } else {
            Self::Other
        }
    }
}

impl Display for Hub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Spar => "SPAR",
            Self::Ucs => "UCS",
            Self::Tgw => "TGW",
            Self::Roswell2 => "Roswell2",
            Self::Roswell34 => "Roswell3&4",
            Self::Other => "other",
        };
        write!(f, "{label}")
    }
}
serialize_via_display!(Hub);

/// The propulsion technology inferred from a vehicle's `vType` label
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Powertrain {
    /// Battery-electric
    Ev,
    /// Diesel combustion
    Diesel,
    /// A type label that matched neither set nor the heuristic
    Other,
    /// No `vType` reported at all
    Unknown,
}

impl Powertrain {
    /// Infer the powertrain from a `vType` label.
    ///
    /// Exact membership in the configured EV/Diesel sets is checked first. The
    /// substring heuristic afterwards ("ev"/"electric" anywhere in the label) is a
    /// deliberately loose fallback for type names nobody added to the config yet.
    pub fn from_vtype(vtype: Option<&str>, config: &AnalysisConfig) -> Self {
        let Some(vtype) = vtype else {
            return Self::Unknown;
        };
        if config.ev_types.contains(vtype) {
            return Self::Ev;
        }
        if config.diesel_types.contains(vtype) {
            return Self::Diesel;
        }

        let lower = vtype.to_lowercase();
        if lower.contains("ev") || lower.contains("electric") {
            Self::Ev
        } else {
            Self::Other
        }
    }
}

impl Display for Powertrain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Ev => "EV",
            Self::Diesel => "Diesel",
            Self::Other => "Other",
            Self::Unknown => "unknown",
        };
        write!(f, "{label}")
    }
}
serialize_via_display!(Powertrain);
