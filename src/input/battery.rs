//! Defensive loader for the optional battery stream.
//!
//! SUMO's battery output changes shape with the simulation configuration: `<vehicle>`
//! elements may sit under timesteps or at the top level, the id attribute goes by
//! several names and the energy figures by several more. Nothing here is allowed to
//! fail the pipeline; every unusable shape degrades to "no data" so the run completes
//! with the energy columns empty.
use crate::input::{attr_ignore_case, parse_xml, read_xml_source};
use indexmap::IndexMap;
use log::{debug, warn};
use std::path::Path;

/// Attribute names accepted as the vehicle identifier, in lookup order
const ID_ALIASES: [&str; 4] = ["id", "vehicle", "vehid", "name"];

/// Attribute names accepted as energy figures (Wh), lowercased
const ENERGY_ALIASES: [&str; 5] = [
    "energyconsumed",
    "totalenergyconsumed",
    "chargingenergy",
    "dischargingenergy",
    "energy",
];

/// Which energy column is authoritative, most direct measure first.
///
/// The choice is made once for the whole table. When none of these columns appears
/// anywhere in the file, the last resort is the per-vehicle sum of every discovered
/// column, which may overcount charging.
const ENERGY_PRIORITY: [&str; 3] = ["energyconsumed", "totalenergyconsumed", "energy"];

/// Total energy use per vehicle in Wh, summed over the whole simulation
pub type EnergyTotals = IndexMap<String, f64>;

/// Load per-vehicle energy totals from a battery file, if one is usable.
///
/// Returns `None` when the file is absent, unreadable, not XML, or contains no
/// `<vehicle>` element with a recognisable id and a recognisable numeric energy
/// attribute. Repeated per-vehicle sub-records (one per simulation tick) are summed
/// into a single total per id. The authoritative energy column is chosen once for the
/// whole table; vehicles that never report it get no entry.
pub fn load_battery_totals(file_path: &Path) -> Option<EnergyTotals> {
    if !file_path.exists() {
        debug!("No battery file at {}", file_path.display());
        return None;
    }

    let source = match read_xml_source(file_path) {
        Ok(source) => source,
        Err(err) => {
            warn!("Ignoring battery file: {err:#}");
            return None;
        }
    };
    let doc = match parse_xml(&source, file_path) {
        Ok(doc) => doc,
        Err(err) => {
            warn!("Ignoring battery file: {err:#}");
            return None;
        }
    };

    // Per id, the sum of each discovered energy column across all sub-records
    let mut sums: IndexMap<String, IndexMap<&'static str, f64>> = IndexMap::new();
    for node in doc
        .descendants()
        .filter(|node| node.has_tag_name("vehicle"))
    {
        let Some(id) = ID_ALIASES
            .iter()
            .find_map(|alias| attr_ignore_case(node, alias))
        else {
            continue;
        };

        let columns = sums.entry(id.to_string()).or_default();
        for alias in ENERGY_ALIASES {
            let Some(value) = attr_ignore_case(node, alias).and_then(|raw| raw.parse::<f64>().ok())
            else {
                continue;
            };
            *columns.entry(alias).or_insert(0.0) += value;
        }
    }
    sums.retain(|_, columns| !columns.is_empty());

    if sums.is_empty() {
        warn!(
            "Battery file {} has no recognisable vehicle energy data; \
             continuing without energy totals",
            file_path.display()
        );
        return None;
    }

    let column = authoritative_column(&sums);
    let totals = sums
        .into_iter()
        .filter_map(|(id, columns)| {
            let total = match column {
                Some(column) => columns.get(column).copied()?,
                None => columns.values().sum(),
            };
            Some((id, total))
        })
        .collect();
    Some(totals)
}

/// Pick the one energy column that is authoritative for the whole table
fn authoritative_column(
    sums: &IndexMap<String, IndexMap<&'static str, f64>>,
) -> Option<&'static str> {
    ENERGY_PRIORITY
        .into_iter()
        .find(|alias| sums.values().any(|columns| columns.contains_key(alias)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use std::fs;
    use tempfile::tempdir;

    fn write_battery(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("battery.xml");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_absent_file_is_no_data() {
        let dir = tempdir().unwrap();
        assert_eq!(load_battery_totals(&dir.path().join("battery.xml")), None);
    }

    #[test]
    fn test_sums_across_timesteps() {
        let (_dir, path) = write_battery(
            r#"<battery-export>
                <timestep time="0">
                    <vehicle id="T_SPAR_0" energyConsumed="10.5"/>
                    <vehicle id="T_UCS_1" energyConsumed="3.0"/>
                </timestep>
                <timestep time="1">
                    <vehicle id="T_SPAR_0" energyConsumed="4.5"/>
                </timestep>
            </battery-export>"#,
        );

        let totals = load_battery_totals(&path).unwrap();
        assert_approx_eq!(f64, totals["T_SPAR_0"], 15.0);
        assert_approx_eq!(f64, totals["T_UCS_1"], 3.0);
    }

    #[test]
    fn test_id_aliases() {
        let (_dir, path) = write_battery(
            r#"<battery-export>
                <vehicle vehID="T_TGW_2" energyConsumed="7.0"/>
            </battery-export>"#,
        );

        let totals = load_battery_totals(&path).unwrap();
        assert_approx_eq!(f64, totals["T_TGW_2"], 7.0);
    }

    #[test]
    fn test_energy_column_priority() {
        // energyConsumed must win over the charging/discharging columns
        let (_dir, path) = write_battery(
            r#"<battery-export>
                <vehicle id="a" energyConsumed="5.0" chargingEnergy="100.0"/>
            </battery-export>"#,
        );

        let totals = load_battery_totals(&path).unwrap();
        assert_approx_eq!(f64, totals["a"], 5.0);
    }

    /// The column choice is made once for the whole table, not per vehicle
    #[test]
    fn test_column_choice_is_table_wide() {
        // "b" never reports the chosen column, so it gets no total rather than the
        // sum of its charging figures
        let (_dir, path) = write_battery(
            r#"<battery-export>
                <vehicle id="a" energyConsumed="5.0"/>
                <vehicle id="b" chargingEnergy="100.0" dischargingEnergy="3.0"/>
            </battery-export>"#,
        );

        let totals = load_battery_totals(&path).unwrap();
        assert_approx_eq!(f64, totals["a"], 5.0);
        assert_eq!(totals.get("b"), None);
        assert_eq!(totals.len(), 1);
    }

    #[test]
    fn test_fallback_sums_all_columns() {
        let (_dir, path) = write_battery(
            r#"<battery-export>
                <vehicle id="a" chargingEnergy="2.0" dischargingEnergy="3.0"/>
            </battery-export>"#,
        );

        let totals = load_battery_totals(&path).unwrap();
        assert_approx_eq!(f64, totals["a"], 5.0);
    }

    #[test]
    fn test_unrecognisable_shapes_are_no_data() {
        // No id attribute under any alias
        let (_dir, path) = write_battery(r#"<b><vehicle energyConsumed="1"/></b>"#);
        assert_eq!(load_battery_totals(&path), None);

        // No recognised energy attribute
        let (_dir, path) = write_battery(r#"<b><vehicle id="a" soc="0.8"/></b>"#);
        assert_eq!(load_battery_totals(&path), None);

        // Empty document
        let (_dir, path) = write_battery(r#"<battery-export/>"#);
        assert_eq!(load_battery_totals(&path), None);

        // Not XML at all
        let (_dir, path) = write_battery("not xml");
        assert_eq!(load_battery_totals(&path), None);
    }
}
