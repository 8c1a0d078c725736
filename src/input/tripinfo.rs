//! Loader for the mandatory tripinfo stream.
//!
//! A tripinfo file holds one `<tripinfo>` element per finished vehicle, each with at
//! most one `<emissions>` child. The simulator writes the children in the same document
//! order as their parents, so the two collections are joined strictly positionally; a
//! length mismatch means the file is structurally broken and aborts the run.
use crate::input::{attr_f64, attr_f64_or, parse_xml, read_xml_source};
use anyhow::{Context, Result, bail, ensure};
use roxmltree::Node;
use std::collections::HashSet;
use std::path::Path;

/// One vehicle's raw trip and emissions data, as read from the source
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    /// Unique vehicle id; the only attribute that must be present
    pub id: String,
    /// Vehicle type label, if reported
    pub v_type: Option<String>,
    /// Route length in metres; 0 when the simulator omitted it
    pub route_length_m: f64,
    /// Trip duration in seconds; 0 when omitted
    pub duration_s: f64,
    /// Absolute tailpipe CO2 in milligrams; 0 when omitted
    pub co2_mg: f64,
    /// Absolute fuel use in milligrams; 0 when omitted
    pub fuel_mg: f64,
    /// Inline electricity total in Wh, for configurations that report it in the
    /// emissions child rather than a separate battery file
    pub electricity_wh: Option<f64>,
}

/// Load the tripinfo file and join each vehicle with its emissions child.
///
/// Returns one record per vehicle. Fails on a missing `id` attribute, on a
/// tripinfo/emissions count mismatch and on duplicate vehicle ids; optional attributes
/// are synthesized with neutral defaults instead.
pub fn load_tripinfo(file_path: &Path) -> Result<Vec<TripRecord>> {
    let source = read_xml_source(file_path)?;
    let doc = parse_xml(&source, file_path)?;

    let trips: Vec<Node> = doc
        .descendants()
        .filter(|node| node.has_tag_name("tripinfo"))
        .collect();
    let emissions: Vec<Node> = doc
        .descendants()
        .filter(|node| node.has_tag_name("emissions"))
        .collect();

    // The positional join only works when the two collections line up one to one
    ensure!(
        trips.len() == emissions.len(),
        "{}: found {} <tripinfo> elements but {} <emissions> elements; \
         cannot join the two streams by position",
        file_path.display(),
        trips.len(),
        emissions.len()
    );

    let mut seen_ids = HashSet::new();
    let mut records = Vec::with_capacity(trips.len());
    for (index, (trip, emission)) in trips.iter().zip(&emissions).enumerate() {
        let record = read_record(*trip, *emission)
            .with_context(|| format!("{}: <tripinfo> #{index}", file_path.display()))?;
        if !seen_ids.insert(record.id.clone()) {
            bail!(
                "{}: duplicate vehicle id '{}'",
                file_path.display(),
                record.id
            );
        }
        records.push(record);
    }

    Ok(records)
}

/// Read one joined tripinfo/emissions pair
fn read_record(trip: Node, emission: Node) -> Result<TripRecord> {
    let id = trip
        .attribute("id")
        .context("missing 'id' attribute")?
        .to_string();

    // Older simulator versions name the type attribute "type"
    let v_type = trip
        .attribute("vType")
        .or_else(|| trip.attribute("type"))
        .map(str::to_string);

    Ok(TripRecord {
        id,
        v_type,
        route_length_m: attr_f64_or(trip, "routeLength", 0.0),
        duration_s: attr_f64_or(trip, "duration", 0.0),
        co2_mg: attr_f64_or(emission, "CO2_abs", 0.0),
        fuel_mg: attr_f64_or(emission, "fuel_abs", 0.0),
        electricity_wh: attr_f64(emission, "electricity_abs"),
    })
}
