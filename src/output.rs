//! The module responsible for writing output tables to disk.
use crate::summary::{GroupPowertrainSummaryRow, GroupSummaryRow, HubSummaryRow};
use crate::vehicle::VehicleRecord;
use anyhow::{Context, Result, ensure};
use serde::Serialize;
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

/// The root folder in which run-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "fleetreport_results";

/// The output file name for the full per-vehicle table
pub const VEHICLES_FILE_NAME: &str = "vehicles_with_emissions_and_energy.csv";

/// The output file name for the logistics-truck detail table
pub const TRUCKS_FILE_NAME: &str = "logistics_trucks_detailed.csv";

/// The output file name for the by-group summary
pub const GROUP_SUMMARY_FILE_NAME: &str = "summary_by_group.csv";

/// The output file name for the by-group-and-powertrain summary
pub const GROUP_POWERTRAIN_SUMMARY_FILE_NAME: &str = "summary_by_group_powertrain.csv";

/// The output file name for the by-hub-and-powertrain truck summary
pub const HUB_SUMMARY_FILE_NAME: &str = "summary_trucks_by_hub_powertrain.csv";

/// Get the default output folder for the given tripinfo file.
///
/// The run is named after the directory holding the tripinfo file, so separate scenario
/// folders land in separate output folders.
pub fn get_output_dir(tripinfo_path: &Path) -> Result<PathBuf> {
    let tripinfo_path = tripinfo_path
        .canonicalize()
        .context("Could not resolve path to tripinfo file")?;

    let run_name = tripinfo_path
        .parent()
        .context("Tripinfo file has no parent folder")?
        .file_name()
        .context("Tripinfo file cannot be directly inside the root folder")?
        .to_str()
        .context("Invalid chars in scenario dir name")?;

    Ok([OUTPUT_DIRECTORY_ROOT, run_name].iter().collect())
}

/// Create the output directory, if it doesn't already exist.
///
/// An existing directory is reused only when `overwrite` is given; its previous
/// contents are removed so a run never mixes old and new tables.
pub fn create_output_directory(output_dir: &Path, overwrite: bool) -> Result<bool> {
    if !output_dir.is_dir() {
        fs::create_dir_all(output_dir)?;
        return Ok(false);
    }

    ensure!(
        overwrite,
        "Output directory {} already exists (pass --overwrite to replace it)",
        output_dir.display()
    );
    fs::remove_dir_all(output_dir)?;
    fs::create_dir_all(output_dir)?;
    Ok(true)
}

/// An object for writing the per-vehicle and summary tables to CSV files
pub struct DataWriter {
    output_path: PathBuf,
    vehicles_writer: csv::Writer<File>,
    trucks_writer: csv::Writer<File>,
    group_summary_writer: csv::Writer<File>,
    group_powertrain_summary_writer: csv::Writer<File>,
    /// Created lazily: the file only exists for runs containing logistics trucks
    hub_summary_writer: Option<csv::Writer<File>>,
}

impl DataWriter {
    /// Open CSV files to write output data to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    pub fn create(output_path: &Path) -> Result<Self> {
        let new_writer = |file_name| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(file_path)
        };

        Ok(Self {
            output_path: output_path.to_path_buf(),
            vehicles_writer: new_writer(VEHICLES_FILE_NAME)?,
            trucks_writer: new_writer(TRUCKS_FILE_NAME)?,
            group_summary_writer: new_writer(GROUP_SUMMARY_FILE_NAME)?,
            group_powertrain_summary_writer: new_writer(GROUP_POWERTRAIN_SUMMARY_FILE_NAME)?,
            hub_summary_writer: None,
        })
    }

    /// Write the full per-vehicle table and the logistics-truck detail table
    pub fn write_vehicles(&mut self, records: &[VehicleRecord]) -> Result<()> {
        for record in records {
            self.vehicles_writer.serialize(record)?;
            if record.is_logistics_truck() {
                self.trucks_writer.serialize(record)?;
            }
        }

        Ok(())
    }

    /// Write the by-group summary table
    pub fn write_group_summary(&mut self, rows: &[GroupSummaryRow]) -> Result<()> {
        serialize_rows(&mut self.group_summary_writer, rows)
    }

    /// Write the by-group-and-powertrain summary table
    pub fn write_group_powertrain_summary(
        &mut self,
        rows: &[GroupPowertrainSummaryRow],
    ) -> Result<()> {
        serialize_rows(&mut self.group_powertrain_summary_writer, rows)
    }

    /// Write the by-hub truck summary table.
    ///
    /// With no rows (a run without logistics trucks) the file is not created at all.
    pub fn write_hub_summary(&mut self, rows: &[HubSummaryRow]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        if self.hub_summary_writer.is_none() {
            let file_path = self.output_path.join(HUB_SUMMARY_FILE_NAME);
            self.hub_summary_writer = Some(csv::Writer::from_path(file_path)?);
        }
        if let Some(writer) = &mut self.hub_summary_writer {
            serialize_rows(writer, rows)?;
        }

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.vehicles_writer.flush()?;
        self.trucks_writer.flush()?;
        self.group_summary_writer.flush()?;
        self.group_powertrain_summary_writer.flush()?;
        if let Some(writer) = &mut self.hub_summary_writer {
            writer.flush()?;
        }

        Ok(())
    }
}

/// Serialize a slice of rows to a CSV writer
fn serialize_rows<T: Serialize>(writer: &mut csv::Writer<File>, rows: &[T]) -> Result<()> {
    for row in rows {
        writer.serialize(row)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::mixed_records;
    use crate::summary::{summarize_by_group, summarize_trucks_by_hub};
    use rstest::rstest;
    use tempfile::tempdir;

    #[rstest]
    fn test_write_vehicles(mixed_records: Vec<VehicleRecord>) {
        let dir = tempdir().unwrap();

        {
            let mut writer = DataWriter::create(dir.path()).unwrap();
            writer.write_vehicles(&mixed_records).unwrap();
            writer.flush().unwrap();
        }

        // One header line plus one line per vehicle
        let contents = fs::read_to_string(dir.path().join(VEHICLES_FILE_NAME)).unwrap();
        assert_eq!(contents.lines().count(), mixed_records.len() + 1);
        assert!(contents.starts_with("id,vType,routeLength,duration"));

        // The truck detail table only holds the logistics trucks
        let n_trucks = mixed_records
            .iter()
            .filter(|r| r.is_logistics_truck())
            .count();
        let contents = fs::read_to_string(dir.path().join(TRUCKS_FILE_NAME)).unwrap();
        assert_eq!(contents.lines().count(), n_trucks + 1);
    }

    #[rstest]
    fn test_write_summaries(mixed_records: Vec<VehicleRecord>) {
        let dir = tempdir().unwrap();
        let group_summary = summarize_by_group(&mixed_records);
        let hub_summary = summarize_trucks_by_hub(&mixed_records);

        {
            let mut writer = DataWriter::create(dir.path()).unwrap();
            writer.write_group_summary(&group_summary).unwrap();
            writer.write_hub_summary(&hub_summary).unwrap();
            writer.flush().unwrap();
        }

        let contents = fs::read_to_string(dir.path().join(GROUP_SUMMARY_FILE_NAME)).unwrap();
        assert_eq!(contents.lines().count(), group_summary.len() + 1);
        assert!(contents.contains("logistics_truck"));

        let contents = fs::read_to_string(dir.path().join(HUB_SUMMARY_FILE_NAME)).unwrap();
        assert!(contents.contains("Roswell3&4"));
    }

    /// An empty hub summary must not leave an empty file behind
    #[test]
    fn test_empty_hub_summary_writes_no_file() {
        let dir = tempdir().unwrap();

        {
            let mut writer = DataWriter::create(dir.path()).unwrap();
            writer.write_hub_summary(&[]).unwrap();
            writer.flush().unwrap();
        }

        assert!(!dir.path().join(HUB_SUMMARY_FILE_NAME).exists());
    }

    #[test]
    fn test_create_output_directory() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("out");

        assert!(!create_output_directory(&output_dir, false).unwrap());
        fs::write(output_dir.join("stale.csv"), "old").unwrap();

        // Existing directory without --overwrite is an error
        assert!(create_output_directory(&output_dir, false).is_err());

        // With --overwrite the old contents are cleared
        assert!(create_output_directory(&output_dir, true).unwrap());
        assert!(!output_dir.join("stale.csv").exists());
    }
}
