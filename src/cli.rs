//! The command line interface for the analysis tool.
use crate::analysis;
use crate::config::AnalysisConfig;
use crate::log;
use crate::output::{create_output_directory, get_output_dir};
use ::log::{info, warn};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// The battery file name looked for next to the tripinfo file when none is given
const DEFAULT_BATTERY_FILE_NAME: &str = "battery.xml";

/// The command line interface for the analysis tool.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by commands that read the telemetry files
#[derive(Args)]
pub struct InputOpts {
    /// Path to the tripinfo XML file.
    pub tripinfo: PathBuf,
    /// Path to the battery XML file (defaults to battery.xml next to the tripinfo file)
    #[arg(short, long)]
    pub battery: Option<PathBuf>,
    /// Path to a TOML file with the analysis configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl InputOpts {
    /// The battery file to try, whether or not it exists
    fn battery_path(&self) -> PathBuf {
        self.battery
            .clone()
            .unwrap_or_else(|| self.tripinfo.with_file_name(DEFAULT_BATTERY_FILE_NAME))
    }
}

/// Options for the analyze command
#[derive(Args)]
pub struct AnalyzeOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Analyze a simulation run and write the report tables.
    Analyze {
        /// Input file options
        #[command(flatten)]
        input: InputOpts,
        /// Other analyze options
        #[command(flatten)]
        opts: AnalyzeOpts,
    },
    /// Parse the telemetry files and report structural errors without writing tables.
    Validate {
        /// Input file options
        #[command(flatten)]
        input: InputOpts,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Analyze { input, opts } => handle_analyze_command(&input, &opts),
            Self::Validate { input } => handle_validate_command(&input),
        }
    }
}

/// Parse CLI arguments and start the program
pub fn run_cli() -> Result<()> {
    Cli::parse().command.execute()
}

/// Handle the `analyze` command.
pub fn handle_analyze_command(input: &InputOpts, opts: &AnalyzeOpts) -> Result<()> {
    let config = AnalysisConfig::load(input.config.as_deref())?;

    // Get path to output folder
    let pathbuf: PathBuf;
    let output_path: &Path = if let Some(p) = opts.output_dir.as_deref() {
        p
    } else {
        pathbuf = get_output_dir(&input.tripinfo)?;
        &pathbuf
    };

    let overwritten = create_output_directory(output_path, opts.overwrite).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            output_path.display()
        )
    })?;

    // Initialise program logger
    log::init(Some(&config.log_level), Some(output_path))
        .context("Failed to initialise logging.")?;
    info!("Output folder: {}", output_path.display());

    // NB: We have to wait until the logger is initialised to display this warning
    if overwritten {
        warn!("Output folder was overwritten");
    }

    analysis::run(&input.tripinfo, &input.battery_path(), &config, output_path)?;
    info!("Analysis complete!");

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(input: &InputOpts) -> Result<()> {
    let config = AnalysisConfig::load(input.config.as_deref())?;

    // We won't save log files when running the validate command
    log::init(Some(&config.log_level), None).context("Failed to initialise logging.")?;

    let records = analysis::load_records(&input.tripinfo, &input.battery_path(), &config)?;
    info!("Telemetry valid: {} vehicles", records.len());

    Ok(())
}
