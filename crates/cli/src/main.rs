// PoleGrid CLI - reconcile pole structure reports into one table

mod anchors;
mod exit_codes;
mod project;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use polegrid_io::SourceError;

use anchors::CompassArg;
use exit_codes::{source_exit_code, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "polegrid")]
#[command(about = "Reconcile utility pole design reports into one table")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a project: parse every report, reconcile, write the table
    #[command(after_help = "\
Examples:
  polegrid build circuit12.toml
  polegrid build circuit12.toml --xlsx report.xlsx
  polegrid build circuit12.toml --csv report.csv --json")]
    Build {
        /// Path to the project .toml file
        config: PathBuf,

        /// Write the xlsx table here (overrides [output].xlsx)
        #[arg(long)]
        xlsx: Option<PathBuf>,

        /// Write the csv table here (overrides [output].csv)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print the full result as JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Check a project config and its report paths without running
    #[command(after_help = "\
Examples:
  polegrid validate circuit12.toml")]
    Validate {
        /// Path to the project .toml file
        config: PathBuf,
    },

    /// Resolve guy anchors from a staking report
    #[command(after_help = "\
Examples:
  polegrid anchors staking.xml
  polegrid anchors staking.xml --compass octant
  polegrid anchors staking.xml --marker PG --marker NG --json")]
    Anchors {
        /// Construction staking report XML
        staking_xml: PathBuf,

        /// Compass bucketing for the anchor direction
        #[arg(long, value_enum, default_value = "staking")]
        compass: CompassArg,

        /// Stake description marker that identifies a guy point (repeatable)
        #[arg(long = "marker")]
        markers: Vec<String>,

        /// Print anchors as JSON to stdout
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        None => {
            eprintln!("Usage: polegrid <command> [options]");
            eprintln!("       polegrid --help for more information");
            Ok(())
        }
        Some(Commands::Build { config, xlsx, csv, json }) => {
            project::cmd_build(config, xlsx, csv, json)
        }
        Some(Commands::Validate { config }) => project::cmd_validate(config),
        Some(Commands::Anchors { staking_xml, compass, markers, json }) => {
            anchors::cmd_anchors(staking_xml, compass, markers, json)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }

    /// Create error from a report load/write failure with its exit code.
    pub fn source(err: SourceError) -> Self {
        let hint = match &err {
            SourceError::MissingColumn { .. } => {
                Some("map the workbook headers under [his_columns]".to_string())
            }
            SourceError::Xml(_) => Some("is the report exported as XML?".to_string()),
            _ => None,
        };
        Self { code: source_exit_code(&err), message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
