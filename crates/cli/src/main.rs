// radar-sites CLI - keeps the radar site catalog in step with NOAA HOMR

mod exit_codes;
mod fetch;
mod update;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use radarsite_config::{ConfigError, Settings};
use radarsite_io::{catalog, coords, write_atomic, IoError};
use radarsite_recon::ReconError;

use exit_codes::{io_exit_code, EXIT_ERROR, EXIT_INVALID_INPUT, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "radar-sites")]
#[command(about = "Update the radar site catalog from the NOAA HOMR station registry")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Settings file (default: <config dir>/radar-sites/settings.toml)
    #[arg(long, global = true, env = "RADAR_SITES_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// More output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch HOMR stations and write the reconciled catalog
    #[command(after_help = "\
Examples:
  radar-sites update -u radar_sites.json -U to_update.csv -t
  radar-sites update -u radar_sites.json -r homr.json -c coords.txt
  radar-sites update -i homr.json -o fresh_sites.json")]
    Update(update::UpdateArgs),

    /// Print the coordinate listing of an existing catalog
    Coords {
        /// Catalog file
        catalog: PathBuf,

        /// Write to FILE instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("RADAR_SITES_COMMIT"), ")",
        "\nbuild:   ", env!("RADAR_SITES_PROFILE"),
        "\ntarget:  ", env!("RADAR_SITES_TARGET"),
    )
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = Settings::load(cli.config.as_deref())
        .map_err(CliError::from)
        .and_then(|settings| match cli.command {
            Commands::Update(args) => update::cmd_update(args, &settings),
            Commands::Coords { catalog, output } => cmd_coords(catalog, output),
        });

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

fn cmd_coords(path: PathBuf, output: Option<PathBuf>) -> Result<(), CliError> {
    let catalog = catalog::read_catalog(&path)?;
    let text = coords::render_coords(&catalog)?;

    match output {
        Some(out) => write_atomic(&out, &text)?,
        None => io::stdout()
            .lock()
            .write_all(text.as_bytes())
            .map_err(|e| CliError::general(format!("cannot write to stdout: {e}")))?,
    }
    Ok(())
}

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<IoError> for CliError {
    fn from(err: IoError) -> Self {
        let code = io_exit_code(&err);
        let hint = match &err {
            e if e.is_inconsistent_schema() => {
                Some("every record must list the same keys in the same order; nothing was written".to_string())
            }
            IoError::RoundTrip(_) => Some("the catalog on disk does not match what was computed".to_string()),
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        IoError::from(err).into()
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        let hint = match &err {
            ConfigError::Read { .. } => None,
            _ => Some(format!("see {} for the defaults", Settings::config_path().display())),
        };
        Self { code: EXIT_INVALID_INPUT, message: err.to_string(), hint }
    }
}
