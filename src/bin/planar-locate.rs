//! Command-line front end for the localization engine.
//!
//! Reads one JSON localization request and prints the fix.
//!
//! Usage:
//!   planar-locate --format json request.json
//!   echo '{"mode":"closest","measurements":[...]}' | planar-locate -v

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{debug, error, info};
use planar_localization::{
    ConfigError, LocalizationRequest, Localizer, OutputFormat, SolverConfig,
};

/// Exit status for a solved position
const EXIT_FIX: u8 = 0;
/// Exit status when the request was read but could not be localized
const EXIT_NO_FIX: u8 = 1;
/// Exit status for unreadable input or configuration
const EXIT_USAGE: u8 = 2;

/// Locate a point from anchor ranges or bearings.
#[derive(Parser, Debug)]
#[command(name = "planar-locate", version, about = "Locate a point from anchor ranges or bearings")]
struct Cli {
    /// JSON solver config; defaults apply to missing fields.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Output format: text, json or csv.
    #[arg(long, short, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Long text output, pretty JSON and debug logging.
    #[arg(long, short)]
    verbose: bool,

    /// Request file; reads stdin when absent or `-`.
    request: Option<PathBuf>,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("cannot read request from {source_name}: {source}")]
    Io {
        source_name: String,
        #[source]
        source: io::Error,
    },
    #[error("malformed request: {0}")]
    Request(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<SolverConfig, CliError> {
    match path {
        Some(path) => {
            info!("using solver config {}", path.display());
            Ok(SolverConfig::from_file(path)?)
        }
        None => Ok(SolverConfig::default()),
    }
}

fn read_input(path: Option<&PathBuf>) -> Result<String, CliError> {
    match path {
        Some(path) if path.as_os_str() != "-" => {
            fs::read_to_string(path).map_err(|source| CliError::Io {
                source_name: path.display().to_string(),
                source,
            })
        }
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| CliError::Io {
                    source_name: "stdin".to_string(),
                    source,
                })?;
            Ok(buf)
        }
    }
}

fn parse_request(input: &str) -> Result<LocalizationRequest, CliError> {
    Ok(serde_json::from_str(input)?)
}

/// Solve one request and render it; returns the text to print and the exit
/// status.
fn run(cli: &Cli) -> Result<(String, u8), CliError> {
    let config = load_config(cli.config.as_ref())?;
    let request = parse_request(&read_input(cli.request.as_ref())?)?;
    debug!(
        "{} request with {} anchors",
        request.mode(),
        request.anchor_count()
    );

    let result = Localizer::try_new(config)?.locate(&request);
    let status = if result.is_ok() { EXIT_FIX } else { EXIT_NO_FIX };
    let output = cli.format.formatter(cli.verbose).format_result(&result);
    Ok((output, status))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok((output, status)) => {
            println!("{}", output);
            ExitCode::from(status)
        }
        Err(err) => {
            error!("{}", err);
            eprintln!("Error: {}", err);
            ExitCode::from(EXIT_USAGE)
        }
    }
}
