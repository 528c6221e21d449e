// Score-lit CLI - composer/location reconciliation over performance data

mod exit_codes;
mod pipeline;
mod util;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use scorelit_recon::{ErrorKind, ReconError};

use exit_codes::{recon_exit_code, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

/// Config file looked up when no path is given.
const DEFAULT_CONFIG_NAME: &str = "scorelit.toml";

#[derive(Parser)]
#[command(name = "scorelit")]
#[command(about = "Reconcile performance records with composer countries and locations")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full reconciliation and print a summary
    #[command(after_help = "\
Examples:
  scorelit run
  scorelit run scorelit.toml --json
  scorelit run scorelit.toml --output result.json
  scorelit run season-2023.toml season-2024.toml --strict")]
    Run {
        /// Config file(s); defaults to ./scorelit.toml
        configs: Vec<PathBuf>,

        /// Output JSON to stdout instead of human summary
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Fail when composers are unmatched or countries lack coordinates
        #[arg(long)]
        strict: bool,
    },

    /// Validate a config without loading any data
    Validate {
        config: Option<PathBuf>,
    },

    /// List unique composers with performance counts and countries
    Composers {
        config: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// List composers with no entry in the composer mapping
    Unmatched {
        config: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Per-country composer counts with coordinates
    Countries {
        config: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// List performances flagged problematic
    Problematic {
        config: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// List performances of one composer (exact name)
    #[command(after_help = "\
Examples:
  scorelit records --composer Bach
  scorelit records scorelit.toml --composer 'Dvořák' --json")]
    Records {
        config: Option<PathBuf>,

        /// Composer name, matched exactly
        #[arg(long)]
        composer: String,

        #[arg(long)]
        json: bool,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  scorelit-recon ", env!("CARGO_PKG_VERSION"),
    )
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // stderr keeps --json stdout a single JSON value
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run { configs, json, output, strict } => {
            pipeline::cmd_run(configs, json, output, strict)
        }
        Commands::Validate { config } => pipeline::cmd_validate(config),
        Commands::Composers { config, json } => pipeline::cmd_composers(config, json),
        Commands::Unmatched { config, json } => pipeline::cmd_unmatched(config, json),
        Commands::Countries { config, json } => pipeline::cmd_countries(config, json),
        Commands::Problematic { config, json } => pipeline::cmd_problematic(config, json),
        Commands::Records { config, composer, json } => {
            pipeline::cmd_records(config, composer, json)
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

    pub fn general(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        let hint = match err.kind() {
            ErrorKind::DataUnavailable => {
                Some("source paths are resolved relative to the config file".to_string())
            }
            ErrorKind::AmbiguousMapping => {
                Some("set on_duplicate = \"first\" under [matching] to use the first listed country".to_string())
            }
            ErrorKind::SchemaMismatch | ErrorKind::Config => None,
        };
        Self {
            code: recon_exit_code(&err),
            message: err.to_string(),
            hint,
        }
    }
}

/// Pick the config file: explicit path, then ./scorelit.toml, then the user config dir.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> Result<PathBuf, CliError> {
    if let Some(path) = explicit {
        return Ok(path);
    }

    let local = Path::new(DEFAULT_CONFIG_NAME);
    if local.is_file() {
        return Ok(local.to_path_buf());
    }

    if let Some(dir) = dirs::config_dir() {
        let user = dir.join("scorelit").join(DEFAULT_CONFIG_NAME);
        if user.is_file() {
            return Ok(user);
        }
    }

    Err(CliError::args("no config file given and none found")
        .with_hint(format!("create ./{DEFAULT_CONFIG_NAME} or pass a path")))
}
