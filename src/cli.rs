//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, validate, health), and their associated argument
//! structs. Every `run` flag has an environment variable equivalent for
//! container deployments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub const DEFAULT_SPECS_DIR: &str = "./data/specs";

#[derive(Parser)]
#[command(
    name = "specgate",
    version,
    about = "OpenAPI spec server and authenticating API gateway",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        specgate run                         Serve ./data/specs on :8080\n  \
        specgate run -s ./specs -p 9000      Specific directory and port\n  \
        specgate validate ./specs            Check documents without starting"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the gateway server
    Run(RunArgs),

    /// Load a specs directory and report problems without starting
    Validate(ValidateArgs),

    /// Check health of a running instance
    Health(HealthArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        specgate run                                Use ./data/specs\n  \
        specgate run -s /etc/specgate/specs         Specific specs directory\n  \
        specgate run -p 8081 --pretty               Local dev mode")]
pub struct RunArgs {
    /// Directory of `<service>.json` OpenAPI documents
    #[arg(short, long, env = "SPECS_DIR", default_value = DEFAULT_SPECS_DIR)]
    pub specs_dir: PathBuf,

    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Max request body size in bytes
    #[arg(
        long,
        env = "MAX_BODY_SIZE",
        default_value_t = 1_048_576,
        help_heading = "Tuning"
    )]
    pub max_body: usize,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Specs directory to validate
    #[arg(default_value = DEFAULT_SPECS_DIR)]
    pub specs_dir: PathBuf,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ValidateFormat,
}

#[derive(Args)]
pub struct HealthArgs {
    /// URL of the running instance
    #[arg(default_value = "http://localhost:8080")]
    pub url: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}
