//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use logmedic_core::types::Severity;

/// logmedic -- annotate application logs with remediation guidance.
///
/// Use `logmedic <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "logmedic", version, about, long_about = None)]
pub struct Cli {
    /// Path to the logmedic.toml configuration file.
    ///
    /// When omitted, `logmedic.toml` in the working directory is used if present.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan log files and report recognized issues.
    Scan(ScanArgs),

    /// Classify a single log line.
    Match(MatchArgs),

    /// Browse and validate error signatures.
    Signatures(SignaturesArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

/// Parse a severity name (low, medium, high, critical).
pub fn parse_severity(s: &str) -> Result<Severity, String> {
    Severity::from_str_loose(s)
        .ok_or_else(|| format!("invalid severity: {s} (expected: low, medium, high, critical)"))
}

// ---- scan ----

/// Scan log files line by line against the signature registry.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Log files to scan.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Minimum severity to report (overrides `[scan].min_severity`).
    #[arg(long, value_parser = parse_severity)]
    pub min_severity: Option<Severity>,

    /// Exit with code 4 when any issue is at or above this severity
    /// (overrides `[scan].fail_on`).
    #[arg(long, value_parser = parse_severity)]
    pub fail_on: Option<Severity>,
}

// ---- match ----

/// Classify one log line and print its remediation.
#[derive(Args, Debug)]
pub struct MatchArgs {
    /// Raw log line text.
    pub text: String,
}

// ---- signatures ----

/// Browse and validate error signatures.
#[derive(Args, Debug)]
pub struct SignaturesArgs {
    #[command(subcommand)]
    pub action: SignaturesAction,
}

#[derive(Subcommand, Debug)]
pub enum SignaturesAction {
    /// List signatures in matching order.
    List {
        /// Filter by category (case-insensitive).
        #[arg(long)]
        category: Option<String>,
        /// Filter by severity.
        #[arg(long, value_parser = parse_severity)]
        severity: Option<Severity>,
    },
    /// Show the full remediation for one signature.
    Show {
        /// Signature id (e.g. DB_LOGIN_FAILED).
        id: String,
    },
    /// Validate a directory of signature YAML files against the built-in registry.
    Validate {
        /// Directory containing YAML signature files.
        path: PathBuf,
    },
}

// ---- config ----

/// Manage logmedic configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, signatures, scan).
        #[arg(long)]
        section: Option<String>,
    },
}
