//! # SNS Validator CLI
//!
//! Command-line interface for the SNS message validator.
//!
//! This module provides CLI commands for:
//! - Validating a message captured from an SNS delivery
//! - Checking a signing certificate URL against the trust policy
//! - Showing the resolved configuration
//! - Generating shell completions
//!
//! Command output goes to stdout; logs go to stderr.

use clap::{CommandFactory, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use sns_validator_core::{MessageValidator, RawMessage, SnsMessage, ValidationError, ValidatorConfig};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable prefix for configuration overrides, e.g.
/// `SNS_VALIDATOR__VALIDATOR__HOST_PATTERN`.
pub const ENV_PREFIX: &str = "SNS_VALIDATOR";

// ============================================================================
// CLI Structure
// ============================================================================

/// SNS Validator CLI - Signature validation for Amazon SNS messages
#[derive(Parser, Debug)]
#[command(name = "sns-validator")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Signature validation for Amazon SNS HTTP(S) messages")]
pub struct Cli {
    /// Configuration file path (YAML, JSON or TOML)
    #[arg(short, long, env = "SNS_VALIDATOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level or filter directive; overrides the configuration file
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long)]
    pub json_logs: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate an SNS message read from a JSON file or stdin
    Validate {
        /// Message file; `-` or absent reads stdin
        file: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Check whether a signing certificate URL is trusted
    CheckUrl {
        /// Certificate URL to check
        url: String,
    },

    /// Show the resolved configuration
    Config {
        /// Output format for configuration
        #[arg(short = 'f', long, default_value = "yaml")]
        format: ConfigFormat,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON output
    Json,
}

/// Configuration format options
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ConfigFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
    /// TOML format
    Toml,
}

// ============================================================================
// CLI Error Types
// ============================================================================

/// CLI-specific errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Certificate URL is not trusted: {url}")]
    UntrustedUrl { url: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logging initialization failed: {message}")]
    Logging { message: String },
}

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid validator configuration: {0}")]
    Validator(#[from] sns_validator_core::ConfigError),

    #[error("Failed to render configuration: {message}")]
    Render { message: String },
}

impl From<sns_validator_core::ConfigError> for CliError {
    fn from(error: sns_validator_core::ConfigError) -> Self {
        Self::Configuration(ConfigError::Validator(error))
    }
}

// ============================================================================
// Configuration Types
// ============================================================================

/// CLI configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Validation engine settings
    pub validator: ValidatorConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "json")]
    Json,
}

// ============================================================================
// Main Entry Point
// ============================================================================

/// Main CLI entry point
pub async fn run_cli() -> Result<(), CliError> {
    let cli = Cli::parse();

    let config = load_configuration(cli.config.as_deref())?;

    initialize_logging(&cli, &config.logging)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute_command(cli.command, &config, &mut out).await
}

/// Execute a parsed command, writing its output to `out`.
pub async fn execute_command<W: Write>(
    command: Commands,
    config: &CliConfig,
    out: &mut W,
) -> Result<(), CliError> {
    match command {
        Commands::Validate { file, format } => {
            execute_validate_command(file.as_deref(), format, config, out).await
        }
        Commands::CheckUrl { url } => execute_check_url_command(&url, config, out),
        Commands::Config { format } => execute_config_command(format, config, out),
        Commands::Completions { shell } => execute_completions_command(shell, out),
    }
}

// ============================================================================
// Setup
// ============================================================================

/// Initialize logging based on CLI arguments and configuration.
///
/// `RUST_LOG` wins over `--log-level`, which wins over the configured level.
pub fn initialize_logging(cli: &Cli, logging: &LoggingConfig) -> Result<(), CliError> {
    let level = cli.log_level.as_deref().unwrap_or(&logging.level);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| CliError::Logging {
            message: format!("invalid log filter '{}': {}", level, e),
        })?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = if cli.json_logs || logging.format == LogFormat::Json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    result.map_err(|e| CliError::Logging {
        message: e.to_string(),
    })
}

/// Load configuration from defaults, an optional file and the environment.
///
/// Sources, later overriding earlier:
///  1. built-in defaults
///  2. `config_path`, format taken from its extension (required when given)
///  3. environment variables prefixed `SNS_VALIDATOR__`, `__` separated
pub fn load_configuration(config_path: Option<&Path>) -> Result<CliConfig, ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = config_path {
        if !path.is_file() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: CliConfig = settings.try_deserialize()?;
    config.validator.validate()?;

    Ok(config)
}

// ============================================================================
// Command Implementations
// ============================================================================

/// Result report written by the validate command.
#[derive(Debug, Serialize)]
struct ValidationReport<'a> {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a SnsMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Execute validate command
async fn execute_validate_command<W: Write>(
    file: Option<&Path>,
    format: OutputFormat,
    config: &CliConfig,
    out: &mut W,
) -> Result<(), CliError> {
    let input = read_input(file)?;
    let raw: RawMessage = serde_json::from_str(&input).map_err(|e| CliError::InvalidInput {
        message: format!("message is not a JSON object: {}", e),
    })?;

    let validator = MessageValidator::new(&config.validator)?;
    debug!(fields = raw.len(), "Validating message");

    let result = validator.validate(raw).await;

    let report = match &result {
        Ok(message) => {
            info!(message_id = ?message.message_id(), "Message signature is valid");
            ValidationReport {
                valid: true,
                message: Some(message),
                error_kind: None,
                error: None,
            }
        }
        Err(e) => ValidationReport {
            valid: false,
            message: None,
            error_kind: Some(e.kind().as_str()),
            error: Some(e.to_string()),
        },
    };

    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &report).map_err(std::io::Error::from)?;
            writeln!(out)?;
        }
        OutputFormat::Text => write_text_report(&report, out)?,
    }

    result.map(|_| ()).map_err(CliError::from)
}

fn write_text_report<W: Write>(report: &ValidationReport<'_>, out: &mut W) -> std::io::Result<()> {
    if let Some(message) = report.message {
        writeln!(out, "valid")?;
        for (name, value) in message.iter() {
            writeln!(out, "  {}: {}", name, value)?;
        }
    } else {
        writeln!(
            out,
            "invalid ({}): {}",
            report.error_kind.unwrap_or("unknown"),
            report.error.as_deref().unwrap_or_default()
        )?;
    }
    Ok(())
}

fn read_input(file: Option<&Path>) -> Result<String, CliError> {
    match file {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

/// Execute check-url command
fn execute_check_url_command<W: Write>(
    url: &str,
    config: &CliConfig,
    out: &mut W,
) -> Result<(), CliError> {
    let policy = config.validator.trust_policy()?;

    if policy.is_trusted(url) {
        writeln!(out, "trusted: {}", url)?;
        Ok(())
    } else {
        writeln!(
            out,
            "untrusted: {} (host pattern {})",
            url,
            policy.host_pattern()
        )?;
        Err(CliError::UntrustedUrl {
            url: url.to_string(),
        })
    }
}

/// Execute config command
fn execute_config_command<W: Write>(
    format: ConfigFormat,
    config: &CliConfig,
    out: &mut W,
) -> Result<(), CliError> {
    let rendered = match format {
        ConfigFormat::Yaml => serde_yaml::to_string(config).map_err(|e| e.to_string()),
        ConfigFormat::Json => serde_json::to_string_pretty(config).map_err(|e| e.to_string()),
        ConfigFormat::Toml => toml::to_string_pretty(config).map_err(|e| e.to_string()),
    }
    .map_err(|message| ConfigError::Render { message })?;

    write!(out, "{}", rendered)?;
    if !rendered.ends_with('\n') {
        writeln!(out)?;
    }
    Ok(())
}

/// Execute completions command
fn execute_completions_command<W: Write>(
    shell: clap_complete::Shell,
    out: &mut W,
) -> Result<(), CliError> {
    clap_complete::generate(shell, &mut Cli::command(), "sns-validator", out);
    Ok(())
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
