//! Command-line surface of the `hp-core` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use hp_common::{Error, OutputFormat};
use hp_config::{resolve_config, ConfigOverrides, ResolvedConfig};

use crate::commands;
use crate::errors;
use crate::exit_codes::ExitCode;
use crate::logging::{init_logging, LogFormat};

/// House price prediction service.
#[derive(Parser, Debug)]
#[command(name = "hp-core", version, about)]
pub struct Cli {
    /// Output format for command results
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Log line format on stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides applied on top of the environment and config file.
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// TOML config file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Listen address (host:port)
    #[arg(long, global = true)]
    pub bind_addr: Option<String>,

    /// Serialized model artifact
    #[arg(long, global = true, value_name = "FILE")]
    pub model_path: Option<PathBuf>,

    /// Serialized column list artifact
    #[arg(long, global = true, value_name = "FILE")]
    pub columns_path: Option<PathBuf>,

    /// SQLite prediction log
    #[arg(long, global = true, value_name = "FILE")]
    pub database_path: Option<PathBuf>,

    /// Maximum records returned by history queries
    #[arg(long, global = true)]
    pub history_limit: Option<usize>,

    /// HTTP worker threads
    #[arg(long, global = true)]
    pub workers: Option<usize>,
}

impl ConfigArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_path: self.config.clone(),
            bind_addr: self.bind_addr.clone(),
            model_path: self.model_path.clone(),
            columns_path: self.columns_path.clone(),
            database_path: self.database_path.clone(),
            history_limit: self.history_limit,
            workers: self.workers,
        }
    }

    pub fn resolve(&self) -> hp_common::Result<ResolvedConfig> {
        resolve_config(&self.overrides()).map_err(errors::config)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP service
    Serve,
    /// Load artifacts and open the store, then report
    Check,
    /// Score one request locally
    Predict(commands::predict::PredictArgs),
    /// Query the prediction log
    History(commands::history::HistoryArgs),
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Print the JSON Schema of the prediction request body
    Schema,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the resolved configuration
    Show,
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Serve => "serve",
            Commands::Check => "check",
            Commands::Predict(_) => "predict",
            Commands::History(_) => "history",
            Commands::Config { .. } => "config show",
            Commands::Schema => "schema",
        }
    }
}

/// Run the parsed command line and return the process exit code.
pub fn run(cli: &Cli) -> ExitCode {
    init_logging(cli.log_format, !matches!(cli.command, Commands::Serve));

    match dispatch(cli) {
        Ok(code) => code,
        Err(err) => {
            report_error(cli.command.name(), &err);
            ExitCode::from(&err)
        }
    }
}

fn dispatch(cli: &Cli) -> hp_common::Result<ExitCode> {
    let format = cli.format;
    match &cli.command {
        Commands::Serve => commands::serve::run(&cli.config.resolve()?),
        Commands::Check => Ok(commands::check::run(format, &cli.config)),
        Commands::Predict(args) => commands::predict::run(format, &cli.config.resolve()?, args),
        Commands::History(args) => commands::history::run(format, &cli.config.resolve()?, args),
        Commands::Config {
            command: ConfigCommands::Show,
        } => commands::config::show(format, &cli.config.resolve()?),
        Commands::Schema => commands::schema::run(format),
    }
}

/// Failures go to stderr as one JSON object so stdout stays parseable.
fn report_error(command: &str, err: &Error) {
    let payload = serde_json::json!({
        "status": "error",
        "command": command,
        "code": err.code(),
        "error": err.to_string(),
    });
    eprintln!("{payload}");
}
