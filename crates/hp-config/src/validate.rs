//! Semantic validation of a resolved configuration.

use std::path::PathBuf;

use thiserror::Error;

use crate::server::ServerConfig;

/// Errors from configuration resolution or validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("environment variable {var} has invalid value {value:?}")]
    InvalidEnv { var: String, value: String },

    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Check values that parse fine but cannot work.
pub fn validate(config: &ServerConfig) -> Result<(), ConfigError> {
    let mut problems = Vec::new();

    match config.bind_addr.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => {}
        _ => problems.push(format!(
            "bind_addr must be host:port, got {:?}",
            config.bind_addr
        )),
    }
    for (name, path) in [
        ("model_path", &config.model_path),
        ("columns_path", &config.columns_path),
        ("database_path", &config.database_path),
    ] {
        if path.as_os_str().is_empty() {
            problems.push(format!("{name} must not be empty"));
        }
    }
    if config.history_limit == 0 {
        problems.push("history_limit must be at least 1".to_string());
    }
    if config.connect_attempts == 0 {
        problems.push("connect_attempts must be at least 1".to_string());
    }
    if config.workers == 0 {
        problems.push("workers must be at least 1".to_string());
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(problems))
    }
}
