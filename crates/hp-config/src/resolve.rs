//! Config resolution: CLI → env → config file → defaults.
//!
//! Later layers only override the fields they set. The config file is
//! optional unless named explicitly; a named file that does not exist is an
//! error, the platform default path silently falls back to defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::server::ServerConfig;
use crate::validate::{validate, ConfigError};
use crate::{APP_DIR_NAME, CONFIG_FILE_NAME};

pub const ENV_CONFIG: &str = "HP_CONFIG";
pub const ENV_BIND_ADDR: &str = "HP_BIND_ADDR";
pub const ENV_MODEL_PATH: &str = "HP_MODEL_PATH";
pub const ENV_COLUMNS_PATH: &str = "HP_COLUMNS_PATH";
pub const ENV_DATABASE_PATH: &str = "HP_DATABASE_PATH";
pub const ENV_HISTORY_LIMIT: &str = "HP_HISTORY_LIMIT";
pub const ENV_WORKERS: &str = "HP_WORKERS";

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub bind_addr: Option<String>,
    pub model_path: Option<PathBuf>,
    pub columns_path: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub history_limit: Option<usize>,
    pub workers: Option<usize>,
}

/// A validated configuration plus where it came from.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    pub config: ServerConfig,
    /// The TOML file that was read, if any.
    pub config_file: Option<PathBuf>,
    /// True when no file was read.
    pub using_defaults: bool,
}

/// Resolve against the real process environment.
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<ResolvedConfig, ConfigError> {
    resolve_config_with(overrides, |var| std::env::var(var).ok())
}

/// Resolve with an injectable environment lookup.
pub fn resolve_config_with(
    overrides: &ConfigOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig, ConfigError> {
    let config_file = config_file_path(overrides, &env)?;
    let mut config = match &config_file {
        Some(path) => load_file(path)?,
        None => ServerConfig::default(),
    };

    apply_env(&mut config, &env)?;
    apply_overrides(&mut config, overrides);
    validate(&config)?;

    Ok(ResolvedConfig {
        config,
        using_defaults: config_file.is_none(),
        config_file,
    })
}

fn config_file_path(
    overrides: &ConfigOverrides,
    env: &impl Fn(&str) -> Option<String>,
) -> Result<Option<PathBuf>, ConfigError> {
    // 1) Explicit flag, 2) env override: both must exist.
    let explicit = overrides
        .config_path
        .clone()
        .or_else(|| env(ENV_CONFIG).map(PathBuf::from));
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }
        return Ok(Some(path));
    }

    // 3) Platform default, optional.
    Ok(dirs::config_dir()
        .map(|base| base.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file()))
}

fn load_file(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

fn apply_env(
    config: &mut ServerConfig,
    env: &impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    if let Some(value) = env(ENV_BIND_ADDR) {
        config.bind_addr = value;
    }
    if let Some(value) = env(ENV_MODEL_PATH) {
        config.model_path = PathBuf::from(value);
    }
    if let Some(value) = env(ENV_COLUMNS_PATH) {
        config.columns_path = PathBuf::from(value);
    }
    if let Some(value) = env(ENV_DATABASE_PATH) {
        config.database_path = PathBuf::from(value);
    }
    if let Some(value) = env(ENV_HISTORY_LIMIT) {
        config.history_limit = parse_env(ENV_HISTORY_LIMIT, &value)?;
    }
    if let Some(value) = env(ENV_WORKERS) {
        config.workers = parse_env(ENV_WORKERS, &value)?;
    }
    Ok(())
}

fn parse_env<T: std::str::FromStr>(var: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        var: var.to_string(),
        value: value.to_string(),
    })
}

fn apply_overrides(config: &mut ServerConfig, overrides: &ConfigOverrides) {
    if let Some(value) = &overrides.bind_addr {
        config.bind_addr = value.clone();
    }
    if let Some(value) = &overrides.model_path {
        config.model_path = value.clone();
    }
    if let Some(value) = &overrides.columns_path {
        config.columns_path = value.clone();
    }
    if let Some(value) = &overrides.database_path {
        config.database_path = value.clone();
    }
    if let Some(value) = overrides.history_limit {
        config.history_limit = value;
    }
    if let Some(value) = overrides.workers {
        config.workers = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    fn write_config(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn env_overrides_file_and_cli_overrides_env() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "bind_addr = \"127.0.0.1:7000\"\nworkers = 2\n");
        let overrides = ConfigOverrides {
            config_path: Some(path.clone()),
            workers: Some(8),
            ..Default::default()
        };
        let env = env_from(&[(ENV_BIND_ADDR, "127.0.0.1:7100"), (ENV_WORKERS, "3")]);

        let resolved = resolve_config_with(&overrides, env).unwrap();
        assert_eq!(resolved.config.bind_addr, "127.0.0.1:7100");
        assert_eq!(resolved.config.workers, 8);
        assert_eq!(resolved.config_file, Some(path));
        assert!(!resolved.using_defaults);
    }

    #[test]
    fn config_path_from_env() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "history_limit = 5\n");
        let env = env_from(&[(ENV_CONFIG, path.to_str().unwrap())]);
        let resolved = resolve_config_with(&ConfigOverrides::default(), env).unwrap();
        assert_eq!(resolved.config.history_limit, 5);
    }

    #[test]
    fn explicit_missing_file_is_error() {
        let overrides = ConfigOverrides {
            config_path: Some(PathBuf::from("/nonexistent/hp.toml")),
            ..Default::default()
        };
        let err = resolve_config_with(&overrides, env_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn malformed_env_value_is_error() {
        let overrides = ConfigOverrides {
            config_path: None,
            ..Default::default()
        };
        let err =
            resolve_config_with(&overrides, env_from(&[(ENV_HISTORY_LIMIT, "ten")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { ref var, .. } if var == ENV_HISTORY_LIMIT));
    }

    #[test]
    fn invalid_result_is_rejected() {
        let overrides = ConfigOverrides {
            history_limit: Some(0),
            ..Default::default()
        };
        let err = resolve_config_with(&overrides, env_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "workers = \"many\"\n");
        let overrides = ConfigOverrides {
            config_path: Some(path),
            ..Default::default()
        };
        let err = resolve_config_with(&overrides, env_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
