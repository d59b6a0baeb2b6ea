//! House price service configuration loading and validation.
//!
//! This crate provides:
//! - The typed [`ServerConfig`] and its defaults
//! - Config resolution (CLI → env → config file → defaults)
//! - Semantic validation

pub mod resolve;
pub mod server;
pub mod validate;

pub use resolve::{resolve_config, resolve_config_with, ConfigOverrides, ResolvedConfig};
pub use server::ServerConfig;
pub use validate::{validate, ConfigError};

/// Directory name used under the platform config directory.
pub const APP_DIR_NAME: &str = "house_price";

/// File name of the optional TOML config.
pub const CONFIG_FILE_NAME: &str = "config.toml";
