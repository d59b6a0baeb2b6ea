//! `serve`: run the HTTP service until the process is stopped.

use std::sync::Arc;

use hp_common::Result;
use hp_config::ResolvedConfig;
use tracing::info;

use crate::exit_codes::ExitCode;
use crate::server::HttpServer;
use crate::startup;

pub fn run(resolved: &ResolvedConfig) -> Result<ExitCode> {
    let config = &resolved.config;
    match &resolved.config_file {
        Some(path) => info!(config_file = %path.display(), "configuration loaded"),
        None => info!("no config file, using defaults"),
    }

    let service = Arc::new(startup::build_service(config)?);
    HttpServer::bind(&config.bind_addr, service, config.workers)?.run()?;
    Ok(ExitCode::Clean)
}
