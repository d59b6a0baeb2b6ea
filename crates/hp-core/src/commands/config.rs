//! `config show`.

use hp_common::{OutputFormat, Result};
use hp_config::ResolvedConfig;

use super::{emit, envelope};
use crate::exit_codes::ExitCode;

pub fn show(format: OutputFormat, resolved: &ResolvedConfig) -> Result<ExitCode> {
    let payload = serde_json::to_value(resolved)?;
    emit(format, &envelope("config show", payload))?;
    Ok(ExitCode::Clean)
}
