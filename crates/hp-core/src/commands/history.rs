//! `history`: read the prediction log without loading the model.

use clap::Args;
use hp_common::{Error, OutputFormat, PredictionId, Result};
use hp_config::ResolvedConfig;
use hp_store::PredictionLog;
use serde_json::json;

use super::{emit, envelope};
use crate::errors;
use crate::exit_codes::ExitCode;
use crate::startup;

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Show a single prediction
    #[arg(long, conflicts_with = "limit")]
    pub id: Option<i64>,

    /// Number of recent predictions (defaults to the configured history limit)
    #[arg(long)]
    pub limit: Option<usize>,
}

pub fn run(format: OutputFormat, resolved: &ResolvedConfig, args: &HistoryArgs) -> Result<ExitCode> {
    let log = startup::connect_store(&resolved.config)?;

    let payload = match args.id {
        Some(raw) => {
            let id = PredictionId(raw);
            let record = log
                .get(id)
                .map_err(errors::store)?
                .ok_or(Error::PredictionNotFound { id: raw })?;
            json!({ "record": record })
        }
        None => {
            let limit = args.limit.unwrap_or(resolved.config.history_limit);
            let records = log.list_recent(limit).map_err(errors::store)?;
            json!({ "count": records.len(), "records": records })
        }
    };

    emit(format, &envelope("history", payload))?;
    Ok(ExitCode::Clean)
}
