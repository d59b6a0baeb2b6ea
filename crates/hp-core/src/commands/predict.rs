//! `predict`: score one request without the HTTP server.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use hp_common::{Error, OutputFormat, PredictionRequest, Result};
use hp_config::ResolvedConfig;
use serde_json::json;

use super::{emit, envelope};
use crate::context::ServingContext;
use crate::exit_codes::ExitCode;
use crate::startup;

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// JSON request body, or `-` for stdin
    #[arg(long, value_name = "FILE")]
    pub input: PathBuf,

    /// Also append the prediction to the log
    #[arg(long)]
    pub log: bool,
}

pub fn run(format: OutputFormat, resolved: &ResolvedConfig, args: &PredictArgs) -> Result<ExitCode> {
    let request = read_request(&args.input)?;
    let config = &resolved.config;

    let payload = if args.log {
        let service = startup::build_service(config)?;
        let prediction = service.predict(&request)?;
        json!({
            "predicted_median_house_value": prediction.value,
            "log": prediction.log,
        })
    } else {
        let value = ServingContext::load(config)?.score(&request)?;
        json!({ "predicted_median_house_value": value })
    };

    emit(format, &envelope("predict", payload))?;
    Ok(ExitCode::Clean)
}

fn read_request(input: &Path) -> Result<PredictionRequest> {
    let raw = if input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(input)?
    };
    serde_json::from_str(&raw).map_err(|e| Error::Validation(e.to_string()))
}
