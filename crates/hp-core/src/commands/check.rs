//! `check`: verify that the service could start, without serving.
//!
//! Every stage is attempted even after an earlier one fails, so a single run
//! reports all problems. The exit code is that of the first failure.
//!
//! The store stage opens the log exactly as `serve` would, so a missing
//! database directory, file and table are created as a side effect.

use hp_common::{Error, OceanProximity, OutputFormat};
use hp_model::{indicator_column, ArtifactSet};
use hp_store::{SqliteLog, StoreConfig};
use serde::Serialize;
use serde_json::{json, Value};

use super::{emit, envelope};
use crate::cli::ConfigArgs;
use crate::errors;
use crate::exit_codes::ExitCode;

#[derive(Debug, Serialize)]
struct CheckResult {
    name: &'static str,
    status: &'static str,
    #[serde(skip_serializing_if = "Value::is_null")]
    detail: Value,
}

impl CheckResult {
    fn ok(name: &'static str, detail: Value) -> Self {
        Self {
            name,
            status: "ok",
            detail,
        }
    }

    fn failed(name: &'static str, err: &Error) -> Self {
        Self {
            name,
            status: "error",
            detail: json!({ "code": err.code(), "error": err.to_string() }),
        }
    }
}

#[derive(Default)]
struct Report {
    checks: Vec<CheckResult>,
    first_failure: Option<ExitCode>,
}

impl Report {
    fn record<T>(
        &mut self,
        name: &'static str,
        outcome: hp_common::Result<T>,
        detail: impl FnOnce(&T) -> Value,
    ) -> Option<T> {
        match outcome {
            Ok(value) => {
                self.checks.push(CheckResult::ok(name, detail(&value)));
                Some(value)
            }
            Err(err) => {
                self.first_failure.get_or_insert(ExitCode::from(&err));
                self.checks.push(CheckResult::failed(name, &err));
                None
            }
        }
    }
}

pub fn run(format: OutputFormat, args: &ConfigArgs) -> ExitCode {
    let mut report = Report::default();

    let resolved = report.record("config", args.resolve(), |r| {
        json!({ "config_file": r.config_file, "using_defaults": r.using_defaults })
    });

    if let Some(resolved) = &resolved {
        let config = &resolved.config;
        let artifacts = ArtifactSet::load(&config.model_path, &config.columns_path)
            .map_err(errors::artifact);
        report.record("artifacts", artifacts, artifact_detail);

        // One attempt: check reports, it does not wait out outages.
        let store =
            SqliteLog::open(StoreConfig::file(&config.database_path)).map_err(errors::store);
        report.record("store", store, |log| {
            json!({
                "path": config.database_path,
                "records": log.count().ok(),
            })
        });
    }

    let status = if report.first_failure.is_some() { "error" } else { "ok" };
    let doc = envelope("check", json!({ "status": status, "checks": report.checks }));
    let exit = report.first_failure.unwrap_or(ExitCode::Clean);
    match emit(format, &doc) {
        Ok(()) => exit,
        Err(_) => ExitCode::IoError,
    }
}

fn artifact_detail(set: &ArtifactSet) -> Value {
    let indicators: Vec<&str> = set.columns.indicator_columns().collect();
    // Labels without a column score as the dropped baseline.
    let implicit: Vec<&str> = OceanProximity::ALL
        .iter()
        .map(|p| p.as_str())
        .filter(|label| set.columns.position(&indicator_column(label)).is_none())
        .collect();
    json!({
        "columns": set.columns.len(),
        "indicator_columns": indicators,
        "baseline_labels": implicit,
        "fingerprint": set.fingerprint,
    })
}
