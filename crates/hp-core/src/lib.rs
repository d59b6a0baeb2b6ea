//! House price prediction service.
//!
//! Loads the trained linear model and its column schema once at startup,
//! serves predictions over HTTP, and appends each one to a SQLite log that
//! the history endpoints read back.

pub mod cli;
pub mod commands;
pub mod context;
pub mod exit_codes;
pub mod http;
pub mod logging;
pub mod server;
pub mod service;
pub mod startup;

pub(crate) mod errors;

#[cfg(test)]
mod test_support;

pub use context::ServingContext;
pub use exit_codes::ExitCode;
pub use server::{HttpServer, ServerHandle};
pub use service::{LogOutcome, Prediction, PredictionService};
