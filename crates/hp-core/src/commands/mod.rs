//! Subcommand implementations.
//!
//! Every command prints one JSON document on stdout. Most wrap their payload
//! in the same envelope: `schema_version`, `generated_at` and `command`.

pub mod check;
pub mod config;
pub mod history;
pub mod predict;
pub mod schema;
pub mod serve;

use hp_common::{OutputFormat, Result, SCHEMA_VERSION};
use serde_json::{Map, Value};

/// Merge `payload`'s fields into the standard envelope.
pub(crate) fn envelope(command: &str, payload: Value) -> Value {
    let mut doc = Map::new();
    doc.insert("schema_version".into(), SCHEMA_VERSION.into());
    doc.insert("generated_at".into(), chrono::Utc::now().to_rfc3339().into());
    doc.insert("command".into(), command.into());
    match payload {
        Value::Object(fields) => doc.extend(fields),
        other => {
            doc.insert("result".into(), other);
        }
    }
    Value::Object(doc)
}

pub(crate) fn emit(format: OutputFormat, value: &Value) -> Result<()> {
    println!("{}", format.render(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_flattens_objects() {
        let doc = envelope("history", json!({"count": 2}));
        assert_eq!(doc["command"], "history");
        assert_eq!(doc["count"], 2);
        assert_eq!(doc["schema_version"], SCHEMA_VERSION);
    }

    #[test]
    fn envelope_nests_non_objects() {
        let doc = envelope("schema", json!([1, 2]));
        assert_eq!(doc["result"], json!([1, 2]));
    }
}
