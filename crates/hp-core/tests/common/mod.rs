//! Shared fixtures: trainer artifacts and a config file in a temp dir.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use hp_config::ServerConfig;
use serde_json::json;
use tempfile::TempDir;

pub const COLUMNS: [&str; 12] = [
    "longitude",
    "latitude",
    "housing_median_age",
    "total_rooms",
    "total_bedrooms",
    "population",
    "households",
    "median_income",
    "ocean_proximity_INLAND",
    "ocean_proximity_ISLAND",
    "ocean_proximity_NEAR BAY",
    "ocean_proximity_NEAR OCEAN",
];

/// `100_000 + 40_000 · median_income + 25_000 · [NEAR BAY]`
pub const INTERCEPT: f64 = 100_000.0;
pub const INCOME_WEIGHT: f64 = 40_000.0;
pub const NEAR_BAY_WEIGHT: f64 = 25_000.0;

/// Value the fixture model gives the documented example request.
pub fn example_value() -> f64 {
    INTERCEPT + INCOME_WEIGHT * 8.3252 + NEAR_BAY_WEIGHT
}

pub struct Fixture {
    pub dir: TempDir,
    pub config: ServerConfig,
    pub config_path: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let models = dir.path().join("models");
        fs::create_dir_all(&models).expect("models dir");

        let columns_path = models.join("model_columns.json");
        fs::write(&columns_path, serde_json::to_string(&COLUMNS).unwrap()).unwrap();

        let mut coefficients = vec![0.0; COLUMNS.len()];
        coefficients[7] = INCOME_WEIGHT;
        coefficients[10] = NEAR_BAY_WEIGHT;
        let model_path = models.join("house_price_model.json");
        let model = json!({
            "model_type": "linear_regression",
            "schema_version": "1.0.0",
            "intercept": INTERCEPT,
            "coefficients": coefficients,
            "feature_names": COLUMNS,
        });
        fs::write(&model_path, model.to_string()).unwrap();

        let config = ServerConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            model_path,
            columns_path,
            database_path: dir.path().join("data").join("predictions.db"),
            connect_retry_delay_secs: 0,
            workers: 2,
            ..ServerConfig::default()
        };

        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, toml_for(&config)).unwrap();

        Self {
            dir,
            config,
            config_path,
        }
    }

    pub fn request_file(&self, body: &serde_json::Value) -> PathBuf {
        let path = self.dir.path().join("request.json");
        fs::write(&path, body.to_string()).unwrap();
        path
    }
}

fn toml_for(config: &ServerConfig) -> String {
    format!(
        "bind_addr = {:?}\nmodel_path = {:?}\ncolumns_path = {:?}\ndatabase_path = {:?}\n\
         connect_retry_delay_secs = 0\nworkers = {}\n",
        config.bind_addr,
        config.model_path.display().to_string(),
        config.columns_path.display().to_string(),
        config.database_path.display().to_string(),
        config.workers,
    )
}

pub fn example_json() -> serde_json::Value {
    json!({
        "longitude": -122.23,
        "latitude": 37.88,
        "housing_median_age": 41,
        "total_rooms": 880,
        "total_bedrooms": 129,
        "population": 322,
        "households": 126,
        "median_income": 8.3252,
        "ocean_proximity": "NEAR BAY",
    })
}
