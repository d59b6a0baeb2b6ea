//! `predictions_log` table definition.

/// Name of the prediction log table.
pub const TABLE_NAME: &str = "predictions_log";

/// Idempotent DDL run at every startup.
pub const CREATE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS predictions_log (
        id                 INTEGER PRIMARY KEY AUTOINCREMENT,
        longitude          REAL,
        latitude           REAL,
        housing_median_age REAL,
        total_rooms        REAL,
        total_bedrooms     REAL,
        population         REAL,
        households         REAL,
        median_income      REAL,
        ocean_proximity    VARCHAR(255),
        predicted_value    REAL,
        created_at         TEXT NOT NULL
    );
";

/// Column list shared by every SELECT, in [`PredictionRecord`] field order.
///
/// [`PredictionRecord`]: hp_common::PredictionRecord
pub const SELECT_COLUMNS: &str = "id, longitude, latitude, housing_median_age, total_rooms, \
     total_bedrooms, population, households, median_income, ocean_proximity, \
     predicted_value, created_at";

pub const INSERT: &str = "INSERT INTO predictions_log (
        longitude, latitude, housing_median_age, total_rooms, total_bedrooms,
        population, households, median_income, ocean_proximity, predicted_value,
        created_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";
