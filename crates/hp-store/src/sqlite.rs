//! SQLite-backed prediction log.
//!
//! One connection serves every request thread behind a mutex; inserts are
//! independent statements and rely on SQLite's own atomicity. After a
//! connection-level fault the connection is dropped and the next call opens
//! a fresh one.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use hp_common::{PredictionId, PredictionRecord, PredictionRequest};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};
use crate::schema;
use crate::PredictionLog;

/// Default busy timeout applied to every connection.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Where and how to open the database.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Database file; `None` opens a private in-memory database.
    pub path: Option<PathBuf>,

    /// How long a statement waits on a locked database.
    pub busy_timeout: Duration,
}

impl StoreConfig {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }

    /// In-memory database. Data does not survive a reconnect.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    fn describe(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => ":memory:".to_string(),
        }
    }
}

/// Prediction log stored in a single SQLite table.
#[derive(Debug)]
pub struct SqliteLog {
    config: StoreConfig,
    conn: Mutex<Option<Connection>>,
}

impl SqliteLog {
    /// Open the database and create the table if needed.
    pub fn open(config: StoreConfig) -> Result<Self> {
        let conn = open_connection(&config)?;
        info!(database = %config.describe(), "prediction store connected");
        Ok(Self {
            config,
            conn: Mutex::new(Some(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::open(StoreConfig::in_memory())
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Number of logged predictions.
    pub fn count(&self) -> Result<u64> {
        self.with_connection(|conn| {
            let count: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM {}", schema::TABLE_NAME),
                [],
                |row| row.get(0),
            )?;
            Ok(count.max(0) as u64)
        })
    }

    /// Largest id handed out so far.
    pub fn max_id(&self) -> Result<Option<PredictionId>> {
        self.with_connection(|conn| {
            let id: Option<i64> = conn.query_row(
                &format!("SELECT MAX(id) FROM {}", schema::TABLE_NAME),
                [],
                |row| row.get(0),
            )?;
            Ok(id.map(PredictionId))
        })
    }

    /// Drop the current connection; the next operation reconnects.
    pub fn disconnect(&self) -> Result<()> {
        let mut slot = self.lock()?;
        if slot.take().is_some() {
            debug!(database = %self.config.describe(), "prediction store disconnected");
        }
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.conn.lock().map(|slot| slot.is_some()).unwrap_or(false)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Connection>>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Run `op` on a live connection, reconnecting first if needed.
    fn with_connection<T>(&self, op: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let mut slot = self.lock()?;
        let conn = match slot.take() {
            Some(conn) => conn,
            None => {
                info!(database = %self.config.describe(), "reconnecting to prediction store");
                open_connection(&self.config)?
            }
        };
        let result = op(&conn);
        match &result {
            Err(e) if e.is_connection_fault() => {
                warn!(error = %e, "dropping prediction store connection");
            }
            _ => *slot = Some(conn),
        }
        result
    }
}

impl PredictionLog for SqliteLog {
    fn append(&self, request: &PredictionRequest, predicted_value: f64) -> Result<PredictionId> {
        self.with_connection(|conn| {
            conn.execute(
                schema::INSERT,
                params![
                    request.longitude,
                    request.latitude,
                    request.housing_median_age,
                    request.total_rooms,
                    request.total_bedrooms,
                    request.population,
                    request.households,
                    request.median_income,
                    request.ocean_proximity,
                    predicted_value,
                    Utc::now().to_rfc3339(),
                ],
            )?;
            Ok(PredictionId(conn.last_insert_rowid()))
        })
    }

    fn list_recent(&self, limit: usize) -> Result<Vec<PredictionRecord>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare_cached(&format!(
                "SELECT {} FROM {} ORDER BY id DESC LIMIT ?1",
                schema::SELECT_COLUMNS,
                schema::TABLE_NAME
            ))?;
            let limit = i64::try_from(limit).unwrap_or(i64::MAX);
            let rows = stmt.query_map(params![limit], record_from_row)?;
            let records = rows.collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(records)
        })
    }

    fn get(&self, id: PredictionId) -> Result<Option<PredictionRecord>> {
        self.with_connection(|conn| {
            let record = conn
                .query_row(
                    &format!(
                        "SELECT {} FROM {} WHERE id = ?1",
                        schema::SELECT_COLUMNS,
                        schema::TABLE_NAME
                    ),
                    params![id.0],
                    record_from_row,
                )
                .optional()?;
            Ok(record)
        })
    }
}

fn open_connection(config: &StoreConfig) -> Result<Connection> {
    let conn = match &config.path {
        Some(path) => {
            ensure_parent_dir(path)?;
            let conn = Connection::open(path)?;
            conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")?;
            conn
        }
        None => Connection::open_in_memory()?,
    };
    conn.busy_timeout(config.busy_timeout)?;
    conn.execute_batch(schema::CREATE_TABLE)?;
    Ok(conn)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                path: parent.to_path_buf(),
                source: e,
            })
        }
        _ => Ok(()),
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<PredictionRecord> {
    Ok(PredictionRecord {
        id: PredictionId(row.get(0)?),
        longitude: row.get(1)?,
        latitude: row.get(2)?,
        housing_median_age: row.get(3)?,
        total_rooms: row.get(4)?,
        total_bedrooms: row.get(5)?,
        population: row.get(6)?,
        households: row.get(7)?,
        median_income: row.get(8)?,
        ocean_proximity: row.get(9)?,
        predicted_value: row.get(10)?,
        created_at: row.get(11)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn request(label: &str) -> PredictionRequest {
        PredictionRequest {
            ocean_proximity: label.to_string(),
            ..PredictionRequest::example()
        }
    }

    #[test]
    fn append_assigns_increasing_ids() {
        let log = SqliteLog::open_in_memory().unwrap();
        let a = log.append(&request("NEAR BAY"), 1.0).unwrap();
        let b = log.append(&request("INLAND"), 2.0).unwrap();
        assert!(b > a);
        assert_eq!(log.max_id().unwrap(), Some(b));
        assert_eq!(log.count().unwrap(), 2);
    }

    #[test]
    fn get_returns_logged_fields() {
        let log = SqliteLog::open_in_memory().unwrap();
        let id = log.append(&request("ISLAND"), 452_600.0).unwrap();
        let record = log.get(id).unwrap().unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.request(), request("ISLAND"));
        assert_eq!(record.predicted_value, 452_600.0);
        assert!(chrono::DateTime::parse_from_rfc3339(&record.created_at).is_ok());
    }

    #[test]
    fn get_unknown_id_is_none() {
        let log = SqliteLog::open_in_memory().unwrap();
        assert!(log.get(PredictionId(99)).unwrap().is_none());
    }

    #[test]
    fn list_recent_is_newest_first_and_bounded() {
        let log = SqliteLog::open_in_memory().unwrap();
        for i in 0..15 {
            log.append(&request("INLAND"), i as f64).unwrap();
        }
        let records = log.list_recent(10).unwrap();
        assert_eq!(records.len(), 10);
        assert!(records.windows(2).all(|w| w[0].id > w[1].id));
        assert_eq!(records[0].predicted_value, 14.0);
    }

    #[test]
    fn list_recent_on_empty_table() {
        let log = SqliteLog::open_in_memory().unwrap();
        assert!(log.list_recent(10).unwrap().is_empty());
    }

    #[test]
    fn reconnects_after_disconnect() {
        let tmp = TempDir::new().unwrap();
        let log = SqliteLog::open(StoreConfig::file(tmp.path().join("db/predictions.db"))).unwrap();
        let id = log.append(&request("NEAR OCEAN"), 3.0).unwrap();

        log.disconnect().unwrap();
        assert!(!log.is_connected());

        assert!(log.get(id).unwrap().is_some());
        assert!(log.is_connected());
    }

    #[test]
    fn connection_fault_drops_connection_until_next_call() {
        let tmp = TempDir::new().unwrap();
        let log = SqliteLog::open(StoreConfig::file(tmp.path().join("predictions.db"))).unwrap();
        let id = log.append(&request("INLAND"), 5.0).unwrap();

        let err = log
            .with_connection(|_| -> Result<()> {
                Err(StoreError::Io {
                    path: tmp.path().to_path_buf(),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "disk gone"),
                })
            })
            .unwrap_err();
        assert!(err.is_connection_fault());
        assert!(!log.is_connected());

        assert!(log.get(id).unwrap().is_some());
        assert!(log.is_connected());
    }

    #[test]
    fn statement_fault_keeps_connection() {
        let log = SqliteLog::open_in_memory().unwrap();
        let err = log
            .with_connection(|conn| {
                conn.execute("INSERT INTO no_such_table VALUES (1)", [])?;
                Ok(())
            })
            .unwrap_err();
        assert!(!err.is_connection_fault());
        assert!(log.is_connected());
    }

    #[test]
    fn failed_reconnect_is_retried_on_next_call() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("db");
        let log = SqliteLog::open(StoreConfig::file(dir.join("predictions.db"))).unwrap();
        log.disconnect().unwrap();

        // The database directory is replaced by a plain file.
        fs::remove_dir_all(&dir).unwrap();
        fs::write(&dir, b"not a directory").unwrap();
        let err = log.count().unwrap_err();
        assert!(err.is_connection_fault());
        assert!(!log.is_connected());

        fs::remove_file(&dir).unwrap();
        assert_eq!(log.count().unwrap(), 0);
        assert!(log.is_connected());
    }

    #[test]
    fn table_creation_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("predictions.db");
        {
            let log = SqliteLog::open(StoreConfig::file(&path)).unwrap();
            log.append(&request("INLAND"), 1.0).unwrap();
        }
        let reopened = SqliteLog::open(StoreConfig::file(&path)).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
    }
}
