//! SQLite-backed implementation of the CallHistorySink port.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use frontdesk_core::CallHistorySink;
use frontdesk_domain::{CallRecord, FrontdeskError, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::errors::InfraError;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS call_history (
    id TEXT PRIMARY KEY,
    phone_number TEXT,
    name TEXT,
    meeting_date TEXT,
    notes TEXT NOT NULL,
    created_at INTEGER NOT NULL
)";

/// Durable call-history store on a local SQLite database.
///
/// All statements run on the blocking pool; the connection pool hands out
/// short-lived connections per write.
pub struct SqliteCallHistory {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteCallHistory {
    /// Open (and create if needed) the history database at `path`.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path.as_ref());
        Self::with_manager(manager)
    }

    /// In-memory store, used by tests and dry runs.
    pub fn in_memory() -> Result<Self> {
        // A single connection keeps the shared in-memory database alive.
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| FrontdeskError::Storage(format!("pool error: {e}")))?;
        let store = Self { pool };
        store.apply_schema()?;
        Ok(store)
    }

    fn with_manager(manager: SqliteConnectionManager) -> Result<Self> {
        let pool = Pool::builder()
            .build(manager)
            .map_err(|e| FrontdeskError::Storage(format!("pool error: {e}")))?;
        let store = Self { pool };
        store.apply_schema()?;
        Ok(store)
    }

    fn apply_schema(&self) -> Result<()> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        conn.execute(SCHEMA, []).map_err(InfraError::from)?;
        Ok(())
    }

    /// Most recent records, newest first. Used by operator tooling.
    pub async fn recent(&self, limit: u32) -> Result<Vec<StoredCall>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<Vec<StoredCall>> {
            let conn = pool.get().map_err(InfraError::from)?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, phone_number, name, meeting_date, notes, created_at
                     FROM call_history
                     ORDER BY created_at DESC, id
                     LIMIT ?1",
                )
                .map_err(InfraError::from)?;
            let rows = stmt
                .query_map(params![limit], |row| {
                    Ok(StoredCall {
                        id: row.get(0)?,
                        phone_number: row.get(1)?,
                        name: row.get(2)?,
                        meeting_date: row.get(3)?,
                        notes: row.get(4)?,
                        created_at: row.get(5)?,
                    })
                })
                .map_err(InfraError::from)?;
            let mut out = Vec::new();
            for row in rows {
                out.push(row.map_err(InfraError::from)?);
            }
            Ok(out)
        })
        .await
        .map_err(InfraError::from)?
    }

    /// Fetch one record by id; `None` when absent.
    pub async fn find(&self, id: &str) -> Result<Option<StoredCall>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || -> Result<Option<StoredCall>> {
            let conn = pool.get().map_err(InfraError::from)?;
            let row = conn
                .query_row(
                    "SELECT id, phone_number, name, meeting_date, notes, created_at
                     FROM call_history WHERE id = ?1",
                    params![id],
                    |row| {
                        Ok(StoredCall {
                            id: row.get(0)?,
                            phone_number: row.get(1)?,
                            name: row.get(2)?,
                            meeting_date: row.get(3)?,
                            notes: row.get(4)?,
                            created_at: row.get(5)?,
                        })
                    },
                )
                .optional()
                .map_err(InfraError::from)?;
            Ok(row)
        })
        .await
        .map_err(InfraError::from)?
    }
}

/// One persisted call-history row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCall {
    pub id: String,
    pub phone_number: Option<String>,
    pub name: Option<String>,
    pub meeting_date: Option<String>,
    pub notes: String,
    pub created_at: i64,
}

#[async_trait]
impl CallHistorySink for SqliteCallHistory {
    #[instrument(skip(self, record))]
    async fn record(&self, record: &CallRecord) -> Result<()> {
        let pool = self.pool.clone();
        let id = Uuid::new_v4().to_string();
        let phone = record.phone.clone();
        let name = record.name.clone();
        let meeting_date =
            record.meeting_time.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true));
        let notes = record.notes.clone();
        let created_at = Utc::now().timestamp();

        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = pool.get().map_err(InfraError::from)?;
            conn.execute(
                "INSERT INTO call_history (id, phone_number, name, meeting_date, notes, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![id, phone, name, meeting_date, notes, created_at],
            )
            .map_err(InfraError::from)?;
            debug!(id = %id, "call history row written");
            Ok(())
        })
        .await
        .map_err(InfraError::from)?
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn sample_record(notes: &str) -> CallRecord {
        CallRecord {
            phone: Some("+15551234567".into()),
            name: Some("Ada".into()),
            meeting_time: Some(Utc.with_ymd_and_hms(2025, 6, 2, 14, 0, 0).unwrap()),
            notes: notes.to_string(),
        }
    }

    #[tokio::test]
    async fn record_persists_all_fields() {
        let store = SqliteCallHistory::in_memory().unwrap();
        store.record(&sample_record("Rescheduled to June 2")).await.unwrap();

        let rows = store.recent(10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].phone_number.as_deref(), Some("+15551234567"));
        assert_eq!(rows[0].name.as_deref(), Some("Ada"));
        assert_eq!(rows[0].meeting_date.as_deref(), Some("2025-06-02T14:00:00Z"));
        assert_eq!(rows[0].notes, "Rescheduled to June 2");
    }

    #[tokio::test]
    async fn record_allows_missing_identity_and_meeting() {
        let store = SqliteCallHistory::in_memory().unwrap();
        let record = CallRecord {
            phone: None,
            name: None,
            meeting_time: None,
            notes: "No answer".to_string(),
        };
        store.record(&record).await.unwrap();

        let rows = store.recent(10).await.unwrap();
        assert_eq!(rows[0].phone_number, None);
        assert_eq!(rows[0].meeting_date, None);
    }

    #[tokio::test]
    async fn recent_limits_and_find_round_trips() {
        let store = SqliteCallHistory::in_memory().unwrap();
        for i in 0..5 {
            store.record(&sample_record(&format!("call {i}"))).await.unwrap();
        }

        let rows = store.recent(3).await.unwrap();
        assert_eq!(rows.len(), 3);

        let found = store.find(&rows[0].id).await.unwrap();
        assert_eq!(found.as_ref(), Some(&rows[0]));
        assert_eq!(store.find("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn open_creates_the_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.db");
        let store = SqliteCallHistory::open(&path).unwrap();
        store.record(&sample_record("persisted")).await.unwrap();
        assert!(path.exists());

        // Reopening sees the previous write.
        drop(store);
        let reopened = SqliteCallHistory::open(&path).unwrap();
        assert_eq!(reopened.recent(10).await.unwrap().len(), 1);
    }
}
