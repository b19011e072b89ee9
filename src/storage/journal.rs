use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{Connection, Result as SqliteResult};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calendar::CalendarEvent;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Failed to create journal directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unknown journal operation '{0}'")]
    UnknownOperation(String),
}

/// A local calendar mutation awaiting a backend that can accept it.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Reschedule { event_id: String, from: NaiveDateTime, to: NaiveDateTime },
    Upsert(CalendarEvent),
    Delete { event_id: String },
}

#[derive(Serialize, Deserialize)]
struct ReschedulePayload {
    from: NaiveDateTime,
    to: NaiveDateTime,
}

impl Change {
    pub fn operation(&self) -> &'static str {
        match self {
            Change::Reschedule { .. } => "reschedule",
            Change::Upsert(_) => "upsert",
            Change::Delete { .. } => "delete",
        }
    }

    pub fn event_id(&self) -> &str {
        match self {
            Change::Reschedule { event_id, .. } | Change::Delete { event_id } => event_id,
            Change::Upsert(event) => &event.id,
        }
    }

    fn payload(&self) -> Result<String, serde_json::Error> {
        match self {
            Change::Reschedule { from, to, .. } => serde_json::to_string(&ReschedulePayload { from: *from, to: *to }),
            Change::Upsert(event) => serde_json::to_string(event),
            Change::Delete { .. } => Ok("{}".to_string()),
        }
    }

    fn decode(operation: &str, event_id: String, data: &str) -> Result<Self, JournalError> {
        Ok(match operation {
            "reschedule" => {
                let payload: ReschedulePayload = serde_json::from_str(data)?;
                Change::Reschedule { event_id, from: payload.from, to: payload.to }
            }
            "upsert" => Change::Upsert(serde_json::from_str(data)?),
            "delete" => Change::Delete { event_id },
            other => return Err(JournalError::UnknownOperation(other.to_string())),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingChange {
    pub id: i64,
    pub change: Change,
    pub created_at: DateTime<Utc>,
}

pub struct Journal {
    conn: Connection,
}

impl Journal {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn open(path: &Path) -> Result<Self, JournalError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let journal = Self::new(Connection::open(path)?);
        journal.initialize()?;
        Ok(journal)
    }

    pub fn initialize(&self) -> Result<(), JournalError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS pending_changes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                operation TEXT NOT NULL,
                event_id TEXT NOT NULL,
                data TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    pub fn record(&self, change: &Change) -> Result<(), JournalError> {
        let data = change.payload()?;
        self.conn.execute(
            "INSERT INTO pending_changes (operation, event_id, data, created_at) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![change.operation(), change.event_id(), &data, Utc::now().to_rfc3339()],
        )?;
        tracing::debug!("Journaled {} for {}", change.operation(), change.event_id());
        Ok(())
    }

    /// Oldest first.
    pub fn pending(&self) -> Result<Vec<PendingChange>, JournalError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, operation, event_id, data, created_at FROM pending_changes ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut changes = Vec::new();
        for row in rows {
            let (id, operation, event_id, data, created_at) = row?;
            let created_at = DateTime::parse_from_rfc3339(&created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|e| {
                    tracing::warn!("Journal entry {} has bad timestamp '{}': {}", id, created_at, e);
                    DateTime::<Utc>::MIN_UTC
                });
            changes.push(PendingChange { id, change: Change::decode(&operation, event_id, &data)?, created_at });
        }
        Ok(changes)
    }

    pub fn count(&self) -> Result<usize, JournalError> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM pending_changes", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Empties the journal and returns how many entries were dropped.
    pub fn clear(&self) -> Result<usize, JournalError> {
        Ok(self.conn.execute("DELETE FROM pending_changes", [])?)
    }

    pub fn table_exists(&self, table_name: &str) -> bool {
        let result: SqliteResult<i32> = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            [table_name],
            |row| row.get(0),
        );
        result.unwrap_or(0) > 0
    }
}
