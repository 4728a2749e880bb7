//! SQLite implementation of the ScoreStore trait.
//!
//! This is the primary storage backend. It uses rusqlite with bundled SQLite,
//! wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use pexeso_core::{NewScore, ScoreId, ScoreRecord};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::ScoreStore;

const SELECT_COLUMNS: &str = "SELECT id, date, name, score, time FROM score";

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteScoreStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteScoreStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file (and missing parent directories) and runs migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        info!(path = %path.display(), "opened score database");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking operation on the connection off the async runtime.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::Storage(format!("mutex poisoned: {}", e)))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Storage(format!("spawn_blocking failed: {}", e)))?
    }
}

// Helper to convert a row to ScoreRecord
fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<ScoreRecord> {
    let time: i64 = row.get("time")?;
    let time =
        u64::try_from(time).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(4, time))?;

    Ok(ScoreRecord {
        id: ScoreId::new(row.get("id")?),
        date: row.get("date")?,
        name: row.get("name")?,
        score: row.get("score")?,
        time,
    })
}

fn time_column(time: u64) -> Result<i64> {
    i64::try_from(time)
        .map_err(|_| StoreError::InvalidData(format!("elapsed time {} does not fit a row", time)))
}

fn query_records(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<ScoreRecord>> {
    let mut stmt = conn.prepare(sql)?;
    let records = stmt
        .query_map(params, row_to_record)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(records)
}

#[async_trait]
impl ScoreStore for SqliteScoreStore {
    async fn insert_score(&self, score: &NewScore) -> Result<ScoreId> {
        let score = score.clone();
        let time = time_column(score.time)?;

        let id = self
            .with_conn(move |conn| {
                conn.execute(
                    "INSERT INTO score (date, name, score, time) VALUES (?1, ?2, ?3, ?4)",
                    params![score.date, score.name, score.score, time],
                )?;
                Ok(ScoreId::new(conn.last_insert_rowid()))
            })
            .await?;

        debug!(%id, "inserted score");
        Ok(id)
    }

    async fn restore_score(&self, record: &ScoreRecord) -> Result<()> {
        let record = record.clone();
        let time = time_column(record.time)?;

        self.with_conn(move |conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM score WHERE id = ?1)",
                params![record.id.get()],
                |row| row.get(0),
            )?;

            if exists {
                return Err(StoreError::Conflict { id: record.id });
            }

            conn.execute(
                "INSERT INTO score (id, date, name, score, time) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![record.id.get(), record.date, record.name, record.score, time],
            )?;

            Ok(())
        })
        .await
    }

    async fn delete_score(&self, record: &ScoreRecord) -> Result<usize> {
        let id = record.id;
        let removed = self
            .with_conn(move |conn| {
                Ok(conn.execute("DELETE FROM score WHERE id = ?1", params![id.get()])?)
            })
            .await?;

        debug!(%id, removed, "deleted score");
        Ok(removed)
    }

    async fn delete_player(&self, name: &str) -> Result<usize> {
        let name = name.to_string();
        let removed = self
            .with_conn(move |conn| {
                Ok(conn.execute("DELETE FROM score WHERE name = ?1", params![name])?)
            })
            .await?;

        debug!(removed, "deleted player scores");
        Ok(removed)
    }

    async fn delete_all(&self) -> Result<usize> {
        let removed = self
            .with_conn(|conn| Ok(conn.execute("DELETE FROM score", [])?))
            .await?;

        debug!(removed, "deleted all scores");
        Ok(removed)
    }

    async fn all_scores(&self) -> Result<Vec<ScoreRecord>> {
        self.with_conn(|conn| {
            query_records(
                conn,
                &format!("{SELECT_COLUMNS} ORDER BY score, time, id"),
                [],
            )
        })
        .await
    }

    async fn scores_for_player(&self, name: &str) -> Result<Vec<ScoreRecord>> {
        let name = name.to_string();
        self.with_conn(move |conn| {
            query_records(
                conn,
                &format!("{SELECT_COLUMNS} WHERE name = ?1 ORDER BY score, time, id"),
                params![name],
            )
        })
        .await
    }

    async fn get_score(&self, id: ScoreId) -> Result<Option<ScoreRecord>> {
        self.with_conn(move |conn| {
            conn.query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id.get()],
                row_to_record,
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    async fn count(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM score", [], |row| row.get(0))?;
            Ok(count as usize)
        })
        .await
    }
}
