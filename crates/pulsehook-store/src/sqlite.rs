//! SQLite job store implementation.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::params;
use tokio::time::timeout;
use tokio_rusqlite::Connection;
use tracing::{debug, warn};
use uuid::Uuid;

use pulsehook_core::Job;

use crate::error::StoreError;
use crate::schema::init_schema;
use crate::store::JobStore;

#[cfg(test)]
#[path = "sqlite_tests.rs"]
mod tests;

/// Default bound for opening the database.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default bound for a single fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// SQLite-backed job store.
///
/// Every call is bounded: opening the database by a connect timeout, each
/// fetch by a fetch timeout, so one slow store never stalls the tick loop
/// indefinitely.
pub struct SqliteJobStore {
    conn: Connection,
    fetch_timeout: Duration,
}

impl SqliteJobStore {
    /// Open a file-backed database, creating the schema if needed.
    ///
    /// # Errors
    ///
    /// [`StoreError::Timeout`] when the open exceeds `connect_timeout`,
    /// [`StoreError::Connection`] when the database cannot be opened.
    pub async fn open(
        path: impl AsRef<Path>,
        connect_timeout: Duration,
        fetch_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let conn = timeout(connect_timeout, Connection::open(path))
            .await
            .map_err(|_| {
                StoreError::Timeout(format!("open exceeded {}s", connect_timeout.as_secs()))
            })?
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        conn.call(|conn| Ok(init_schema(conn)?))
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self {
            conn,
            fetch_timeout,
        })
    }

    /// Open an in-memory database with default timeouts.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        conn.call(|conn| Ok(init_schema(conn)?))
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self {
            conn,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        })
    }
}

#[async_trait]
impl JobStore for SqliteJobStore {
    async fn fetch_all(&self) -> Result<Vec<Job>, StoreError> {
        let rows = timeout(
            self.fetch_timeout,
            self.conn.call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, endpoint, secret, schedule FROM jobs ORDER BY created_at",
                )?;
                let rows = stmt
                    .query_map([], |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, String>(3)?,
                        ))
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            }),
        )
        .await
        .map_err(|_| {
            StoreError::Timeout(format!("fetch exceeded {}s", self.fetch_timeout.as_secs()))
        })?
        .map_err(|e| StoreError::Query(e.to_string()))?;

        // A record that fails to decode is skipped; siblings still load.
        let mut jobs = Vec::with_capacity(rows.len());
        for (id, endpoint, secret, schedule) in rows {
            let id = match Uuid::parse_str(&id) {
                Ok(id) => id,
                Err(e) => {
                    warn!("Skipping job record with malformed id '{}': {}", id, e);
                    continue;
                }
            };
            let job = Job {
                id,
                endpoint,
                secret,
                schedule,
            };
            if let Err(e) = job.validate() {
                warn!(job_id = %job.id, "Skipping invalid job record: {}", e);
                continue;
            }
            jobs.push(job);
        }

        debug!("Fetched {} job record(s)", jobs.len());
        Ok(jobs)
    }

    async fn insert(&self, job: &Job) -> Result<(), StoreError> {
        let job = job.clone();
        let created_at = Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO jobs (id, endpoint, secret, schedule, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        job.id.to_string(),
                        job.endpoint,
                        job.secret,
                        job.schedule,
                        created_at
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        debug!(job_id = %job.id, "Inserted job");
        Ok(())
    }

    async fn remove(&self, id: &Uuid) -> Result<bool, StoreError> {
        let id = id.to_string();
        let changed = self
            .conn
            .call(move |conn| {
                let changed = conn.execute("DELETE FROM jobs WHERE id = ?1", params![id])?;
                Ok(changed)
            })
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(changed > 0)
    }
}
