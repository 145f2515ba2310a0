//! Persistent archive of previously seen content fingerprints.
//!
//! Filters items already published in an earlier digest. Each record is a
//! fingerprint (the digest stores item URLs) and the ISO-8601 time it was
//! first archived. Matching is exact string equality.
//!
//! Retention is bounded: each archive call that leaves the table above the
//! retention threshold evicts one batch of the oldest records.

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use tracing::{debug, info};

use crate::utils::constants::{DEFAULT_ARCHIVE_EVICTION_BATCH, DEFAULT_ARCHIVE_RETENTION_THRESHOLD};

/// SQL schema for the archive database
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS archive (
    fingerprint TEXT PRIMARY KEY,
    timestamp TEXT NOT NULL
);

-- Eviction scans oldest first
CREATE INDEX IF NOT EXISTS idx_archive_timestamp ON archive(timestamp);
"#;

/// Errors raised by the archive store
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("Archive store failure: {0}")]
    Store(#[from] sqlx::Error),

    #[error("Archive I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

/// Retention settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveOptions {
    /// Record count above which eviction starts
    pub retention_threshold: usize,
    /// Records removed per eviction round
    pub eviction_batch: usize,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            retention_threshold: DEFAULT_ARCHIVE_RETENTION_THRESHOLD,
            eviction_batch: DEFAULT_ARCHIVE_EVICTION_BATCH,
        }
    }
}

/// File-backed fingerprint set with bounded retention.
///
/// Assumes a single writer; the digest pipeline archives once per run.
#[derive(Clone)]
pub struct ArchiveStore {
    pool: SqlitePool,
    options: ArchiveOptions,
}

impl ArchiveStore {
    /// Open the archive at `path`, creating file and schema if missing.
    pub async fn open(path: &Path, options: ArchiveOptions) -> Result<Self, ArchiveError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let connect_options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(connect_options)
            .await?;

        // Idempotent
        sqlx::query(SCHEMA_SQL).execute(&pool).await?;

        debug!("Opened archive at {}", path.display());
        Ok(Self { pool, options })
    }

    #[must_use]
    pub fn options(&self) -> ArchiveOptions {
        self.options
    }

    /// Drop already-archived strings from `batch`, then archive the rest.
    ///
    /// Returns the surviving strings in their original order.
    pub async fn run(&self, batch: Vec<String>) -> Result<Vec<String>, ArchiveError> {
        let incoming = batch.len();
        let survivors = self.filter_old(batch).await?;
        self.archive(&survivors).await?;
        info!(
            "Archive kept {} of {incoming} items ({} filtered as seen)",
            survivors.len(),
            incoming - survivors.len()
        );
        Ok(survivors)
    }

    /// Remove every string whose fingerprint is already stored; order is kept.
    pub async fn filter_old(&self, batch: Vec<String>) -> Result<Vec<String>, ArchiveError> {
        let mut survivors = Vec::with_capacity(batch.len());
        for fingerprint in batch {
            if !self.contains(&fingerprint).await? {
                survivors.push(fingerprint);
            }
        }
        Ok(survivors)
    }

    /// Record every survivor with the current time, then enforce retention.
    ///
    /// A fingerprint repeated within `survivors` is stored once.
    pub async fn archive(&self, survivors: &[String]) -> Result<(), ArchiveError> {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let mut tx = self.pool.begin().await?;
        for fingerprint in survivors {
            sqlx::query("INSERT OR IGNORE INTO archive (fingerprint, timestamp) VALUES (?, ?)")
                .bind(fingerprint)
                .bind(&timestamp)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        self.evict().await
    }

    /// Evict one batch of the oldest records if the count is above the threshold
    async fn evict(&self) -> Result<(), ArchiveError> {
        if self.len().await? <= self.options.retention_threshold {
            return Ok(());
        }
        let batch = i64::try_from(self.options.eviction_batch).unwrap_or(i64::MAX);
        let removed = sqlx::query(
            "DELETE FROM archive WHERE rowid IN \
             (SELECT rowid FROM archive ORDER BY timestamp ASC, rowid ASC LIMIT ?)",
        )
        .bind(batch)
        .execute(&self.pool)
        .await?
        .rows_affected();
        debug!("Evicted {removed} archive records");
        Ok(())
    }

    /// Whether `fingerprint` is stored
    pub async fn contains(&self, fingerprint: &str) -> Result<bool, ArchiveError> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM archive WHERE fingerprint = ?")
            .bind(fingerprint)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    /// Number of stored records
    pub async fn len(&self) -> Result<usize, ArchiveError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM archive")
            .fetch_one(&self.pool)
            .await?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    pub async fn is_empty(&self) -> Result<bool, ArchiveError> {
        Ok(self.len().await? == 0)
    }

    /// Close the pool, flushing the WAL
    pub async fn close(self) {
        self.pool.close().await;
    }
}
