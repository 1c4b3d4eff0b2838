//! SQLite connection setup and the ledger's ordering guard
//!
//! Every logical ledger operation (an insert, a page read, an aggregate) runs
//! while holding the guard, so a reader observes either the complete pre-insert
//! or the complete post-insert state and concurrent submissions are applied in
//! a single total order.

use std::ops::Deref;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use vouch_common::DatabaseConfig;

/// Serialized handle to the ledger database
#[derive(Clone)]
pub struct LedgerPool {
    inner: Arc<Mutex<SqlitePool>>,
}

/// Exclusive access to the database for the duration of one logical operation
pub struct LedgerSession<'a> {
    guard: MutexGuard<'a, SqlitePool>,
}

impl Deref for LedgerSession<'_> {
    type Target = SqlitePool;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl LedgerPool {
    /// Open (creating if missing) the database described by `config`
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let in_memory = is_memory_url(&config.url);
        let options = connect_options(config, in_memory)?;

        let pool = pool_options(config, in_memory)
            .connect_with(options)
            .await?;

        info!(url = %config.url, in_memory, "ledger database opened");
        Ok(Self::from_pool(pool))
    }

    /// Private in-memory ledger, discarded when the pool is dropped
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        Self::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            busy_timeout_ms: 5000,
        })
        .await
    }

    /// Wrap an already configured pool
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(pool)),
        }
    }

    /// Wait for the ordering guard
    pub async fn session(&self) -> LedgerSession<'_> {
        let guard = self.inner.lock().await;
        debug!("ledger session acquired");
        LedgerSession { guard }
    }

    /// Close every connection once in-flight operations finish
    pub async fn close(&self) {
        self.inner.lock().await.close().await;
    }
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

fn connect_options(config: &DatabaseConfig, in_memory: bool) -> Result<SqliteConnectOptions, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .synchronous(SqliteSynchronous::Full)
        .busy_timeout(config.busy_timeout())
        .foreign_keys(true);

    // WAL needs a file; an in-memory database keeps its own journal
    if in_memory {
        Ok(options)
    } else {
        Ok(options.journal_mode(SqliteJournalMode::Wal))
    }
}

fn pool_options(config: &DatabaseConfig, in_memory: bool) -> SqlitePoolOptions {
    // One connection: the guard already serializes access, and an in-memory
    // database lives exactly as long as its only connection
    let options = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .acquire_timeout(config.busy_timeout() + Duration::from_secs(5));

    if in_memory {
        options.idle_timeout(None).max_lifetime(None)
    } else {
        options
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(1800))
    }
}
