//! Ledger schema
//!
//! `vouches` is append-only: triggers abort any UPDATE or DELETE, so a record
//! once inserted is never rewritten, even by a stray manual query.

use sqlx::SqlitePool;
use tracing::info;

/// Stored in `PRAGMA user_version` after a successful initialization
pub const SCHEMA_VERSION: i64 = 1;

/// Error message raised by the append-only triggers
pub const APPEND_ONLY_MESSAGE: &str = "vouches are append-only";

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS vouches (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        guild_id INTEGER NOT NULL,
        vouched_user_id INTEGER NOT NULL,
        voucher_user_id INTEGER NOT NULL,
        trader_user_id INTEGER NOT NULL,
        middleman_user_id INTEGER,
        rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
        traded_item TEXT NOT NULL CHECK (length(trim(traded_item)) > 0),
        created_at TEXT NOT NULL,
        created_ts INTEGER NOT NULL,
        suspicious INTEGER NOT NULL DEFAULT 0 CHECK (suspicious IN (0, 1))
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_vouches_vouched
        ON vouches (guild_id, vouched_user_id, id)
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_vouches_middleman
        ON vouches (guild_id, middleman_user_id)
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_vouches_pair
        ON vouches (guild_id, voucher_user_id, vouched_user_id, created_ts)
    "#,
    r#"
    CREATE TRIGGER IF NOT EXISTS vouches_no_update
    BEFORE UPDATE ON vouches
    BEGIN
        SELECT RAISE(ABORT, 'vouches are append-only');
    END
    "#,
    r#"
    CREATE TRIGGER IF NOT EXISTS vouches_no_delete
    BEFORE DELETE ON vouches
    BEGIN
        SELECT RAISE(ABORT, 'vouches are append-only');
    END
    "#,
];

/// Create the table, indexes and triggers if they do not exist yet
pub async fn apply(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    for statement in STATEMENTS {
        sqlx::query(statement).execute(&mut *tx).await?;
    }

    let pragma = format!("PRAGMA user_version = {SCHEMA_VERSION}");
    sqlx::query(&pragma).execute(&mut *tx).await?;

    tx.commit().await?;

    info!(version = SCHEMA_VERSION, "ledger schema ready");
    Ok(())
}
