//! Database connection pool management

mod sqlite;

pub use sqlite::{LedgerPool, LedgerSession};

// Re-export SqlitePool for convenience
pub use sqlx::sqlite::SqlitePool;
