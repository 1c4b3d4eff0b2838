//! # vouch-db
//!
//! Database layer implementing the ledger's repository trait with SQLite via SQLx.
//!
//! ## Overview
//!
//! This crate provides the SQLite implementation of `VouchRepository`
//! defined in `vouch-core`. It handles:
//!
//! - Connection setup (WAL, full sync, busy timeout) and the ordering guard
//! - Append-only schema initialization
//! - Database models with SQLx `FromRow` derives
//! - Model -> entity mappers
//! - The repository implementation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vouch_common::AppConfig;
//! use vouch_core::VouchRepository;
//! use vouch_db::{LedgerPool, SqliteVouchRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_env()?;
//!     let pool = LedgerPool::connect(&config.database).await?;
//!     let repo = SqliteVouchRepository::new(pool);
//!     repo.initialize().await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod schema;

// Re-export commonly used types
pub use pool::{LedgerPool, SqlitePool};
pub use repositories::SqliteVouchRepository;
