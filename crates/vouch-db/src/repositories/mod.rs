//! Repository implementations
//!
//! SQLite implementation of the repository trait defined in vouch-core.

mod error;
mod vouch;

pub use error::map_db_error;
pub use vouch::SqliteVouchRepository;
