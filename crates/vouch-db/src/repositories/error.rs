//! Error handling utilities for repositories

use sqlx::Error as SqlxError;
use tracing::error;

use vouch_core::error::DomainError;

/// Convert SQLx error to DomainError.
///
/// Every storage failure surfaces as `StorageUnavailable` so callers can tell
/// "write may not have happened" apart from input errors.
pub fn map_db_error(e: SqlxError) -> DomainError {
    error!(error = %e, "ledger storage error");
    DomainError::StorageUnavailable(e.to_string())
}
