//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{Snowflake, VouchId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Vouch not found: {0}")]
    VouchNotFound(VouchId),

    #[error("Role not found: {0}")]
    RoleNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(i64),

    #[error("Traded item must not be empty")]
    EmptyTradedItem,

    #[error("Traded item too long: max {max} characters")]
    TradedItemTooLong { max: usize },

    #[error("This operation is only available inside a guild")]
    MissingGuildContext,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Missing permission: {0}")]
    MissingPermission(String),

    #[error("Cannot manage role: {0}")]
    CannotManageRole(Snowflake),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get a stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::VouchNotFound(_) => "UNKNOWN_VOUCH",
            Self::RoleNotFound(_) => "UNKNOWN_ROLE",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidRating(_) => "INVALID_RATING",
            Self::EmptyTradedItem => "EMPTY_TRADED_ITEM",
            Self::TradedItemTooLong { .. } => "TRADED_ITEM_TOO_LONG",
            Self::MissingGuildContext => "GUILD_ONLY",

            // Authorization
            Self::MissingPermission(_) => "MISSING_PERMISSIONS",
            Self::CannotManageRole(_) => "CANNOT_MANAGE_ROLE",

            // Infrastructure
            Self::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::VouchNotFound(_) | Self::RoleNotFound(_))
    }

    /// Check if this is a validation error (caller should re-prompt)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidRating(_)
                | Self::EmptyTradedItem
                | Self::TradedItemTooLong { .. }
                | Self::MissingGuildContext
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::MissingPermission(_) | Self::CannotManageRole(_))
    }

    /// Check if the storage medium failed the operation
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }
}
