//! Application error types
//!
//! Unified error handling for everything the platform collaborator calls.

use serde::Serialize;
use std::fmt;
use vouch_core::DomainError;

use crate::config::ConfigError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Input errors: the caller re-prompts
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not eligible: {0}")]
    Ineligible(String),

    // Resource errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    // Storage errors: the operation failed and must be surfaced
    #[error("Storage error: {0}")]
    Storage(String),

    // Chat platform errors
    #[error("Platform error: {0}")]
    Platform(String),

    // Internal errors
    #[error("Internal error")]
    Internal(#[source] anyhow::Error),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Get a stable error code
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Ineligible(_) => "NOT_ELIGIBLE",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Platform(_) => "PLATFORM_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    /// Errors the user can fix by changing their input (re-prompt instead of failing hard)
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        match self {
            Self::Validation(_) | Self::Ineligible(_) | Self::NotFound(_) => true,
            Self::Domain(e) => e.is_validation() || e.is_not_found(),
            Self::Storage(_) | Self::Platform(_) | Self::Internal(_) | Self::Config(_) => false,
        }
    }

    /// Errors that mean a write may not have happened and must be reported as a failure
    #[must_use]
    pub fn is_storage_failure(&self) -> bool {
        match self {
            Self::Storage(_) => true,
            Self::Domain(e) => e.is_storage(),
            _ => false,
        }
    }

    /// Create a not found error for a resource type
    #[must_use]
    pub fn not_found(resource: impl fmt::Display) -> Self {
        Self::NotFound(resource.to_string())
    }

    /// Create a validation error
    #[must_use]
    pub fn validation(msg: impl fmt::Display) -> Self {
        Self::Validation(msg.to_string())
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// Error summary handed to the platform collaborator for rendering
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub code: String,
    pub message: String,
    /// Whether the user should be asked to correct their input
    pub retry_with_new_input: bool,
}

impl From<&AppError> for ErrorReport {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
            retry_with_new_input: err.is_user_error(),
        }
    }
}

impl From<AppError> for ErrorReport {
    fn from(err: AppError) -> Self {
        Self::from(&err)
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
