// SPDX-License-Identifier: MIT
// Copyright 2026 Forkful Contributors

//! Application error types shared by every layer of the data engine.

/// Error type surfaced by queries and mutations.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    NotAuthenticated,

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Partial write to {entity}: {cause}")]
    PartialWrite { entity: String, cause: String },

    #[error("Local storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code for UI-level error messaging.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotAuthenticated => "not_authenticated",
            AppError::NotAuthorized(_) => "not_authorized",
            AppError::NotFound(_) => "not_found",
            AppError::Validation(_) => "validation_failed",
            AppError::BackendUnavailable(_) => "backend_unavailable",
            AppError::PartialWrite { .. } => "partial_write",
            AppError::Storage(_) => "storage_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// Whether the error means the remote backend could not be reached.
    ///
    /// The follow graph uses this to decide when to degrade to the local
    /// on-device mirror; every other collection surfaces it to the caller.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, AppError::BackendUnavailable(_))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Result type alias for the data engine.
pub type Result<T> = std::result::Result<T, AppError>;
