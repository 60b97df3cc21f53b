//! Unified Error Handling
//!
//! Application-level error taxonomy for the cart and order services.
//! Every domain-rule violation is raised as a typed variant at the point
//! of detection; callers (the out-of-scope controller layer) map each
//! variant to a transport response.

use crate::db::repository::RepoError;
use shared::models::order::UnknownStatus;

/// Application-level error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Business Logic Errors ==========
    /// Malformed or missing input
    #[error("Invalid argument: {0}")]
    Invalid(String),

    /// Entity lookup miss
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Operation not valid for the entity's current lifecycle state
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Acting principal is neither the owner nor an elevated role
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Optimistic-concurrency collision; the losing write may be retried
    #[error("Concurrent modification: {0}")]
    Conflict(String),

    // ========== Side-effect Errors ==========
    /// Notification failed after the state change already committed.
    /// The status transition is NOT rolled back when this is returned.
    #[error("Mail delivery failed: {0}")]
    MailDelivery(String),

    // ========== System Errors ==========
    #[error("Database error: {0}")]
    Database(String),
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Conflict(msg) => AppError::Conflict(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<UnknownStatus> for AppError {
    fn from(e: UnknownStatus) -> Self {
        AppError::Invalid(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Invalid(format!("Validation failed: {e}"))
    }
}

/// Result type for service operations
pub type AppResult<T> = Result<T, AppError>;
