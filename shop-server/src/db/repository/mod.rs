//! Repository Module
//!
//! Query/persistence access to the relational schema. Repositories own a
//! pool handle and expose bespoke queries; multi-statement operations
//! (cart transfer, scheduler pages) run inside a single transaction via
//! the `*_tx` methods that take an open connection.

pub mod cart;
pub mod order;
pub mod product;

pub use cart::CartRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Version-checked write lost an optimistic-concurrency race
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
