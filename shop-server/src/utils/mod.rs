//! Utilities
//!
//! Cross-cutting helpers: error taxonomy and logging setup.

pub mod error;
pub mod logger;

pub use error::{AppError, AppResult};
