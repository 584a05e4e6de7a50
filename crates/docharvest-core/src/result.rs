//! Convenience result type alias for DocHarvest.

use crate::error::AppError;

/// A specialized `Result` type for DocHarvest operations.
pub type AppResult<T> = Result<T, AppError>;
