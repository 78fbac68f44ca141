//! Convenience result type alias for orgdal.

use crate::error::AppError;

/// A specialized `Result` type for orgdal operations.
///
/// Every data-access operation resolves to one of these: the success value,
/// or an [`AppError`] carrying a status code.
pub type AppResult<T> = Result<T, AppError>;
