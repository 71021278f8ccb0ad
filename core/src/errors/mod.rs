//! Application and persistence error types.

mod app_error;
mod repository;


pub use app_error::{AppError, AppResult, ErrorKind};
pub use repository::{ConstraintKind, RepositoryError, RepositoryResult};
