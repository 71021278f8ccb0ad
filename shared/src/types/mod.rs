//! Common type definitions shared across crates

pub mod pagination;
pub mod response;

pub use pagination::{PageMeta, Pagination, PaginatedResponse, DEFAULT_LIMIT, MAX_LIMIT};
pub use response::{ApiResponse, SUCCESS_CODE};
