//! Shared configuration and common types for the account service
//!
//! This crate provides functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - The uniform error response structure
//! - Pagination and success response wrappers

pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, ConfigError, CorsConfig, DatabaseConfig, Environment, EventsConfig,
    JwtConfig, LogFormat, LoggingConfig, ServerConfig, UnknownEmailPolicy,
};
pub use errors::{error_codes, ErrorBody, ErrorResponse, FieldError};
pub use types::{
    ApiResponse, PageMeta, PaginatedResponse, Pagination, DEFAULT_LIMIT, MAX_LIMIT, SUCCESS_CODE,
};
