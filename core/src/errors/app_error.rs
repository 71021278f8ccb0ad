//! Application error taxonomy
//!
//! Every failure that leaves a workflow is an [`AppError`] tagged with one of
//! ten closed [`ErrorKind`]s. The kind alone decides the HTTP status.

use acct_shared::error_codes;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::context::DeadlineExceeded;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Closed set of failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Unauthorized,
    Forbidden,
    BadRequest,
    Conflict,
    Internal,
    Database,
    External,
    Timeout,
}

impl ErrorKind {
    /// HTTP status for this kind
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::Validation | ErrorKind::BadRequest => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Internal
            | ErrorKind::Database
            | ErrorKind::External
            | ErrorKind::Timeout => 500,
        }
    }

    /// Wire code used in the `error.type` field of responses
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Validation => error_codes::VALIDATION_ERROR,
            ErrorKind::NotFound => error_codes::NOT_FOUND,
            ErrorKind::Unauthorized => error_codes::UNAUTHORIZED,
            ErrorKind::Forbidden => error_codes::FORBIDDEN,
            ErrorKind::BadRequest => error_codes::BAD_REQUEST,
            ErrorKind::Conflict => error_codes::CONFLICT,
            ErrorKind::Internal => error_codes::INTERNAL_ERROR,
            ErrorKind::Database => error_codes::DATABASE_ERROR,
            ErrorKind::External => error_codes::EXTERNAL_SERVICE_ERROR,
            ErrorKind::Timeout => error_codes::TIMEOUT_ERROR,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A classified application failure.
///
/// Built at the point of failure and handed unchanged to the HTTP boundary.
/// The wrapped `source` is for server-side logs only and never rendered.
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct AppError {
    kind: ErrorKind,
    message: String,
    details: Option<serde_json::Value>,
    #[source]
    source: Option<BoxError>,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Input failed validation; `details` usually lists the offending fields
    pub fn validation(message: impl Into<String>, details: Option<serde_json::Value>) -> Self {
        Self::new(ErrorKind::Validation, message).with_details(details)
    }

    /// `"{resource} not found"`
    pub fn not_found(resource: impl fmt::Display) -> Self {
        Self::new(ErrorKind::NotFound, format!("{} not found", resource))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// `"Database operation failed: {operation}"` wrapping the persistence error
    pub fn database<E>(operation: &str, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::new(
            ErrorKind::Database,
            format!("Database operation failed: {}", operation),
        )
        .with_source(cause)
    }

    pub fn external(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::External, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Attach the underlying cause
    pub fn with_source<E>(mut self, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(cause));
        self
    }

    /// Attach structured details
    pub fn with_details(mut self, details: Option<serde_json::Value>) -> Self {
        self.details = details;
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&serde_json::Value> {
        self.details.as_ref()
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    /// The wrapped cause, if any
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.source.as_deref()
    }
}

impl From<DeadlineExceeded> for AppError {
    fn from(err: DeadlineExceeded) -> Self {
        AppError::timeout("Request deadline exceeded").with_source(err)
    }
}

pub type AppResult<T> = Result<T, AppError>;
