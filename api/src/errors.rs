//! Error Normalizer
//!
//! Every failure leaving the API is turned into an [`ApiError`] and rendered
//! as the uniform body
//!
//! ```json
//! {
//!   "error": { "type": "CONFLICT", "message": "...", "details": ... },
//!   "request_id": "...",
//!   "timestamp": "2024-01-01T00:00:00Z"
//! }
//! ```
//!
//! Classification precedence:
//! 1. [`AppError`] (and an already built [`ApiError`]) as is
//! 2. framework errors: actix extractor errors by status family,
//!    [`ValidationErrors`] as `VALIDATION_ERROR` with per-field details
//! 3. [`RepositoryError`], then well-known constraint texts
//! 4. anything else as `INTERNAL_ERROR`
//!
//! The underlying cause is kept for server-side logging and never rendered.

use std::fmt;

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError, UrlencodedError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use validator::{ValidationError, ValidationErrors};

use acct_core::errors::{AppError, ConstraintKind, ErrorKind, RepositoryError};
use acct_shared::{ErrorResponse, FieldError};

/// Unique-constraint messages of the common SQL drivers
static CONFLICT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)duplicate key value violates unique constraint|unique constraint failed|duplicate entry",
    )
    .expect("conflict pattern is a valid regex")
});

/// Foreign-key messages of the common SQL drivers
static FOREIGN_KEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)violates foreign key constraint|foreign key constraint failed|foreign key constraint fails",
    )
    .expect("foreign key pattern is a valid regex")
});

/// Fields whose submitted value is never echoed back in details
const REDACTED_FIELDS: [&str; 2] = ["password", "token"];

pub type ApiResult<T> = Result<T, ApiError>;

/// A classified failure ready to be rendered
#[derive(Debug, Clone)]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    details: Option<Value>,
    request_id: Option<String>,
    /// Server-side description of the cause, for logs only
    cause: Option<String>,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            request_id: None,
            cause: None,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn with_details(mut self, details: Option<Value>) -> Self {
        self.details = details;
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_cause(mut self, cause: impl fmt::Display) -> Self {
        self.cause = Some(cause.to_string());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    pub fn cause(&self) -> Option<&str> {
        self.cause.as_deref()
    }

    /// The uniform response body
    pub fn to_body(&self) -> ErrorResponse {
        ErrorResponse::new(self.kind.code(), self.message.clone())
            .with_details(self.details.clone())
            .with_request_id(self.request_id.clone())
    }

    /// Default error for an HTTP status family
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            401 => Self::new(ErrorKind::Unauthorized, "Unauthorized"),
            403 => Self::new(ErrorKind::Forbidden, "Forbidden"),
            404 => Self::new(ErrorKind::NotFound, "Resource not found"),
            409 => Self::new(ErrorKind::Conflict, "Conflict"),
            400..=499 => Self::new(ErrorKind::BadRequest, "Bad request"),
            _ => Self::new(ErrorKind::Internal, "Internal server error"),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.to_body())
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        from_app_error(&err)
    }
}

impl From<&AppError> for ApiError {
    fn from(err: &AppError) -> Self {
        from_app_error(err)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        from_validation_errors(&errors)
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        from_repository_error(&err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        normalize(&err)
    }
}

/// Classify an arbitrary error chain
pub fn normalize(err: &anyhow::Error) -> ApiError {
    for cause in err.chain() {
        if let Some(api_err) = cause.downcast_ref::<ApiError>() {
            return api_err.clone();
        }
        if let Some(app_err) = cause.downcast_ref::<AppError>() {
            return from_app_error(app_err);
        }
    }

    for cause in err.chain() {
        if let Some(errors) = cause.downcast_ref::<ValidationErrors>() {
            return from_validation_errors(errors);
        }
        if let Some(framework) = framework_status(cause) {
            return ApiError::from_status(framework).with_cause(cause);
        }
    }

    for cause in err.chain() {
        if let Some(repo_err) = cause.downcast_ref::<RepositoryError>() {
            return from_repository_error(repo_err);
        }
    }

    for cause in err.chain() {
        if let Some(api_err) = from_message(&cause.to_string()) {
            return api_err;
        }
    }

    ApiError::new(ErrorKind::Internal, "An unexpected error occurred").with_cause(format!("{:#}", err))
}

/// Classify an error produced by actix itself or by a handler
pub fn normalize_actix(err: &actix_web::Error) -> ApiError {
    if let Some(api_err) = err.as_error::<ApiError>() {
        return api_err.clone();
    }
    ApiError::from_status(err.as_response_error().status_code()).with_cause(err)
}

pub fn from_app_error(err: &AppError) -> ApiError {
    let api_err = ApiError::new(err.kind(), err.message()).with_details(err.details().cloned());
    match err.cause() {
        Some(cause) => api_err.with_cause(cause),
        None => api_err,
    }
}

/// `VALIDATION_ERROR` listing each failed field
pub fn from_validation_errors(errors: &ValidationErrors) -> ApiError {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            let field = field.to_string();
            field_errors
                .iter()
                .map(move |error| field_error(&field, error))
                .collect::<Vec<_>>()
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));

    ApiError::new(ErrorKind::Validation, "Validation failed")
        .with_details(serde_json::to_value(fields).ok())
}

fn field_error(field: &str, error: &ValidationError) -> FieldError {
    let message = match &error.message {
        Some(message) => format!("{} {}", field, message),
        None => format!("{} {}", field, default_rule_message(&error.code)),
    };
    let entry = FieldError::new(field, message);
    match error.params.get("value") {
        Some(value) if !REDACTED_FIELDS.contains(&field) => entry.with_value(value.clone()),
        _ => entry,
    }
}

fn default_rule_message(code: &str) -> &'static str {
    match code {
        "length" => "has an invalid length",
        "email" => "must be a valid email address",
        "required" => "is required",
        "range" => "is out of range",
        _ => "is invalid",
    }
}

/// Client-safe message for each persistence outcome
pub fn from_repository_error(err: &RepositoryError) -> ApiError {
    let api_err = match err {
        RepositoryError::NotFound => ApiError::new(ErrorKind::NotFound, "record not found"),
        RepositoryError::Conflict { .. } => {
            ApiError::new(ErrorKind::Conflict, "resource already exists")
        }
        RepositoryError::ConstraintViolation {
            violation: ConstraintKind::ForeignKey,
            ..
        } => ApiError::new(
            ErrorKind::BadRequest,
            "invalid reference to related resource",
        ),
        RepositoryError::ConstraintViolation { .. } => {
            ApiError::new(ErrorKind::BadRequest, "invalid data")
        }
        RepositoryError::Unavailable { .. } => ApiError::new(
            ErrorKind::Database,
            "Database operation failed: unknown database error",
        ),
    };
    api_err.with_cause(err)
}

/// Last-resort classification of driver text
fn from_message(message: &str) -> Option<ApiError> {
    if CONFLICT_PATTERN.is_match(message) {
        return Some(
            ApiError::new(ErrorKind::Conflict, "resource already exists").with_cause(message),
        );
    }
    if FOREIGN_KEY_PATTERN.is_match(message) {
        return Some(
            ApiError::new(
                ErrorKind::BadRequest,
                "invalid reference to related resource",
            )
            .with_cause(message),
        );
    }
    None
}

fn framework_status(cause: &(dyn std::error::Error + 'static)) -> Option<StatusCode> {
    if let Some(e) = cause.downcast_ref::<JsonPayloadError>() {
        return Some(e.status_code());
    }
    if let Some(e) = cause.downcast_ref::<QueryPayloadError>() {
        return Some(e.status_code());
    }
    if let Some(e) = cause.downcast_ref::<PathError>() {
        return Some(e.status_code());
    }
    if let Some(e) = cause.downcast_ref::<UrlencodedError>() {
        return Some(e.status_code());
    }
    None
}
