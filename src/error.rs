//!
//! # Custom Error Handling
//!
//! This module defines `AppError`, the explicit outcome of every failing operation
//! in the bookstore API. Handlers return `Result<_, AppError>` and never build error
//! responses by hand: the `ResponseError` implementation maps each variant onto its
//! status code.
//!
//! Internal failures (store errors, hashing or signing failures, a repository reporting
//! that a write did not succeed) are logged here with their full detail and surfaced to
//! the caller as a generic 500 body. Their detail never reaches the response.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Body returned for every 500 response.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Authentication is missing or failed (HTTP 401).
    Unauthorized(String),
    /// The caller is authenticated but lacks a required role (HTTP 403).
    Forbidden(String),
    /// Malformed request: bad id, id mismatch, undecodable body (HTTP 400).
    BadRequest(String),
    /// The referenced entity does not exist (HTTP 404).
    NotFound(String),
    /// An unexpected server-side failure (HTTP 500).
    InternalServerError(String),
    /// A failure reported by the store (HTTP 500).
    /// Wraps errors from the `sqlx` crate and store-side constraint violations.
    DatabaseError(String),
    /// Declared field validation failed (HTTP 400).
    /// Wraps errors from the `validator` crate.
    ValidationError(String),
}

impl AppError {
    /// True for the variants that are answered with a generic 500.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AppError::InternalServerError(_) | AppError::DatabaseError(_)
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// Client-facing variants carry their message in `{"error": ...}`. Internal variants
/// are logged and replaced by [`INTERNAL_ERROR_MESSAGE`].
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::ValidationError(msg) => {
                HttpResponse::build(self.status_code()).json(json!({ "error": msg }))
            }
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                log::error!("{}", self);
                HttpResponse::InternalServerError().json(json!({
                    "error": INTERNAL_ERROR_MESSAGE
                }))
            }
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `sqlx::Error::RowNotFound` becomes `AppError::NotFound` and a unique violation
/// becomes `AppError::BadRequest`. Every other database error becomes
/// `AppError::DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                log::warn!("Unique violation: {}", db);
                AppError::BadRequest("Record already exists".into())
            }
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> AppError {
        AppError::DatabaseError(format!("Migration failed: {}", error))
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::Unauthorized`.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(format!("Invalid token: {}", error))
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}
