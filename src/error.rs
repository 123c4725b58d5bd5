//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.
//!
//! Every error body carries a stable machine-readable `error` code:
//!
//! ```json
//! { "error": "bad_signature" }
//! ```
//!
//! Errors caused by an unexpected failure add a `detail` string. Secret
//! material never appears in either field.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::services::proxy_signature::Convention;

/// Rejection produced by the proxy authentication gate.
///
/// The set is closed: a proxied request is either authenticated or rejected
/// with exactly one of these reasons.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No shop domain in the query string or the forwarding headers.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("No shop domain in query or headers")]
    MissingShop,

    /// Neither a `signature` nor an `hmac` query parameter was supplied.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("No signature or hmac parameter")]
    MissingSignature,

    /// The supplied digest does not match the one computed for the request.
    ///
    /// Returns HTTP 401 Unauthorized with a code naming the convention.
    #[error("Supplied {} does not match", .0.param())]
    BadSignature(Convention),

    /// The shared secret was never configured. This is a deployment fault,
    /// not a fault of the request.
    ///
    /// Returns HTTP 500 Internal Server Error.
    #[error("Shared secret is not configured")]
    MissingSecret,

    /// Anything else that went wrong while verifying, e.g. a header that is
    /// not valid text.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Verification failed: {0}")]
    UnexpectedFailure(String),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingShop => StatusCode::BAD_REQUEST,
            AuthError::MissingSecret => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::MissingSignature
            | AuthError::BadSignature(_)
            | AuthError::UnexpectedFailure(_) => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingShop => "missing_shop",
            AuthError::MissingSignature => "missing_signature",
            AuthError::BadSignature(Convention::PathScoped) => "bad_signature",
            AuthError::BadSignature(Convention::SortedQuery) => "bad_hmac",
            AuthError::MissingSecret => "missing_secret",
            AuthError::UnexpectedFailure(_) => "verify_failed",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = match &self {
            AuthError::UnexpectedFailure(detail) => json!({
                "error": self.code(),
                "detail": detail,
            }),
            _ => json!({ "error": self.code() }),
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Errors raised by the proxy route handlers once a request is authenticated.
///
/// # Status Code Mapping
///
/// - `MissingParams`, `MissingProductId` → 400 Bad Request
/// - `NotFound` → 404 Not Found
/// - `StagedUploadFailed`, `FileCreateFailed` → 500 Internal Server Error
/// - `Upstream`, `Http` → 500 Internal Server Error with a `detail` string
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A required query or body parameter is missing or empty.
    #[error("Missing required parameters")]
    MissingParams,

    #[error("Missing productId parameter")]
    MissingProductId,

    /// No order matched the supplied number and email.
    #[error("Order not found")]
    NotFound,

    /// The admin API returned no staged upload target.
    #[error("No staged upload target returned")]
    StagedUploadFailed,

    /// The admin API created no file for the uploaded resource.
    #[error("File was not created")]
    FileCreateFailed,

    /// The admin API answered with an error status, GraphQL errors or user errors.
    #[error("{0}")]
    Upstream(String),

    /// Transport or decoding failure talking to the admin API.
    #[error("Admin API request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingParams | AppError::MissingProductId => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::StagedUploadFailed
            | AppError::FileCreateFailed
            | AppError::Upstream(_)
            | AppError::Http(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingParams => "missing_params",
            AppError::MissingProductId => "missing_productId",
            AppError::NotFound => "not_found",
            AppError::StagedUploadFailed => "staged_failed",
            AppError::FileCreateFailed => "file_create_failed",
            AppError::Upstream(_) | AppError::Http(_) => "server_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match &self {
            AppError::Upstream(_) | AppError::Http(_) => {
                tracing::error!("Admin API call failed: {}", self);
                json!({
                    "error": self.code(),
                    "detail": self.to_string(),
                })
            }
            _ => json!({ "error": self.code() }),
        };

        (self.status(), Json(body)).into_response()
    }
}
