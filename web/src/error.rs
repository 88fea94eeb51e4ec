//! Error responder for axum handlers.
//!
//! [`AppError`] pairs a [`ServiceError`] with the status the handler asks for
//! and renders it through [`build_error`], so every failure leaves the service
//! in the standard `{ "errors": [...] }` envelope.

use apicore::{build_error, RawFieldFailure, ResponseEnvelope, ResponseError, ServiceError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;

/// Application error type for web handlers.
///
/// # Examples
///
/// ```ignore
/// async fn handler(Path(id): Path<u64>) -> Result<ApiResponse<User>, AppError> {
///     let user = find_user(id).await?.ok_or_else(|| AppError::not_found("User", id))?;
///     Ok(ApiResponse(user))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// Status requested by the caller; may be overridden by the error code.
    status: StatusCode,
    /// Classified failure.
    error: ServiceError,
}

impl AppError {
    /// Create an error with an explicit status.
    #[must_use]
    pub fn new(status: StatusCode, error: impl Into<ServiceError>) -> Self {
        Self {
            status,
            error: error.into(),
        }
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(error: impl Into<ServiceError>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    /// Create a 401 Unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, ResponseError::internal(message))
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(resource: impl fmt::Display, id: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            ResponseError::not_found(format!("{resource} with id {id} not found")),
        )
    }

    /// Create a 409 Conflict error for a resource that cannot be used right now.
    #[must_use]
    pub fn not_available(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, ResponseError::not_available(message))
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ResponseError::internal(message),
        )
    }

    /// Create a 400 error from raw field failures.
    #[must_use]
    pub fn validation(failures: Vec<RawFieldFailure>) -> Self {
        Self::bad_request(ServiceError::Validation(failures))
    }

    /// Create a 400 error for a structurally malformed payload.
    #[must_use]
    pub fn incorrect_format(message: impl Into<String>) -> Self {
        Self::bad_request(ResponseError::incorrect_format(message))
    }

    /// Create a 400 error for a payload that does not fit the expected shape.
    #[must_use]
    pub fn decoding(message: impl Into<String>) -> Self {
        Self::bad_request(ResponseError::decoding(message))
    }

    /// Status requested for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// The classified failure.
    #[must_use]
    pub const fn error(&self) -> &ServiceError {
        &self.error
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status.as_u16(), self.error)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                status = %self.status,
                error = %self.error,
                "Internal server error"
            );
        } else {
            tracing::debug!(status = %self.status, error = %self.error, "Request failed");
        }

        let (status, envelope): (_, ResponseEnvelope<()>) = build_error(self.error, self.status);
        (status, Json(envelope)).into_response()
    }
}

/// Status follows the variant: 400 for validation, the code's default status
/// for normalized errors, 500 for anything else.
impl From<ServiceError> for AppError {
    fn from(error: ServiceError) -> Self {
        let status = match &error {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Response(err) => err.code.default_status(),
            ServiceError::Generic(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self { status, error }
    }
}

impl From<ResponseError> for AppError {
    fn from(err: ResponseError) -> Self {
        ServiceError::from(err).into()
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        ServiceError::from(err).into()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ServiceError::from(errors).into()
    }
}
