//! Success responder and the combined `respond` helper.

use crate::error::AppError;
use apicore::{build_error, build_success, ResponseEnvelope, ServiceError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Successful response; serializes as `{ "data": ... }` with 200 OK.
///
/// # Examples
///
/// ```ignore
/// async fn get_user(Path(id): Path<u64>) -> ApiResult<User> {
///     Ok(ApiResponse(load_user(id).await?))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiResponse<T>(pub T);

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let (status, envelope) = build_success(self.0);
        (status, Json(envelope)).into_response()
    }
}

/// Result type alias for web handlers.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Write either the data or the error envelope.
///
/// `status` only applies to the error path; success is always 200.
pub fn respond<T: Serialize>(result: Result<T, ServiceError>, status: StatusCode) -> Response {
    match result {
        Ok(data) => ApiResponse(data).into_response(),
        Err(error) => {
            let (status, envelope): (_, ResponseEnvelope<T>) = build_error(error, status);
            (status, Json(envelope)).into_response()
        }
    }
}
