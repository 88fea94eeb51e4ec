//! Custom Axum extractors.
//!
//! - [`RequestContext`]: the correlation context stored by the middleware
//! - [`JsonBody`]: JSON body whose failures use the standard envelope
//! - [`ValidatedJson`]: [`JsonBody`] followed by `validator::Validate`
//! - [`ValidatedQuery`]: query string decoding followed by `validator::Validate`
//!
//! # Examples
//!
//! ```ignore
//! use apicore_web::{ApiResponse, AppError, RequestContext, ValidatedJson};
//!
//! async fn create_user(
//!     context: RequestContext,
//!     ValidatedJson(request): ValidatedJson<CreateUser>,
//! ) -> Result<ApiResponse<User>, AppError> {
//!     tracing::info!(request_id = %context.request_id(), "Creating user");
//!     Ok(ApiResponse(users::create(request).await?))
//! }
//! ```

use crate::context::RequestContext;
use crate::error::AppError;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use validator::Validate;

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Without the middleware the context is built on the spot.
        let context = parts
            .extensions
            .get::<Self>()
            .cloned()
            .unwrap_or_else(|| Self::from_headers(&parts.headers, &parts.extensions));

        Ok(context)
    }
}

/// JSON request body.
///
/// Syntax errors, a missing `Content-Type` and unreadable bodies are
/// reported as `validation/incorrect-format`; well-formed JSON that does not
/// fit `T` as `validation/decoding`. Both use 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        Ok(Self(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(err) => AppError::decoding(err.body_text()),
        other => AppError::incorrect_format(other.body_text()),
    }
}

/// JSON request body that passed `validator` rules.
///
/// Rule failures become a `validation/property` error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let JsonBody(value) = JsonBody::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Query parameters that passed `validator` rules.
///
/// Decoding failures are reported as `validation/decoding`. Dates given as
/// `YYYY-MM-DD` decode into `chrono::NaiveDate` fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::decoding(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}
