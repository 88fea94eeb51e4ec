//! Tower middleware for request correlation and access control.
//!
//! - [`request_context_layer`]: builds the [`RequestContext`], runs the request
//!   inside an `http_request` span, echoes `x-request-id` on the response and
//!   logs/records the outcome.
//! - [`api_key_layer`]: rejects requests without an `api-key` header.
//!
//! # Example
//!
//! ```ignore
//! use axum::Router;
//! use apicore_web::middleware::{api_key_layer, request_context_layer};
//!
//! let app = Router::new()
//!     .route("/api/users", get(list_users))
//!     .layer(api_key_layer())
//!     .layer(request_context_layer());
//! ```

use crate::context::RequestContext;
use crate::error::AppError;
use apicore::constants::{headers, messages};
use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};
use tower::{Layer, Service};
use tracing::Instrument;

/// Response header carrying the request id.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static(headers::REQUEST_ID);

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Create a layer that attaches a [`RequestContext`] to every request.
#[must_use]
pub fn request_context_layer() -> RequestContextLayer {
    RequestContextLayer
}

/// Layer for request context enrichment.
#[derive(Clone, Debug, Default)]
pub struct RequestContextLayer;

impl<S> Layer<S> for RequestContextLayer {
    type Service = RequestContextMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestContextMiddleware { inner }
    }
}

/// Middleware service produced by [`RequestContextLayer`].
#[derive(Clone, Debug)]
pub struct RequestContextMiddleware<S> {
    inner: S,
}

impl<S> Service<Request> for RequestContextMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let context = RequestContext::from_headers(req.headers(), req.extensions());
        let method = req.method().clone();
        let uri = req.uri().clone();

        let span = tracing::info_span!(
            "http_request",
            request_id = %context.request_id(),
            method = %method,
            uri = %uri,
            remote_address = context.remote_address().unwrap_or("-"),
        );
        let request_id = HeaderValue::from_str(context.request_id()).ok();

        req.extensions_mut().insert(context);

        let started = Instant::now();
        let fut = self.inner.call(req);

        Box::pin(
            async move {
                let mut response = fut.await?;

                if let Some(value) = request_id {
                    response.headers_mut().insert(REQUEST_ID_HEADER, value);
                }

                let status = response.status();
                let elapsed = started.elapsed();
                tracing::info!(
                    status = status.as_u16(),
                    method = %method,
                    uri = %uri,
                    elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                    "request completed"
                );
                record_request(&method, status, elapsed);

                Ok(response)
            }
            .instrument(span),
        )
    }
}

fn record_request(method: &Method, status: StatusCode, elapsed: Duration) {
    metrics::counter!(
        "http.requests",
        "method" => method.to_string(),
        "status" => status.as_u16().to_string()
    )
    .increment(1);
    metrics::histogram!("http.request.duration_seconds", "method" => method.to_string())
        .record(elapsed.as_secs_f64());
}

/// Create a layer that requires an `api-key` header.
///
/// Paths containing `docs` or `health` are let through without a key.
#[must_use]
pub fn api_key_layer() -> ApiKeyLayer {
    ApiKeyLayer::default()
}

/// Layer for the API-key guard.
#[derive(Clone, Debug)]
pub struct ApiKeyLayer {
    exempt: Arc<Vec<String>>,
}

impl ApiKeyLayer {
    /// Also let through paths containing `fragment`.
    #[must_use]
    pub fn exempt(mut self, fragment: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.exempt).push(fragment.into());
        self
    }

    fn is_exempt(&self, path: &str) -> bool {
        self.exempt
            .iter()
            .any(|fragment| path.contains(fragment.as_str()))
    }
}

impl Default for ApiKeyLayer {
    fn default() -> Self {
        Self {
            exempt: Arc::new(vec!["docs".to_string(), "health".to_string()]),
        }
    }
}

impl<S> Layer<S> for ApiKeyLayer {
    type Service = ApiKeyMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ApiKeyMiddleware {
            inner,
            layer: self.clone(),
        }
    }
}

/// Middleware service produced by [`ApiKeyLayer`].
#[derive(Clone, Debug)]
pub struct ApiKeyMiddleware<S> {
    inner: S,
    layer: ApiKeyLayer,
}

impl<S> Service<Request> for ApiKeyMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let has_key = req
            .headers()
            .get(headers::API_KEY)
            .is_some_and(|value| !value.is_empty());

        if has_key || self.layer.is_exempt(req.uri().path()) {
            return Box::pin(self.inner.call(req));
        }

        tracing::warn!(path = %req.uri().path(), "No api-key in request");
        let response = AppError::unauthorized(messages::NO_API_KEY).into_response();
        Box::pin(async move { Ok(response) })
    }
}
