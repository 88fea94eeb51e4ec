//! Axum integration for the apicore response conventions.
//!
//! The `apicore` crate decides what a response looks like; this crate wires
//! those decisions into Axum handlers and Tower middleware.
//!
//! # Request Flow
//!
//! ```text
//! request ─▶ request_context_layer ─▶ api_key_layer ─▶ extractors ─▶ handler
//!              │ RequestContext          │ 401 envelope   │ 400 envelope
//!              │ span + x-request-id     │                │
//!              ▼                                          ▼
//! response ◀─ ApiResponse { "data": ... } | AppError { "errors": [...] }
//! ```
//!
//! 1. **Enrich**: the context layer stores a [`RequestContext`] in the request
//!    extensions and echoes `x-request-id` on the way out
//! 2. **Guard**: the API-key layer rejects requests without `api-key`
//! 3. **Extract**: [`JsonBody`], [`ValidatedJson`] and [`ValidatedQuery`] turn
//!    decoding and rule failures into [`AppError`]
//! 4. **Respond**: handlers return [`ApiResult`]
//!
//! # Example
//!
//! ```ignore
//! use apicore_web::{api_key_layer, request_context_layer, ApiResponse, ApiResult, ValidatedJson};
//! use axum::{routing::post, Router};
//!
//! async fn register(ValidatedJson(request): ValidatedJson<Register>) -> ApiResult<Account> {
//!     let account = accounts::register(request).await?;
//!     Ok(ApiResponse(account))
//! }
//!
//! let app = Router::new()
//!     .route(&settings.prefixed("/accounts"), post(register))
//!     .layer(api_key_layer())
//!     .layer(request_context_layer());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod context;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod response;

// Re-export key types for convenience
pub use config::{ConfigError, ServiceSettings};
pub use context::RequestContext;
pub use error::AppError;
pub use extractors::{JsonBody, ValidatedJson, ValidatedQuery};
pub use middleware::{api_key_layer, request_context_layer, REQUEST_ID_HEADER};
pub use response::{respond, ApiResponse, ApiResult};
