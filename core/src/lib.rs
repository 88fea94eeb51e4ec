//! # apicore
//!
//! Shared response and error plumbing for JSON HTTP services.
//!
//! This crate is the pure half of the helper layer: no I/O, no framework
//! types beyond `http::StatusCode`. Every function here is deterministic and
//! safe to call from any number of concurrent requests.
//!
//! ## Pipeline
//!
//! ```text
//! RawFieldFailure*  ──translate──▶  ResponseError  ──build_error──▶  (StatusCode, ResponseEnvelope)
//!        │                              ▲
//!        └── field ──normalize──────────┘   ("UserName" → "user_name")
//! ```
//!
//! ## Example
//!
//! ```
//! use apicore::{build_error, RawFieldFailure, ResponseEnvelope, ServiceError};
//! use http::StatusCode;
//!
//! let failures = vec![
//!     RawFieldFailure::new("UserName", "required", ""),
//!     RawFieldFailure::new("UserName", "min", "bob").with_param("8"),
//! ];
//!
//! let (status, envelope): (_, ResponseEnvelope<()>) =
//!     build_error(ServiceError::Validation(failures), StatusCode::BAD_REQUEST);
//!
//! assert_eq!(status, StatusCode::BAD_REQUEST);
//! assert_eq!(envelope.errors()[0].properties[0].property, "user_name");
//! ```

pub mod constants;
pub mod envelope;
pub mod error;
pub mod identifier;
pub mod validation;

pub use constants::ErrorCode;
pub use envelope::{build_error, build_success, ResponseEnvelope};
pub use error::{PropertyError, ResponseError, ServiceError};
pub use validation::{translate, RawFieldFailure};
