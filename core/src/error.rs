//! Consumer-facing error types.
//!
//! [`ResponseError`] is the normalized shape every failure is reported in.
//! [`ServiceError`] is what business logic hands to the envelope builder: an
//! explicit variant per error kind, so classification never needs to inspect
//! an error's runtime type.

use crate::constants::{messages, ErrorCode};
use crate::validation::{self, RawFieldFailure};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// All constraint failures reported for one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyError {
    /// External property name (`user_name`).
    pub property: String,
    /// Human-readable constraint descriptions, in report order.
    pub constraints: Vec<String>,
}

impl PropertyError {
    /// Create a property error with a single constraint.
    #[must_use]
    pub fn new(property: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            constraints: vec![constraint.into()],
        }
    }
}

/// Normalized error as written to the `errors` array of the envelope.
///
/// # Examples
///
/// ```
/// use apicore::{ErrorCode, ResponseError};
///
/// let err = ResponseError::not_found("order 42 does not exist");
/// assert_eq!(err.code, ErrorCode::NotFound);
/// assert!(err.properties.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ResponseError {
    /// Human-readable summary.
    pub message: String,
    /// Stable error code.
    pub code: ErrorCode,
    /// Per-property details; empty unless this is a validation error.
    pub properties: Vec<PropertyError>,
}

impl ResponseError {
    /// Create an error with no property details.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
            properties: Vec::new(),
        }
    }

    /// `account/not-found` error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// `account/not-available` error.
    #[must_use]
    pub fn not_available(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotAvailable, message)
    }

    /// `validation/incorrect-format` error.
    #[must_use]
    pub fn incorrect_format(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::IncorrectFormat, message)
    }

    /// `validation/decoding` error.
    #[must_use]
    pub fn decoding(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Decoding, message)
    }

    /// `service/internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    /// Empty `validation/property` error, to be filled with properties.
    #[must_use]
    pub fn invalid_parameters() -> Self {
        Self::new(ErrorCode::PropertyValidation, messages::INVALID_PARAMETERS)
    }

    /// Append a property error.
    #[must_use]
    pub fn with_property(mut self, property: PropertyError) -> Self {
        self.properties.push(property);
        self
    }
}

/// Failure produced by business logic, classified by variant.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Field validation failures, still in their raw form.
    #[error("{}", messages::INVALID_PARAMETERS)]
    Validation(Vec<RawFieldFailure>),

    /// An already normalized error, used verbatim.
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// Anything else; reported as `service/internal`.
    #[error(transparent)]
    Generic(#[from] anyhow::Error),
}

impl ServiceError {
    /// Resolve into the normalized error shape.
    #[must_use]
    pub fn into_response_error(self) -> ResponseError {
        match self {
            Self::Validation(failures) => validation::translate(&failures),
            Self::Response(err) => err,
            Self::Generic(err) => ResponseError::internal(err.to_string()),
        }
    }
}

impl From<Vec<RawFieldFailure>> for ServiceError {
    fn from(failures: Vec<RawFieldFailure>) -> Self {
        Self::Validation(failures)
    }
}
