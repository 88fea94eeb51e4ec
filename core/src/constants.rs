//! Fixed error codes, messages and header names.
//!
//! These are compile-time enumerations shared by every service that builds on
//! this crate. Nothing here is runtime state.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable error code carried by every [`ResponseError`](crate::ResponseError).
///
/// Serializes as its string code (e.g. `"validation/property"`), which is the
/// part of the wire contract clients switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// A validation rule for one or more properties failed.
    #[serde(rename = "validation/property")]
    PropertyValidation,
    /// The payload is structurally malformed (e.g. not JSON at all).
    #[serde(rename = "validation/incorrect-format")]
    IncorrectFormat,
    /// Decoding the payload into the expected shape failed.
    #[serde(rename = "validation/decoding")]
    Decoding,
    /// The referenced resource does not exist.
    #[serde(rename = "account/not-found")]
    NotFound,
    /// The resource exists but cannot be used in its current state.
    #[serde(rename = "account/not-available")]
    NotAvailable,
    /// Fallback for anything unclassified.
    #[serde(rename = "service/internal")]
    Internal,
}

impl ErrorCode {
    /// The string code as it appears on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PropertyValidation => "validation/property",
            Self::IncorrectFormat => "validation/incorrect-format",
            Self::Decoding => "validation/decoding",
            Self::NotFound => "account/not-found",
            Self::NotAvailable => "account/not-available",
            Self::Internal => "service/internal",
        }
    }

    /// Status used when a caller has no more specific status to offer.
    #[must_use]
    pub const fn default_status(self) -> StatusCode {
        match self {
            Self::PropertyValidation | Self::IncorrectFormat | Self::Decoding => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::NotAvailable => StatusCode::CONFLICT,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed human-readable messages.
pub mod messages {
    /// Summary message of every property validation error.
    pub const INVALID_PARAMETERS: &str = "Invalid parameters in request";

    /// Message returned when the API-key guard rejects a request.
    pub const NO_API_KEY: &str = "No api-key found";
}

/// Header names used to build and echo the request correlation context.
pub mod headers {
    /// Caller-supplied request id; echoed back on the response.
    pub const REQUEST_ID: &str = "x-request-id";

    /// API key identifying the caller.
    pub const API_KEY: &str = "api-key";

    /// Client address set by the fronting proxy.
    pub const REAL_IP: &str = "x-real-ip";

    /// Session identifier.
    pub const SESSION: &str = "session";
}

/// Separator placed between identifier segments by
/// [`normalize`](crate::identifier::normalize).
pub const PROPERTY_SEPARATOR: &str = "_";
