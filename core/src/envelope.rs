//! Wire-level response envelope and status selection.
//!
//! ```text
//! Success: { "data": <any> }
//! Error:   { "errors": [ { "message", "code", "properties": [...] } ] }
//! ```
//!
//! The builders return the status alongside the envelope; the transport layer
//! writes both as given.

use crate::constants::ErrorCode;
use crate::error::{ResponseError, ServiceError};
use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Response body: either data or errors, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseEnvelope<T> {
    /// Successful response.
    Success {
        /// Payload returned to the caller.
        data: T,
    },
    /// Failed response.
    Failure {
        /// Resolved errors; currently always exactly one.
        errors: Vec<ResponseError>,
    },
}

impl<T> ResponseEnvelope<T> {
    /// Payload of a success envelope.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// Errors of a failure envelope; empty for a success envelope.
    #[must_use]
    pub fn errors(&self) -> &[ResponseError] {
        match self {
            Self::Success { .. } => &[],
            Self::Failure { errors } => errors,
        }
    }
}

/// Build the error envelope and the status to send it with.
///
/// `requested` is used as given unless the resolved code is
/// `account/not-found`, which always yields 404.
///
/// # Examples
///
/// ```
/// use apicore::{build_error, ResponseEnvelope, ResponseError, ServiceError};
/// use http::StatusCode;
///
/// let err = ServiceError::from(ResponseError::not_found("no such user"));
/// let (status, envelope): (_, ResponseEnvelope<()>) = build_error(err, StatusCode::BAD_REQUEST);
/// assert_eq!(status, StatusCode::NOT_FOUND);
/// assert_eq!(envelope.errors().len(), 1);
/// ```
#[must_use]
pub fn build_error<T>(
    err: ServiceError,
    requested: StatusCode,
) -> (StatusCode, ResponseEnvelope<T>) {
    let resolved = err.into_response_error();
    let status = if resolved.code == ErrorCode::NotFound {
        StatusCode::NOT_FOUND
    } else {
        requested
    };

    (
        status,
        ResponseEnvelope::Failure {
            errors: vec![resolved],
        },
    )
}

/// Build the success envelope; the status is always 200.
#[must_use]
pub const fn build_success<T>(data: T) -> (StatusCode, ResponseEnvelope<T>) {
    (StatusCode::OK, ResponseEnvelope::Success { data })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::RawFieldFailure;
    use serde_json::{json, Value};

    fn error_envelope(err: ServiceError, requested: StatusCode) -> (StatusCode, Value) {
        let (status, envelope) = build_error::<Value>(err, requested);
        let body = serde_json::to_value(&envelope).unwrap_or(Value::Null);
        (status, body)
    }

    #[test]
    fn test_not_found_forces_404() {
        let err = ServiceError::from(ResponseError::not_found("account 7 not found"));
        let (status, body) = error_envelope(err, StatusCode::BAD_REQUEST);

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errors"][0]["code"], "account/not-found");
    }

    #[test]
    fn test_requested_status_kept_for_other_codes() {
        let err = ServiceError::from(ResponseError::not_available("account locked"));
        let (status, _) = error_envelope(err, StatusCode::CONFLICT);
        assert_eq!(status, StatusCode::CONFLICT);

        let err = ServiceError::from(anyhow::anyhow!("db down"));
        let (status, body) = error_envelope(err, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            body,
            json!({
                "errors": [
                    { "message": "db down", "code": "service/internal", "properties": [] }
                ]
            })
        );
    }

    #[test]
    fn test_validation_errors_are_translated() {
        let err = ServiceError::Validation(vec![
            RawFieldFailure::new("UserName", "required", ""),
            RawFieldFailure::new("UserName", "min", "ab").with_param("8"),
        ]);
        let (status, body) = error_envelope(err, StatusCode::BAD_REQUEST);

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let errors = body["errors"].as_array().map_or(0, Vec::len);
        assert_eq!(errors, 1);
        assert_eq!(body["errors"][0]["code"], "validation/property");
        assert_eq!(body["errors"][0]["properties"][0]["property"], "user_name");
        assert_eq!(
            body["errors"][0]["properties"][0]["constraints"][1],
            "validation [min 8] failed with value: ab"
        );
    }

    #[test]
    fn test_success_has_only_data() {
        let (status, envelope) = build_success(json!({ "id": 1 }));
        assert_eq!(status, StatusCode::OK);
        assert!(envelope.errors().is_empty());

        let body = serde_json::to_value(&envelope).unwrap_or(Value::Null);
        assert_eq!(body, json!({ "data": { "id": 1 } }));
        assert!(body.get("errors").is_none());
    }

    #[test]
    fn test_envelope_round_trips_through_json() {
        let text = r#"{"errors":[{"message":"gone","code":"account/not-found","properties":[]}]}"#;
        let parsed: Option<ResponseEnvelope<Value>> = serde_json::from_str(text).ok();
        let errors = parsed.as_ref().map(ResponseEnvelope::errors);
        assert_eq!(errors.map(<[ResponseError]>::len), Some(1));
    }
}
