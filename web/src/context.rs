//! Per-request correlation context.
//!
//! Built once per request by [`request_context_layer`](crate::middleware::request_context_layer)
//! and stored in the request extensions. Values are opaque pass-through data:
//! nothing here validates or parses them.

use apicore::constants::headers as header_names;
use axum::extract::ConnectInfo;
use axum::http::{Extensions, HeaderMap};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::net::SocketAddr;
use uuid::Uuid;

/// Correlation metadata for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestContext {
    request_id: String,
    api_key: Option<String>,
    remote_address: Option<String>,
    session_id: Option<String>,
    started_at: DateTime<Utc>,
}

impl RequestContext {
    /// Build the context from request headers and extensions.
    ///
    /// - `request_id`: `x-request-id`, or a fresh UUID v4 when absent or empty
    /// - `api_key`: `api-key`
    /// - `remote_address`: `x-real-ip`, falling back to the peer address from
    ///   [`ConnectInfo`] when the server was started with connect info
    /// - `session_id`: `session`
    #[must_use]
    pub fn from_headers(headers: &HeaderMap, extensions: &Extensions) -> Self {
        let request_id = header_value(headers, header_names::REQUEST_ID)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let remote_address = header_value(headers, header_names::REAL_IP).or_else(|| {
            extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.to_string())
        });

        Self {
            request_id,
            api_key: header_value(headers, header_names::API_KEY),
            remote_address,
            session_id: header_value(headers, header_names::SESSION),
            started_at: Utc::now(),
        }
    }

    /// Request id, caller-supplied or generated.
    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// API key sent by the caller.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Client address.
    #[must_use]
    pub fn remote_address(&self) -> Option<&str> {
        self.remote_address.as_deref()
    }

    /// Session id sent by the caller.
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// When the request entered the service.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .filter(|value| !value.is_empty())
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
}
