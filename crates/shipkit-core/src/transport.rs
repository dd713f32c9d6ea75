use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde_json::{json, Map, Value};

/// Per-call security header carried on every carrier request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityHeader {
    pub username: String,
    pub password: String,
    pub access_key: String,
}

impl SecurityHeader {
    fn to_value(&self) -> Value {
        json!({
            "UsernameToken": {
                "Username": self.username,
                "Password": self.password,
            },
            "ServiceAccessToken": {
                "AccessLicenseNumber": self.access_key,
            },
        })
    }
}

/// One document-style call to a carrier operation.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub url: String,
    /// Carrier operation name, e.g. `ProcessRate`.
    pub operation: String,
    pub security: SecurityHeader,
    pub payload: Value,
}

/// The carrier's response document.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub payload: Value,
}

/// Transport-level failure: connection faults and carrier fault documents.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportFault {
    message: String,
    detail: Option<Value>,
}

impl TransportFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(message: impl Into<String>, detail: Value) -> Self {
        Self {
            message: message.into(),
            detail: Some(detail),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Structured fault payload supplied by the carrier, when available.
    pub fn detail(&self) -> Option<&Value> {
        self.detail.as_ref()
    }

    pub fn into_detail(self) -> Option<Value> {
        self.detail
    }
}

impl Display for TransportFault {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for TransportFault {}

/// Narrow transport contract between adapters and the remote carrier:
/// one blocking round-trip, no retries. Swappable for a test double
/// without touching adapter logic.
pub trait Transport: Send + Sync {
    fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportFault>;
}

/// Production transport posting JSON documents over HTTP.
///
/// The security header travels inside the request envelope; the single
/// `*Response` wrapper object around the response document is unwrapped
/// before the payload is handed back. Callers wanting timeouts configure
/// them on the underlying client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Arc<reqwest::blocking::Client>,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: Arc::new(
                reqwest::blocking::Client::builder()
                    .user_agent("shipkit/0.1.0")
                    .build()
                    .unwrap_or_else(|_| reqwest::blocking::Client::new()),
            ),
        }
    }

    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    fn envelope(request: &TransportRequest) -> Value {
        let mut body = Map::new();
        body.insert(String::from("UPSSecurity"), request.security.to_value());
        body.insert(
            format!("{}Request", request.operation),
            request.payload.clone(),
        );
        Value::Object(body)
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportFault> {
        let response = self
            .client
            .post(&request.url)
            .json(&Self::envelope(request))
            .send()
            .map_err(|error| {
                if error.is_timeout() {
                    TransportFault::new(format!("request timeout: {error}"))
                } else if error.is_connect() {
                    TransportFault::new(format!("connection failed: {error}"))
                } else {
                    TransportFault::new(format!("request failed: {error}"))
                }
            })?;

        let status = response.status();
        let body: Value = response.json().map_err(|error| {
            TransportFault::new(format!("failed to decode response body: {error}"))
        })?;

        if let Some(fault) = body.get("Fault") {
            return Err(TransportFault::with_detail(
                format!("carrier fault on {}", request.operation),
                fault.clone(),
            ));
        }
        if !status.is_success() {
            return Err(TransportFault::with_detail(
                format!("carrier returned status {status}"),
                body,
            ));
        }

        Ok(TransportResponse {
            payload: unwrap_response_document(body, &request.operation),
        })
    }
}

/// Peels the single `<operation>Response` wrapper when present; payloads
/// already at the document root pass through untouched.
fn unwrap_response_document(body: Value, operation: &str) -> Value {
    match body {
        Value::Object(ref fields) => {
            let key = format!("{operation}Response");
            match fields.get(&key) {
                Some(inner) => inner.clone(),
                None => body,
            }
        }
        other => other,
    }
}
