//! The response-envelope contract shared by every operation in dealdesk.
//!
//! Downstream consumers pattern-match on the exact JSON shape produced here, so
//! the rendered message formats and the choice of error key are load-bearing:
//! sales-lookup and query paths report failures under `response`, deal-storage
//! paths under `error`.

use serde_json::{json, Map, Value};
use thiserror::Error;

/// Failure taxonomy for calls against the external sales and deal-storage
/// services. Every variant is recoverable by conversion into an error
/// envelope; none may escape to the HTTP layer as an unhandled fault.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum UpstreamError {
    /// The service answered with a non-2xx status.
    #[error("HTTP {code}: {body}")]
    Status { code: u16, body: String },
    /// The request never completed: connection refused, DNS, timeout.
    #[error("Request failed: {message}")]
    Transport { message: String },
    /// Anything else, including malformed response bodies.
    #[error("Error: {message}")]
    Other { message: String },
}

/// Which JSON key carries the error message in an error envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorField {
    /// Sales-lookup and query paths.
    Response,
    /// Deal-storage paths.
    Error,
}

impl ErrorField {
    pub fn key(self) -> &'static str {
        match self {
            Self::Response => "response",
            Self::Error => "error",
        }
    }
}

/// `{"status": "error", <field>: "<rendered message>"}`
pub fn error_envelope(field: ErrorField, error: &UpstreamError) -> Value {
    let mut envelope = Map::new();
    envelope.insert("status".to_string(), Value::from("error"));
    envelope.insert(field.key().to_string(), Value::from(error.to_string()));
    Value::Object(envelope)
}

/// Deal-fetch failures additionally carry the customer id that was being
/// looked up.
pub fn deal_error_envelope(error: &UpstreamError, customer_id: i64) -> Value {
    let mut envelope = Map::new();
    envelope.insert("status".to_string(), Value::from("error"));
    envelope.insert("error".to_string(), Value::from(error.to_string()));
    envelope.insert("customer_id".to_string(), Value::from(customer_id));
    Value::Object(envelope)
}

/// The pipeline's terminal success shape. `deal` is embedded verbatim: the
/// record as the store returned it, or the rendered fetch-error object. The
/// outer status stays `success` either way once the customer id resolved.
pub fn success_envelope(customer_id: i64, company_name: &str, deal: Value) -> Value {
    json!({
        "status": "success",
        "customer_id": customer_id,
        "company_name": company_name,
        "deal": deal,
    })
}
