//! Shared conversion from reqwest outcomes into the upstream failure taxonomy.

use dealdesk_core::UpstreamError;
use serde_json::Value;

/// Transport-level failures (connect, DNS, timeout) keep their own category so
/// callers can distinguish "service unreachable" from "service said no".
pub(crate) fn transport_error(error: reqwest::Error) -> UpstreamError {
    if error.is_timeout() || error.is_connect() || error.is_request() {
        UpstreamError::Transport { message: error.to_string() }
    } else {
        UpstreamError::Other { message: error.to_string() }
    }
}

/// Decode a 2xx response as JSON; anything else becomes a `Status` failure
/// carrying the raw body text.
pub(crate) async fn json_or_status(response: reqwest::Response) -> Result<Value, UpstreamError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(UpstreamError::Status { code: status.as_u16(), body });
    }

    response
        .json::<Value>()
        .await
        .map_err(|error| UpstreamError::Other { message: error.to_string() })
}
