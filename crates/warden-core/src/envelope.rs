//! Response envelope handling.
//!
//! Every endpoint of the service answers with a JSON envelope of the form
//! `{"status": "success" | "error", "message": ..., "data": ...}`. This
//! module unwraps that envelope into typed results: success payloads come
//! out as `T`, failures come out as [`WardenError`] carrying the envelope's
//! message (or the raw body text when the body is not an envelope).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, WardenError};

/// Status discriminator carried by every response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    /// The operation succeeded; `data` holds the payload (if any).
    Success,
    /// The operation failed; `message` explains why.
    Error,
}

/// The `{status, message?, data?}` document every response body carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    /// Outcome reported by the service.
    pub status: EnvelopeStatus,
    /// Human-readable outcome description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Operation payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Unwraps a response into its `data` payload.
///
/// # Errors
///
/// Returns [`WardenError::Api`] / [`WardenError::Unauthorized`] for
/// non-success statuses, and [`WardenError::Decode`] when a success body is
/// not a well-formed envelope or has no `data` field.
pub fn decode_data<T: DeserializeOwned>(status: u16, body: &Value) -> Result<T> {
    if !is_success(status) {
        return Err(error_from_body(status, body));
    }

    let envelope: Envelope<T> = serde_json::from_value(body.clone())
        .map_err(|err| WardenError::decode(format!("malformed response envelope: {err}")))?;

    match envelope.status {
        EnvelopeStatus::Error => Err(WardenError::api(
            status,
            envelope
                .message
                .unwrap_or_else(|| "request failed".to_string()),
        )),
        EnvelopeStatus::Success => envelope
            .data
            .ok_or_else(|| WardenError::decode("response envelope has no data")),
    }
}

/// Unwraps a response whose payload does not matter, keeping only the
/// success/failure outcome.
///
/// # Errors
///
/// Same taxonomy as [`decode_data`], but a missing `data` field is fine.
pub fn decode_unit(status: u16, body: &Value) -> Result<()> {
    if !is_success(status) {
        return Err(error_from_body(status, body));
    }

    let envelope: Envelope<Value> = serde_json::from_value(body.clone())
        .map_err(|err| WardenError::decode(format!("malformed response envelope: {err}")))?;

    match envelope.status {
        EnvelopeStatus::Error => Err(WardenError::api(
            status,
            envelope
                .message
                .unwrap_or_else(|| "request failed".to_string()),
        )),
        EnvelopeStatus::Success => Ok(()),
    }
}

/// Decodes a success body as a whole document instead of unwrapping `data`.
///
/// A few endpoints put fields next to `status`/`message` rather than inside
/// `data` (the reset-link check is one); those deserialize the full body.
///
/// # Errors
///
/// Returns the usual status-mapped error for non-success responses and
/// [`WardenError::Decode`] when the body does not match `T`.
pub fn decode_document<T: DeserializeOwned>(status: u16, body: &Value) -> Result<T> {
    if !is_success(status) {
        return Err(error_from_body(status, body));
    }

    serde_json::from_value(body.clone())
        .map_err(|err| WardenError::decode(format!("malformed response body: {err}")))
}

/// Builds the error for a non-success response body.
///
/// The envelope's `message` is used when the body parses as an envelope;
/// otherwise the raw body text stands in. A 401 maps to
/// [`WardenError::Unauthorized`], everything else to [`WardenError::Api`].
#[must_use]
pub fn error_from_body(status: u16, body: &Value) -> WardenError {
    let message = match serde_json::from_value::<Envelope<Value>>(body.clone()) {
        Ok(envelope) => envelope.message.unwrap_or_else(|| format!("HTTP {status}")),
        Err(_) => match body {
            Value::Null => format!("HTTP {status}"),
            Value::String(text) => text.clone(),
            other => other.to_string(),
        },
    };

    if status == 401 {
        WardenError::unauthorized(message)
    } else {
        WardenError::api(status, message)
    }
}
