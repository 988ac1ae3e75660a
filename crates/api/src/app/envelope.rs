//! The envelope boundary.
//!
//! Every response, success or failure, leaves through exactly one door:
//! [`sealed`] serializes the payload, encrypts it under a fresh IV, and
//! mirrors `statusCode` into the HTTP status. Request bodies come back in
//! through [`open_body`].

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::de::DeserializeOwned;

use rolegate_core::{ApiError, ResponsePayload};
use rolegate_crypto::{Envelope, EnvelopeCodec};

/// Seal `payload` into the wire envelope.
///
/// The HTTP status mirrors `payload.statusCode`; a code outside the valid
/// range is a programming error and falls back to 500 rather than panicking
/// mid-request.
pub fn sealed(codec: &EnvelopeCodec, payload: ResponsePayload) -> axum::response::Response {
    let status = StatusCode::from_u16(payload.status_code)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let plaintext = match serde_json::to_vec(&payload) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(error = %err, "failed to serialize response payload");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    (status, Json(Envelope::seal(codec, &plaintext))).into_response()
}

/// Decrypt a request body into its DTO.
///
/// An absent body is not an error: it decodes to `T::default()`, which pushes
/// the request into the handler's own required-field validation. A body that
/// is present but is not a well-formed `{data, iv}` envelope, fails to
/// decrypt, or decrypts to JSON the DTO rejects is a 400.
pub fn open_body<T>(codec: &EnvelopeCodec, body: &[u8]) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if body.is_empty() {
        return Ok(T::default());
    }

    let envelope: Envelope = serde_json::from_slice(body)
        .map_err(|err| ApiError::invalid_envelope(format!("body is not an envelope: {err}")))?;

    let plaintext = envelope
        .open(codec)
        .map_err(|err| ApiError::invalid_envelope(err.to_string()))?;

    serde_json::from_slice(&plaintext)
        .map_err(|err| ApiError::invalid_envelope(format!("plaintext is not valid JSON: {err}")))
}
