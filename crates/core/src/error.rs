//! API error taxonomy.
//!
//! Expected request failures are values, never exceptions: each variant knows
//! the HTTP status it maps to and the payload the client receives. Every one
//! of these still leaves the server as an encrypted envelope, identical in
//! shape to a success response.

use thiserror::Error;

use crate::response::ResponsePayload;

/// Request-level failure across the security layer and the CRUD surface.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A transport credential header was absent or empty.
    #[error("Missing API credentials in headers.")]
    MissingCredentials,

    /// Credential headers were present but did not decrypt/compare cleanly.
    #[error("Invalid API credentials.")]
    InvalidCredentials,

    /// No bearer token on a route that requires a session.
    #[error("Unauthorized, token missing")]
    MissingToken,

    /// The bearer token failed signature, structure, or time-window checks.
    /// Carries the underlying reason for the `error` field of the payload.
    #[error("Invalid or expired token")]
    InvalidToken(String),

    /// The session lacks the module permission named by the `Module` header.
    #[error("Access denied: no module permission")]
    ModuleAccessDenied,

    /// The request body was present but was not a decryptable envelope.
    #[error("Invalid request envelope.")]
    InvalidEnvelope(String),

    /// Unexpected internal failure surfaced to the client without detail
    /// beyond the carried message.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn invalid_token(reason: impl Into<String>) -> Self {
        Self::InvalidToken(reason.into())
    }

    pub fn invalid_envelope(reason: impl Into<String>) -> Self {
        Self::InvalidEnvelope(reason.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// HTTP status mirrored by the payload's `statusCode`.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingCredentials | Self::InvalidCredentials => 401,
            Self::MissingToken | Self::InvalidToken(_) => 401,
            Self::ModuleAccessDenied => 403,
            Self::InvalidEnvelope(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    /// The payload the client decrypts for this failure.
    pub fn payload(&self) -> ResponsePayload {
        let payload = ResponsePayload::error(self.status_code(), self.to_string());
        match self {
            Self::InvalidToken(reason) => payload.with_error(reason.clone()),
            Self::InvalidEnvelope(reason) => payload.with_error(reason.clone()),
            // The module denial carries its message in the error field too.
            Self::ModuleAccessDenied => payload.with_error(self.to_string()),
            _ => payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_map_to_401() {
        assert_eq!(ApiError::MissingCredentials.status_code(), 401);
        assert_eq!(ApiError::InvalidCredentials.status_code(), 401);
        assert_eq!(ApiError::MissingToken.status_code(), 401);
        assert_eq!(ApiError::invalid_token("expired").status_code(), 401);
    }

    #[test]
    fn module_denial_maps_to_403_with_duplicated_detail() {
        let payload = ApiError::ModuleAccessDenied.payload();
        assert_eq!(payload.status_code, 403);
        assert_eq!(
            payload.message.as_deref(),
            Some("Access denied: no module permission")
        );
        assert_eq!(
            payload.error.as_deref(),
            Some("Access denied: no module permission")
        );
    }

    #[test]
    fn invalid_token_payload_carries_reason() {
        let payload = ApiError::invalid_token("signature mismatch").payload();
        assert_eq!(payload.status_code, 401);
        assert_eq!(payload.message.as_deref(), Some("Invalid or expired token"));
        assert_eq!(payload.error.as_deref(), Some("signature mismatch"));
    }

    #[test]
    fn envelope_failure_is_a_400() {
        let payload = ApiError::invalid_envelope("bad padding").payload();
        assert_eq!(payload.status_code, 400);
        assert_eq!(payload.error.as_deref(), Some("bad padding"));
    }
}
