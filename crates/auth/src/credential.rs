//! Transport credential gate.
//!
//! Every request, the login route included, must carry `X-API-USER` and
//! `X-API-PASS` headers encrypted under the shared secret with the IV from
//! `X-IV`. The header values are base64 ciphertext, so each header plus the
//! shared IV is exactly an [`Envelope`] and is opened as one.

use std::sync::Arc;

use subtle::{Choice, ConstantTimeEq};
use thiserror::Error;

use rolegate_core::ApiError;
use rolegate_crypto::{Envelope, EnvelopeCodec};

/// The expected plaintext credential pair, from configuration.
#[derive(Clone)]
pub struct ApiCredentials {
    pub user: String,
    pub pass: String,
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("user", &self.user)
            .field("pass", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    /// `X-API-USER` or `X-API-PASS` absent or empty.
    #[error("credential header absent or empty")]
    Missing,

    /// Headers present but failed decryption or comparison.
    #[error("credential headers failed decryption or comparison")]
    Invalid,
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Missing => ApiError::MissingCredentials,
            CredentialError::Invalid => ApiError::InvalidCredentials,
        }
    }
}

/// Decrypts and checks the credential headers of a single request.
#[derive(Clone)]
pub struct CredentialGate {
    codec: Arc<EnvelopeCodec>,
    expected: ApiCredentials,
}

impl CredentialGate {
    pub fn new(codec: Arc<EnvelopeCodec>, expected: ApiCredentials) -> Self {
        Self { codec, expected }
    }

    /// Check one request's credential headers.
    ///
    /// Presence is checked before any cryptography: an absent or empty user
    /// or pass header is [`CredentialError::Missing`]. Everything after that
    /// point, including an unusable IV, is [`CredentialError::Invalid`] so
    /// the response never distinguishes which side failed.
    pub fn authenticate(
        &self,
        user: Option<&str>,
        pass: Option<&str>,
        iv: Option<&str>,
    ) -> Result<(), CredentialError> {
        let user = non_empty(user).ok_or(CredentialError::Missing)?;
        let pass = non_empty(pass).ok_or(CredentialError::Missing)?;
        let iv = non_empty(iv).ok_or(CredentialError::Invalid)?;

        // Both fields are always compared; the verdicts are combined with a
        // single constant-time conjunction.
        let user_ok = self.matches(user, iv, &self.expected.user);
        let pass_ok = self.matches(pass, iv, &self.expected.pass);
        if bool::from(user_ok & pass_ok) {
            Ok(())
        } else {
            Err(CredentialError::Invalid)
        }
    }

    fn matches(&self, header: &str, iv: &str, expected: &str) -> Choice {
        let envelope = Envelope {
            data: header.to_owned(),
            iv: iv.to_owned(),
        };
        match envelope.open(&self.codec) {
            Ok(plaintext) => plaintext.ct_eq(expected.as_bytes()),
            Err(_) => Choice::from(0),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolegate_crypto::{Iv, KEY_LEN, SharedSecret};

    fn gate() -> CredentialGate {
        let codec = Arc::new(EnvelopeCodec::new(SharedSecret::from_bytes([7; KEY_LEN])));
        CredentialGate::new(
            codec,
            ApiCredentials {
                user: "gateway-user".into(),
                pass: "gateway-pass".into(),
            },
        )
    }

    /// Encrypt `plaintext` under a fixed IV, returning (header value, iv
    /// header value) exactly as a client would send them.
    fn sealed(gate: &CredentialGate, plaintext: &str, iv: &Iv) -> (String, String) {
        let envelope = Envelope::seal_with_iv(&gate.codec, plaintext.as_bytes(), iv);
        (envelope.data, envelope.iv)
    }

    #[test]
    fn well_formed_credentials_pass() {
        let gate = gate();
        let iv = Iv::from_bytes([3; 16]);
        let (user, iv_header) = sealed(&gate, "gateway-user", &iv);
        let (pass, _) = sealed(&gate, "gateway-pass", &iv);

        assert_eq!(
            gate.authenticate(Some(&user), Some(&pass), Some(&iv_header)),
            Ok(())
        );
    }

    #[test]
    fn absent_or_empty_headers_are_missing() {
        let gate = gate();
        let iv = Iv::from_bytes([3; 16]);
        let (user, iv_header) = sealed(&gate, "gateway-user", &iv);
        let (pass, _) = sealed(&gate, "gateway-pass", &iv);

        assert_eq!(
            gate.authenticate(None, Some(&pass), Some(&iv_header)),
            Err(CredentialError::Missing)
        );
        assert_eq!(
            gate.authenticate(Some(&user), Some(""), Some(&iv_header)),
            Err(CredentialError::Missing)
        );
        // Presence wins over the IV check: no IV but no user either is
        // still a missing-credential failure.
        assert_eq!(
            gate.authenticate(None, Some(&pass), None),
            Err(CredentialError::Missing)
        );
    }

    #[test]
    fn missing_iv_is_invalid_not_missing() {
        let gate = gate();
        let iv = Iv::from_bytes([3; 16]);
        let (user, _) = sealed(&gate, "gateway-user", &iv);
        let (pass, _) = sealed(&gate, "gateway-pass", &iv);

        assert_eq!(
            gate.authenticate(Some(&user), Some(&pass), None),
            Err(CredentialError::Invalid)
        );
        assert_eq!(
            gate.authenticate(Some(&user), Some(&pass), Some("")),
            Err(CredentialError::Invalid)
        );
    }

    #[test]
    fn wrong_user_is_rejected() {
        let gate = gate();
        let iv = Iv::from_bytes([3; 16]);
        let (user, iv_header) = sealed(&gate, "intruder", &iv);
        let (pass, _) = sealed(&gate, "gateway-pass", &iv);

        assert_eq!(
            gate.authenticate(Some(&user), Some(&pass), Some(&iv_header)),
            Err(CredentialError::Invalid)
        );
    }

    #[test]
    fn wrong_pass_is_rejected() {
        let gate = gate();
        let iv = Iv::from_bytes([3; 16]);
        let (user, iv_header) = sealed(&gate, "gateway-user", &iv);
        let (pass, _) = sealed(&gate, "guessed-pass", &iv);

        assert_eq!(
            gate.authenticate(Some(&user), Some(&pass), Some(&iv_header)),
            Err(CredentialError::Invalid)
        );
    }

    #[test]
    fn credentials_under_a_different_iv_are_rejected() {
        let gate = gate();
        let sealed_iv = Iv::from_bytes([3; 16]);
        let (user, _) = sealed(&gate, "gateway-user", &sealed_iv);
        let (pass, _) = sealed(&gate, "gateway-pass", &sealed_iv);
        let (_, other_iv_header) = sealed(&gate, "x", &Iv::from_bytes([4; 16]));

        assert_eq!(
            gate.authenticate(Some(&user), Some(&pass), Some(&other_iv_header)),
            Err(CredentialError::Invalid)
        );
    }

    #[test]
    fn tampered_ciphertext_is_rejected() {
        let gate = gate();
        let iv = Iv::from_bytes([3; 16]);
        let (user, iv_header) = sealed(&gate, "gateway-user", &iv);
        let (pass, _) = sealed(&gate, "gateway-pass", &iv);

        let mut bytes = user.into_bytes();
        bytes[0] = if bytes[0] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert_eq!(
            gate.authenticate(Some(&tampered), Some(&pass), Some(&iv_header)),
            Err(CredentialError::Invalid)
        );
    }

    #[test]
    fn non_envelope_headers_are_rejected() {
        let gate = gate();
        let iv = Iv::from_bytes([3; 16]);
        let (_, iv_header) = sealed(&gate, "x", &iv);

        assert_eq!(
            gate.authenticate(Some("not base64!!!"), Some("also not"), Some(&iv_header)),
            Err(CredentialError::Invalid)
        );
    }

    #[test]
    fn errors_map_onto_the_api_taxonomy() {
        assert_eq!(
            ApiError::from(CredentialError::Missing),
            ApiError::MissingCredentials
        );
        assert_eq!(
            ApiError::from(CredentialError::Invalid),
            ApiError::InvalidCredentials
        );
    }
}
