//! The `{data, iv}` wire wrapper.
//!
//! Both fields are standard base64: `data` is the CBC ciphertext, `iv` the
//! 16-byte vector it was produced under. Responses are sealed with a fresh
//! IV; request envelopes arrive with one chosen by the client.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::codec::{CryptoError, CryptoResult, EnvelopeCodec};
use crate::keys::Iv;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Base64 ciphertext.
    pub data: String,
    /// Base64 IV, exactly one block once decoded.
    pub iv: String,
}

impl Envelope {
    /// Encrypt `plaintext` under a fresh random IV.
    pub fn seal(codec: &EnvelopeCodec, plaintext: &[u8]) -> Self {
        Self::seal_with_iv(codec, plaintext, &Iv::generate())
    }

    /// Encrypt `plaintext` under a caller-supplied IV (the client side of
    /// the exchange, and deterministic tests).
    pub fn seal_with_iv(codec: &EnvelopeCodec, plaintext: &[u8], iv: &Iv) -> Self {
        Self {
            data: BASE64.encode(codec.encrypt(plaintext, iv)),
            iv: BASE64.encode(iv.as_bytes()),
        }
    }

    /// Decode and decrypt, returning the inner plaintext bytes.
    pub fn open(&self, codec: &EnvelopeCodec) -> CryptoResult<Vec<u8>> {
        let ciphertext = BASE64
            .decode(&self.data)
            .map_err(|e| CryptoError::Base64(e.to_string()))?;
        let iv_bytes = BASE64
            .decode(&self.iv)
            .map_err(|e| CryptoError::Base64(e.to_string()))?;
        let iv = Iv::from_slice(&iv_bytes)?;

        codec.decrypt(&ciphertext, &iv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{IV_LEN, KEY_LEN, SharedSecret};

    fn codec() -> EnvelopeCodec {
        EnvelopeCodec::new(SharedSecret::from_bytes([0x42; KEY_LEN]))
    }

    #[test]
    fn seal_then_open_round_trips() {
        let codec = codec();
        let sealed = Envelope::seal(&codec, b"{\"status\":\"success\"}");
        assert_eq!(sealed.open(&codec).unwrap(), b"{\"status\":\"success\"}");
    }

    #[test]
    fn sealing_twice_uses_distinct_ivs() {
        let codec = codec();
        let a = Envelope::seal(&codec, b"same plaintext");
        let b = Envelope::seal(&codec, b"same plaintext");
        assert_ne!(a.iv, b.iv);
        assert_ne!(a.data, b.data);
    }

    #[test]
    fn wire_shape_is_data_and_iv() {
        let codec = codec();
        let sealed = Envelope::seal_with_iv(&codec, b"x", &Iv::from_bytes([1; IV_LEN]));
        let json = serde_json::to_value(&sealed).unwrap();
        assert!(json["data"].is_string());
        assert_eq!(json["iv"], BASE64.encode([1u8; IV_LEN]));
    }

    #[test]
    fn open_rejects_bad_base64() {
        let codec = codec();
        let envelope = Envelope {
            data: "not base64!!!".into(),
            iv: BASE64.encode([0u8; IV_LEN]),
        };
        assert!(matches!(envelope.open(&codec), Err(CryptoError::Base64(_))));
    }

    #[test]
    fn open_rejects_short_iv() {
        let codec = codec();
        let envelope = Envelope {
            data: BASE64.encode([0u8; 16]),
            iv: BASE64.encode([0u8; 8]),
        };
        assert!(matches!(
            envelope.open(&codec),
            Err(CryptoError::InvalidIvLength(8))
        ));
    }

    #[test]
    fn opening_with_a_different_key_never_recovers_the_plaintext() {
        let sealed = Envelope::seal(&codec(), b"payload payload payload");
        let other = EnvelopeCodec::new(SharedSecret::from_bytes([0x43; KEY_LEN]));
        match sealed.open(&other) {
            Ok(garbled) => assert_ne!(garbled, b"payload payload payload"),
            Err(CryptoError::Padding) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
}
