//! Key and IV types.
//!
//! Fixed-size newtypes so the codec can never be handed material of the wrong
//! length. Key bytes are zeroized on drop and never printed.

use core::fmt;

use rand::RngCore;
use rand::rngs::OsRng;
use zeroize::Zeroize;

use crate::codec::CryptoError;

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;

/// AES block size; CBC IVs are exactly one block.
pub const IV_LEN: usize = 16;

/// The process-wide symmetric key.
///
/// Loaded once from configuration at startup and shared (behind `Arc`) for
/// the life of the process; there is no rotation or per-session derivation.
#[derive(Clone)]
pub struct SharedSecret([u8; KEY_LEN]);

impl SharedSecret {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Accepts exactly `KEY_LEN` bytes; anything else is a configuration
    /// error the caller must surface at startup.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength(bytes.len()))?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl Drop for SharedSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material
        write!(f, "SharedSecret([REDACTED])")
    }
}

/// An explicit CBC initialization vector.
///
/// Responses get a fresh one per message via [`Iv::generate`]; requests carry
/// one chosen by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Iv([u8; IV_LEN]);

impl Iv {
    /// 16 cryptographically secure random bytes, fresh per call.
    pub fn generate() -> Self {
        let mut bytes = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; IV_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; IV_LEN] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidIvLength(bytes.len()))?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; IV_LEN] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_secret_requires_exactly_32_bytes() {
        assert!(SharedSecret::from_slice(&[7u8; 32]).is_ok());
        assert!(matches!(
            SharedSecret::from_slice(&[7u8; 31]),
            Err(CryptoError::InvalidKeyLength(31))
        ));
        assert!(matches!(
            SharedSecret::from_slice(&[7u8; 48]),
            Err(CryptoError::InvalidKeyLength(48))
        ));
    }

    #[test]
    fn iv_requires_exactly_16_bytes() {
        assert!(Iv::from_slice(&[1u8; 16]).is_ok());
        assert!(matches!(
            Iv::from_slice(&[1u8; 12]),
            Err(CryptoError::InvalidIvLength(12))
        ));
    }

    #[test]
    fn generated_ivs_differ() {
        // Not a randomness test, just a guard against a constant stub.
        assert_ne!(Iv::generate(), Iv::generate());
    }

    #[test]
    fn debug_never_prints_key_material() {
        let secret = SharedSecret::from_bytes([0xAB; 32]);
        let rendered = format!("{secret:?}");
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains("171")); // 0xAB
    }
}
