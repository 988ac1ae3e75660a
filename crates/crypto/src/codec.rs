//! AES-256-CBC encrypt/decrypt with PKCS#7 padding.

use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use thiserror::Error;

use crate::keys::{IV_LEN, Iv, KEY_LEN, SharedSecret};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

pub type CryptoResult<T> = Result<T, CryptoError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("key must be {KEY_LEN} bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("iv must be {IV_LEN} bytes, got {0}")]
    InvalidIvLength(usize),

    #[error("ciphertext length {0} is not a multiple of the block size")]
    CiphertextLength(usize),

    #[error("decryption failed: invalid padding")]
    Padding,

    #[error("invalid base64: {0}")]
    Base64(String),
}

/// Symmetric codec over the process-wide [`SharedSecret`].
///
/// Cheap to share behind `Arc`; both operations are pure, synchronous and
/// CPU-only, so there is nothing to await and nothing to lock.
#[derive(Debug, Clone)]
pub struct EnvelopeCodec {
    key: SharedSecret,
}

impl EnvelopeCodec {
    pub fn new(key: SharedSecret) -> Self {
        Self { key }
    }

    /// Encrypt `plaintext` under the given IV.
    ///
    /// Deterministic for a fixed (key, iv, plaintext); callers own IV
    /// freshness. Output length is the input padded up to the next full
    /// block (a block-multiple input still gains one padding block).
    pub fn encrypt(&self, plaintext: &[u8], iv: &Iv) -> Vec<u8> {
        Aes256CbcEnc::new(self.key.as_bytes().into(), iv.as_bytes().into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext)
    }

    /// Decrypt `ciphertext` under the given IV.
    ///
    /// Fails on a non-block-multiple length or invalid padding. There is no
    /// authentication tag: a tampered ciphertext that happens to unpad
    /// cleanly decrypts to garbage rather than an error, which is a property
    /// of the wire contract and is pinned down by the tamper tests.
    pub fn decrypt(&self, ciphertext: &[u8], iv: &Iv) -> CryptoResult<Vec<u8>> {
        if ciphertext.is_empty() || ciphertext.len() % IV_LEN != 0 {
            return Err(CryptoError::CiphertextLength(ciphertext.len()));
        }

        Aes256CbcDec::new(self.key.as_bytes().into(), iv.as_bytes().into())
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| CryptoError::Padding)
    }

    /// Fresh random IV; convenience passthrough so callers holding a codec
    /// do not also need the keys module in scope.
    pub fn generate_iv(&self) -> Iv {
        Iv::generate()
    }
}
