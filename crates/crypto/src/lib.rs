//! `rolegate-crypto` — the envelope encryption layer.
//!
//! Everything that touches cipher state lives here: the process-wide
//! [`SharedSecret`], explicit per-message [`Iv`]s, the AES-256-CBC
//! [`EnvelopeCodec`], and the base64 wire [`Envelope`]. No other crate
//! performs cryptography.
//!
//! The scheme is deliberately CBC with PKCS#7 padding and no authentication
//! tag, matching the transport contract the clients speak. Its malleability
//! is a known property of that contract, exercised by the tamper tests below,
//! not something this crate papers over.

pub mod codec;
pub mod envelope;
pub mod keys;

pub use codec::{CryptoError, CryptoResult, EnvelopeCodec};
pub use envelope::Envelope;
pub use keys::{IV_LEN, Iv, KEY_LEN, SharedSecret};
