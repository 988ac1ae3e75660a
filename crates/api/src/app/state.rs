use std::sync::Arc;

use rolegate_auth::{TokenIssuer, TokenVerifier};
use rolegate_crypto::EnvelopeCodec;
use rolegate_directory::Directory;

/// Shared service wiring, cloned into every handler as an extension.
///
/// Everything here is immutable after construction; the directory guards its
/// own interior state.
#[derive(Clone)]
pub struct AppState {
    pub codec: Arc<EnvelopeCodec>,
    pub issuer: Arc<TokenIssuer>,
    pub verifier: Arc<TokenVerifier>,
    pub directory: Arc<dyn Directory>,
}
