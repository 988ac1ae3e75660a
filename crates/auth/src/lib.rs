//! `rolegate-auth` — the request security core.
//!
//! Three independent trust checks live here, each decoupled from HTTP and
//! storage so they compose cleanly at the API boundary:
//!
//! - [`CredentialGate`]: the transport-level shared credential carried,
//!   encrypted, in headers. Gates every route, including login.
//! - [`TokenIssuer`] / [`TokenVerifier`]: stateless HS256 session tokens
//!   carrying the user's role and flattened module permissions.
//! - [`access::authorize`]: the pure per-request module permission decision.
//!
//! A request walks them in order: credential, then token, then module. Any
//! failure is terminal and typed; nothing here panics on adversarial input.

pub mod access;
pub mod claims;
pub mod credential;
pub mod token;

pub use access::AccessError;
pub use claims::{ModuleGrant, RoleOption, SessionClaims, SessionData, validate_window};
pub use credential::{ApiCredentials, CredentialError, CredentialGate};
pub use token::{
    IssuedToken, SessionSeed, TokenError, TokenIssuer, TokenVerifier, extract_bearer,
    flatten_modules,
};
