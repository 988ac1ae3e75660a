//! Session claims model (transport-agnostic).
//!
//! The typed shape of everything a signed token carries. Fields that older
//! or foreign tokens may omit are defaulted rather than failing the decode;
//! the time-window fields are required, so a token without `exp` can never
//! verify.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rolegate_core::{ModuleId, RoleId, UserId};

/// The full token payload.
///
/// `iss` and `aud` are emitted even when unset (as `null`) so the wire shape
/// stays stable for clients that read the raw payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub iss: Option<String>,
    pub aud: Option<String>,
    pub sub: UserId,

    #[serde(default)]
    pub data: SessionData,
}

/// The application half of the claims: identity, role, and the permission
/// material the access check runs on without any directory round-trip.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default)]
    pub id: UserId,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub role: Option<RoleId>,

    #[serde(default)]
    pub modules: Vec<ModuleGrant>,

    #[serde(default, rename = "roleModules")]
    pub role_modules: Vec<ModuleId>,

    #[serde(default)]
    pub roles: Vec<RoleOption>,
}

/// One module the session may navigate to, with its route slug already
/// prefixed (`/admin/...` for the administrator role, `/app/...` otherwise).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleGrant {
    pub id: ModuleId,
    pub name: String,
    #[serde(rename = "routeSlug")]
    pub route_slug: String,
}

/// A role as it appears in dropdowns and inside the claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleOption {
    pub id: RoleId,
    pub role_name: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenWindowError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (nbf is in the future)")]
    NotYetValid,
}

/// Deterministically validate the token's time window against a supplied
/// `now`: valid iff `nbf <= now <= exp`, with zero leeway.
///
/// Signature verification is intentionally elsewhere; this checks the
/// *claims* only, so tests can pin the clock.
pub fn validate_window(claims: &SessionClaims, now: DateTime<Utc>) -> Result<(), TokenWindowError> {
    let ts = now.timestamp();
    if ts < claims.nbf {
        return Err(TokenWindowError::NotYetValid);
    }
    if ts > claims.exp {
        return Err(TokenWindowError::Expired);
    }
    Ok(())
}
