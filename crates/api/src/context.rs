use rolegate_auth::SessionClaims;
use rolegate_core::{RoleId, UserId};

/// Verified session for a request.
///
/// Inserted as a request extension by the session middleware after the token
/// and module checks pass; handlers read it instead of re-parsing headers.
#[derive(Debug, Clone)]
pub struct SessionContext {
    claims: SessionClaims,
}

impl SessionContext {
    pub fn new(claims: SessionClaims) -> Self {
        Self { claims }
    }

    pub fn claims(&self) -> &SessionClaims {
        &self.claims
    }

    pub fn user_id(&self) -> UserId {
        self.claims.sub
    }

    /// The role baked into the token at login, `None` for tokens minted
    /// without one.
    pub fn role_id(&self) -> Option<RoleId> {
        self.claims.data.role
    }
}
