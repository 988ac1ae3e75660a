//! Per-request module permission check.
//!
//! Runs entirely on material already inside the verified claims; no
//! directory lookup happens per request.

use thiserror::Error;

use rolegate_core::{ApiError, ModuleId};

use crate::claims::SessionClaims;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    #[error("session does not hold the requested module")]
    ModuleAccessDenied,
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::ModuleAccessDenied => ApiError::ModuleAccessDenied,
        }
    }
}

/// Decide whether a session may touch the module named by the request's
/// `Module` header. [`ModuleId::NONE`] means the route asked for no module
/// gate and always passes; any other id must be among the session's granted
/// `roleModules`.
pub fn authorize(claims: &SessionClaims, requested: ModuleId) -> Result<(), AccessError> {
    if requested == ModuleId::NONE {
        return Ok(());
    }
    if claims.data.role_modules.contains(&requested) {
        Ok(())
    } else {
        Err(AccessError::ModuleAccessDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::SessionData;
    use rolegate_core::UserId;

    fn session_with_modules(ids: &[i64]) -> SessionClaims {
        SessionClaims {
            iat: 0,
            nbf: 0,
            exp: 0,
            iss: None,
            aud: None,
            sub: UserId::new(1),
            data: SessionData {
                role_modules: ids.iter().copied().map(ModuleId::new).collect(),
                ..SessionData::default()
            },
        }
    }

    #[test]
    fn granted_modules_are_authorized() {
        let claims = session_with_modules(&[2, 5, 9]);
        assert_eq!(authorize(&claims, ModuleId::new(5)), Ok(()));
    }

    #[test]
    fn ungranted_modules_are_denied() {
        let claims = session_with_modules(&[2, 5, 9]);
        assert_eq!(
            authorize(&claims, ModuleId::new(7)),
            Err(AccessError::ModuleAccessDenied)
        );
    }

    #[test]
    fn module_zero_always_passes() {
        let claims = session_with_modules(&[]);
        assert_eq!(authorize(&claims, ModuleId::NONE), Ok(()));
    }

    #[test]
    fn empty_grants_deny_every_real_module() {
        let claims = session_with_modules(&[]);
        assert_eq!(
            authorize(&claims, ModuleId::new(1)),
            Err(AccessError::ModuleAccessDenied)
        );
    }

    #[test]
    fn denial_maps_to_the_module_access_api_error() {
        assert_eq!(
            ApiError::from(AccessError::ModuleAccessDenied),
            ApiError::ModuleAccessDenied
        );
    }
}
