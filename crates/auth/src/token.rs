//! HS256 session tokens.
//!
//! [`TokenIssuer`] mints a signed token from a [`SessionSeed`] assembled at
//! login; [`TokenVerifier`] turns an `Authorization` header back into
//! [`SessionClaims`]. Both take `now` as an argument so the time window is
//! checked with zero leeway against a clock the caller controls.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use rolegate_core::{ApiError, ModuleId, RoleId, UserId};

use crate::claims::{ModuleGrant, RoleOption, SessionClaims, SessionData, validate_window};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// No usable bearer token in the `Authorization` header.
    #[error("no bearer token in the authorization header")]
    MissingToken,

    /// Signature, structure, or time-window failure; carries the reason.
    #[error("token rejected: {0}")]
    InvalidToken(String),

    /// Minting failed. Logged where it happens; the client only ever sees
    /// a generic internal error.
    #[error("token signing failed: {0}")]
    Signing(String),
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::MissingToken => ApiError::MissingToken,
            TokenError::InvalidToken(reason) => ApiError::InvalidToken(reason),
            TokenError::Signing(_) => ApiError::internal("Failed to mint session token."),
        }
    }
}

/// Everything the directory hands over about a freshly authenticated user,
/// before it is shaped into claims.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSeed {
    pub user_id: UserId,
    pub email: Option<String>,
    pub role_id: RoleId,
    /// Joined `id:name:slug` triples, comma separated, as stored.
    pub modules: String,
    /// Module ids granted to the role, in display order.
    pub role_modules: Vec<ModuleId>,
    /// All roles, for client-side dropdowns.
    pub roles: Vec<RoleOption>,
}

/// A signed token together with the claims that went into it.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: SessionClaims,
}

/// Mints HS256 session tokens with a fixed lifetime.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    ttl: Duration,
    issuer: Option<String>,
    audience: Option<String>,
}

impl TokenIssuer {
    pub fn new(
        secret: &str,
        ttl: Duration,
        issuer: Option<String>,
        audience: Option<String>,
    ) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            ttl,
            issuer,
            audience,
        }
    }

    /// Shape `seed` into claims valid from `now` through `now + ttl`
    /// inclusive, and sign them.
    pub fn issue(&self, seed: SessionSeed, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let iat = now.timestamp();
        let claims = SessionClaims {
            iat,
            nbf: iat,
            exp: (now + self.ttl).timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            sub: seed.user_id,
            data: SessionData {
                id: seed.user_id,
                email: seed.email,
                role: Some(seed.role_id),
                modules: flatten_modules(&seed.modules, seed.role_id),
                role_modules: seed.role_modules,
                roles: seed.roles,
            },
        };

        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|err| {
                tracing::error!(error = %err, "failed to sign session token");
                TokenError::Signing(err.to_string())
            })?;

        Ok(IssuedToken { token, claims })
    }
}

/// Checks signatures and the validity window of presented tokens.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        // jsonwebtoken's built-in time checks use the wall clock and a 60s
        // default leeway. All of them are disabled; the window is checked
        // by `validate_window` against the caller's `now` instead.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify the `Authorization` header of one request.
    ///
    /// Absence of a bearer token is its own error; anything presented but
    /// unacceptable (bad signature, malformed payload, outside its window)
    /// is [`TokenError::InvalidToken`] with the reason preserved.
    pub fn verify(
        &self,
        authorization: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<SessionClaims, TokenError> {
        let token = authorization
            .and_then(extract_bearer)
            .ok_or(TokenError::MissingToken)?;

        let decoded =
            jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
                .map_err(|err| TokenError::InvalidToken(err.to_string()))?;

        validate_window(&decoded.claims, now)
            .map_err(|err| TokenError::InvalidToken(err.to_string()))?;

        Ok(decoded.claims)
    }
}

/// Pull the token out of an `Authorization` header value: the scheme word
/// `Bearer`, whitespace, then the token up to the next whitespace.
pub fn extract_bearer(header: &str) -> Option<&str> {
    let rest = header.strip_prefix("Bearer")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    rest.split_whitespace().next()
}

/// Expand the stored `id:name:slug` module string into grants, prefixing
/// each slug with the role's client surface (`/admin` for the administrator
/// role, `/app` for everyone else).
///
/// Malformed triples are logged and skipped rather than failing the login.
pub fn flatten_modules(joined: &str, role_id: RoleId) -> Vec<ModuleGrant> {
    let prefix = if role_id.is_admin() { "/admin" } else { "/app" };

    joined
        .split(',')
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let mut parts = entry.splitn(3, ':');
            let (Some(id), Some(name), Some(slug)) = (parts.next(), parts.next(), parts.next())
            else {
                tracing::warn!(entry, "skipping module entry without three fields");
                return None;
            };
            let Ok(id) = id.parse::<ModuleId>() else {
                tracing::warn!(entry, "skipping module entry with non-numeric id");
                return None;
            };
            Some(ModuleGrant {
                id,
                name: name.to_owned(),
                route_slug: format!("{prefix}/{slug}"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SECRET: &str = "unit-test-secret";

    fn at(ts: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(ts, 0).unwrap()
    }

    fn issuer(ttl_secs: i64) -> TokenIssuer {
        TokenIssuer::new(
            SECRET,
            Duration::seconds(ttl_secs),
            Some("rolegate".into()),
            Some("rolegate-clients".into()),
        )
    }

    fn seed() -> SessionSeed {
        SessionSeed {
            user_id: UserId::new(7),
            email: Some("admin@example.com".into()),
            role_id: RoleId::ADMIN,
            modules: "1:Dashboard:dashboard,2:Users:users".into(),
            role_modules: vec![ModuleId::new(1), ModuleId::new(2)],
            roles: vec![RoleOption {
                id: RoleId::new(1),
                role_name: "Admin".into(),
            }],
        }
    }

    #[test]
    fn issue_then_verify_round_trips_the_claims() {
        let issued = issuer(3600).issue(seed(), at(1_000)).unwrap();
        let verifier = TokenVerifier::new(SECRET);

        let header = format!("Bearer {}", issued.token);
        let claims = verifier.verify(Some(&header), at(1_010)).unwrap();

        assert_eq!(claims, issued.claims);
        // Valid from the very second it was minted.
        assert!(verifier.verify(Some(&header), at(1_000)).is_ok());
        assert_eq!(claims.iat, 1_000);
        assert_eq!(claims.nbf, 1_000);
        assert_eq!(claims.exp, 4_600);
        assert_eq!(claims.iss.as_deref(), Some("rolegate"));
        assert_eq!(claims.sub, UserId::new(7));
        assert_eq!(claims.data.role, Some(RoleId::ADMIN));
        assert_eq!(claims.data.modules[0].route_slug, "/admin/dashboard");
        assert_eq!(claims.data.modules[1].route_slug, "/admin/users");
    }

    #[test]
    fn verification_window_is_inclusive_of_exp() {
        let issued = issuer(100).issue(seed(), at(1_000)).unwrap();
        let verifier = TokenVerifier::new(SECRET);
        let header = format!("Bearer {}", issued.token);

        assert!(verifier.verify(Some(&header), at(1_100)).is_ok());
        let err = verifier.verify(Some(&header), at(1_101)).unwrap_err();
        assert_eq!(err, TokenError::InvalidToken("token has expired".into()));
    }

    #[test]
    fn tokens_are_rejected_before_nbf() {
        let issued = issuer(100).issue(seed(), at(1_000)).unwrap();
        let verifier = TokenVerifier::new(SECRET);
        let header = format!("Bearer {}", issued.token);

        let err = verifier.verify(Some(&header), at(999)).unwrap_err();
        assert!(matches!(err, TokenError::InvalidToken(r) if r.contains("not yet valid")));
    }

    #[test]
    fn tokens_signed_with_another_secret_are_rejected() {
        let issued = issuer(3600).issue(seed(), at(1_000)).unwrap();
        let verifier = TokenVerifier::new("some-other-secret");
        let header = format!("Bearer {}", issued.token);

        assert!(matches!(
            verifier.verify(Some(&header), at(1_010)),
            Err(TokenError::InvalidToken(_))
        ));
    }

    #[test]
    fn garbage_tokens_are_invalid_not_missing() {
        let verifier = TokenVerifier::new(SECRET);
        assert!(matches!(
            verifier.verify(Some("Bearer not.a.token"), at(0)),
            Err(TokenError::InvalidToken(_))
        ));
    }

    #[test]
    fn absent_or_schemeless_headers_are_missing() {
        let verifier = TokenVerifier::new(SECRET);
        assert_eq!(
            verifier.verify(None, at(0)),
            Err(TokenError::MissingToken)
        );
        assert_eq!(
            verifier.verify(Some(""), at(0)),
            Err(TokenError::MissingToken)
        );
        assert_eq!(
            verifier.verify(Some("Basic dXNlcjpwYXNz"), at(0)),
            Err(TokenError::MissingToken)
        );
        assert_eq!(
            verifier.verify(Some("Bearer"), at(0)),
            Err(TokenError::MissingToken)
        );
        assert_eq!(
            verifier.verify(Some("Bearer   "), at(0)),
            Err(TokenError::MissingToken)
        );
    }

    #[test]
    fn bearer_extraction_takes_the_first_token() {
        assert_eq!(extract_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer("Bearer  padded"), Some("padded"));
        assert_eq!(extract_bearer("Bearer one two"), Some("one"));
        assert_eq!(extract_bearer("Bearertight"), None);
        assert_eq!(extract_bearer("bearer lowercase"), None);
    }

    #[test]
    fn admin_modules_get_the_admin_prefix() {
        let grants = flatten_modules("1:Dashboard:dashboard,2:Users:users", RoleId::ADMIN);
        assert_eq!(grants.len(), 2);
        assert_eq!(grants[0].id, ModuleId::new(1));
        assert_eq!(grants[0].name, "Dashboard");
        assert_eq!(grants[0].route_slug, "/admin/dashboard");
    }

    #[test]
    fn other_roles_get_the_app_prefix() {
        let grants = flatten_modules("5:Reports:reports", RoleId::new(3));
        assert_eq!(grants[0].route_slug, "/app/reports");
    }

    #[test]
    fn empty_module_strings_flatten_to_nothing() {
        assert!(flatten_modules("", RoleId::ADMIN).is_empty());
    }

    #[test]
    fn malformed_module_entries_are_skipped() {
        let grants = flatten_modules(
            "1:Dashboard:dashboard,garbage,x:Name:slug,3:Roles:roles",
            RoleId::ADMIN,
        );
        assert_eq!(grants.len(), 2);
        assert_eq!(grants[0].name, "Dashboard");
        assert_eq!(grants[1].name, "Roles");
    }

    #[test]
    fn slugs_keep_embedded_colons() {
        let grants = flatten_modules("4:Nested:reports:monthly", RoleId::new(2));
        assert_eq!(grants[0].route_slug, "/app/reports:monthly");
    }
}
