//! Process configuration.
//!
//! Everything is read from the environment exactly once, in `main`, and
//! injected into constructors from there. Nothing in the request path
//! touches `std::env`, and a bad value aborts startup instead of surfacing
//! per-request.

use std::net::SocketAddr;

use chrono::Duration;
use rolegate_crypto::SharedSecret;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Immutable configuration for one server process.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Expected plaintext of the `X-API-USER` header.
    pub api_user: String,
    /// Expected plaintext of the `X-API-PASS` header.
    pub api_pass: String,
    /// The envelope key. Exactly 32 bytes; never logged.
    pub enc_key: SharedSecret,
    /// HS256 signing secret, distinct from the envelope key.
    pub jwt_secret: String,
    pub jwt_ttl: Duration,
    pub jwt_issuer: Option<String>,
    pub jwt_audience: Option<String>,
    /// When set, `main` seeds the directory with a default admin account.
    pub seed_admin: Option<SeedAdmin>,
}

/// Bootstrap admin credentials for an otherwise empty directory.
#[derive(Debug, Clone)]
pub struct SeedAdmin {
    pub email: String,
    pub password: String,
}

impl AppConfig {
    /// Read the full configuration from the environment.
    ///
    /// Required: `ROLEGATE_API_USER`, `ROLEGATE_API_PASS`, `ROLEGATE_ENC_KEY`
    /// (exactly 32 bytes), `ROLEGATE_JWT_SECRET`. Optional:
    /// `ROLEGATE_BIND_ADDR` (default `0.0.0.0:8080`), `ROLEGATE_JWT_TTL_SECS`
    /// (default 3600), `ROLEGATE_JWT_ISSUER`, `ROLEGATE_JWT_AUDIENCE`, and
    /// the `ROLEGATE_ADMIN_EMAIL` / `ROLEGATE_ADMIN_PASSWORD` seed pair.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = match optional("ROLEGATE_BIND_ADDR") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                var: "ROLEGATE_BIND_ADDR",
                reason: format!("{raw:?} is not a socket address"),
            })?,
            None => SocketAddr::from(([0, 0, 0, 0], 8080)),
        };

        let key_raw = required("ROLEGATE_ENC_KEY")?;
        let enc_key =
            SharedSecret::from_slice(key_raw.as_bytes()).map_err(|_| ConfigError::Invalid {
                var: "ROLEGATE_ENC_KEY",
                reason: format!("must be exactly 32 bytes, got {}", key_raw.len()),
            })?;

        let jwt_ttl = match optional("ROLEGATE_JWT_TTL_SECS") {
            Some(raw) => {
                let secs: i64 = raw.parse().map_err(|_| ConfigError::Invalid {
                    var: "ROLEGATE_JWT_TTL_SECS",
                    reason: format!("{raw:?} is not a number of seconds"),
                })?;
                Duration::seconds(secs)
            }
            None => Duration::seconds(3600),
        };

        let seed_admin = match (
            optional("ROLEGATE_ADMIN_EMAIL"),
            optional("ROLEGATE_ADMIN_PASSWORD"),
        ) {
            (Some(email), Some(password)) => Some(SeedAdmin { email, password }),
            (None, None) => None,
            _ => {
                return Err(ConfigError::Invalid {
                    var: "ROLEGATE_ADMIN_EMAIL",
                    reason: "seed admin needs both ROLEGATE_ADMIN_EMAIL and \
                             ROLEGATE_ADMIN_PASSWORD"
                        .to_string(),
                });
            }
        };

        Ok(Self {
            bind_addr,
            api_user: required("ROLEGATE_API_USER")?,
            api_pass: required("ROLEGATE_API_PASS")?,
            enc_key,
            jwt_secret: required("ROLEGATE_JWT_SECRET")?,
            jwt_ttl,
            jwt_issuer: optional("ROLEGATE_JWT_ISSUER"),
            jwt_audience: optional("ROLEGATE_JWT_AUDIENCE"),
            seed_admin,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

fn optional(name: &'static str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
