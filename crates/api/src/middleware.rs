//! Request middleware: CORS preflight, the transport credential gate, and
//! the session layer.
//!
//! The gate and the session layer answer for themselves with sealed
//! envelopes; a request only reaches a handler once its transport
//! credential, token, and module permission have all passed.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header::{HeaderMap, HeaderName, HeaderValue};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use rolegate_auth::{CredentialGate, access};
use rolegate_core::{ApiError, ModuleId};
use rolegate_crypto::EnvelopeCodec;

use crate::app::envelope;
use crate::app::state::AppState;
use crate::context::SessionContext;

pub const X_API_USER: &str = "x-api-user";
pub const X_API_PASS: &str = "x-api-pass";
pub const X_IV: &str = "x-iv";
pub const MODULE: &str = "module";

/// State for the credential gate, which runs before anything route-specific.
#[derive(Clone)]
pub struct GateState {
    pub codec: Arc<EnvelopeCodec>,
    pub gate: CredentialGate,
}

/// Permissive CORS plus the OPTIONS short-circuit.
///
/// Preflights answer 200 before the credential gate ever sees them; browsers
/// cannot attach the credential headers to a preflight.
pub async fn cors(req: axum::http::Request<axum::body::Body>, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        let mut response = StatusCode::OK.into_response();
        apply_cors_headers(response.headers_mut());
        return response;
    }

    let mut response = next.run(req).await;
    apply_cors_headers(response.headers_mut());
    response
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        HeaderName::from_static("access-control-allow-origin"),
        HeaderValue::from_static("*"),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-methods"),
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-headers"),
        HeaderValue::from_static(
            "Content-Type, X-IV, Authorization, X-API-USER, X-API-PASS, Module, Role",
        ),
    );
}

/// Transport credential check. Gates every route, the login included.
pub async fn credential_gate(
    State(state): State<GateState>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let headers = req.headers();
    let user = header_str(headers, X_API_USER);
    let pass = header_str(headers, X_API_PASS);
    let iv = header_str(headers, X_IV);

    if let Err(err) = state.gate.authenticate(user, pass, iv) {
        tracing::debug!(error = %err, "transport credential rejected");
        return envelope::sealed(&state.codec, ApiError::from(err).payload());
    }

    next.run(req).await
}

/// Token verification plus the module permission check.
///
/// On success the verified claims are attached to the request as a
/// [`SessionContext`]; on failure the response is a sealed 401/403 envelope
/// and the handler never runs.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let authorization = header_str(req.headers(), "authorization");

    let claims = match state.verifier.verify(authorization, Utc::now()) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::debug!(error = %err, "session token rejected");
            return envelope::sealed(&state.codec, ApiError::from(err).payload());
        }
    };

    let module = requested_module(req.headers());
    if let Err(err) = access::authorize(&claims, module) {
        tracing::debug!(
            module = module.as_i64(),
            user = claims.sub.as_i64(),
            "module access denied"
        );
        return envelope::sealed(&state.codec, ApiError::from(err).payload());
    }

    req.extensions_mut().insert(SessionContext::new(claims));
    next.run(req).await
}

/// `Module` header as a module id; absent or non-numeric means "no module
/// gate requested".
fn requested_module(headers: &HeaderMap) -> ModuleId {
    header_str(headers, MODULE)
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(ModuleId::NONE)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                HeaderName::from_static(name),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn module_header_parses_to_an_id() {
        let map = headers(&[("module", "7")]);
        assert_eq!(requested_module(&map), ModuleId::new(7));
    }

    #[test]
    fn absent_or_junk_module_header_means_no_gate() {
        assert_eq!(requested_module(&HeaderMap::new()), ModuleId::NONE);
        let map = headers(&[("module", "seven")]);
        assert_eq!(requested_module(&map), ModuleId::NONE);
    }

    #[test]
    fn module_header_tolerates_whitespace() {
        let map = headers(&[("module", " 3 ")]);
        assert_eq!(requested_module(&map), ModuleId::new(3));
    }
}
