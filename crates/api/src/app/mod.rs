//! HTTP application wiring (axum router + service construction).
//!
//! Layout:
//! - `state.rs`: the shared service wiring handlers read from
//! - `envelope.rs`: the one place responses are sealed and bodies opened
//! - `dto.rs`: request DTOs and the login response view
//! - `routes/`: HTTP routes + handlers (one file per area)

use std::sync::Arc;

use axum::routing::post;
use axum::{Extension, Router};
use tower::ServiceBuilder;

use rolegate_auth::{ApiCredentials, CredentialGate, TokenIssuer, TokenVerifier};
use rolegate_crypto::EnvelopeCodec;
use rolegate_directory::Directory;

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod envelope;
pub mod routes;
pub mod state;

use state::AppState;

/// Build the full router (public entrypoint used by `main.rs` and the
/// black-box tests).
///
/// Middleware order, outermost first: CORS (answers preflights), the
/// transport credential gate, then per-route session verification. Only
/// `/admin/login` and the 404 fallback skip the session layer; nothing
/// skips the gate.
pub fn build_app(config: AppConfig, directory: Arc<dyn Directory>) -> Router {
    let codec = Arc::new(EnvelopeCodec::new(config.enc_key));
    let gate = CredentialGate::new(
        codec.clone(),
        ApiCredentials {
            user: config.api_user,
            pass: config.api_pass,
        },
    );
    let issuer = Arc::new(TokenIssuer::new(
        &config.jwt_secret,
        config.jwt_ttl,
        config.jwt_issuer,
        config.jwt_audience,
    ));
    let verifier = Arc::new(TokenVerifier::new(&config.jwt_secret));

    let state = AppState {
        codec: codec.clone(),
        issuer,
        verifier,
        directory,
    };

    let session = routes::session_router().layer(axum::middleware::from_fn_with_state(
        state.clone(),
        middleware::require_session,
    ));

    let gate_state = middleware::GateState { codec, gate };

    Router::new()
        .route("/admin/login", post(routes::auth::login))
        .merge(session)
        .fallback(routes::not_found)
        .layer(Extension(state))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::cors))
                .layer(axum::middleware::from_fn_with_state(
                    gate_state,
                    middleware::credential_gate,
                )),
        )
}
