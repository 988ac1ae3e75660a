//! Login, claim echo, and profile.

use axum::body::Bytes;
use axum::response::Response;
use axum::Extension;
use chrono::Utc;
use serde_json::json;

use rolegate_auth::SessionSeed;
use rolegate_core::{ApiError, ResponsePayload};

use crate::app::dto::{LoginRequest, LoginUserView};
use crate::app::envelope;
use crate::app::state::AppState;
use crate::context::SessionContext;

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// POST /admin/login - authenticate against the directory and mint a session
/// token. Sits behind the credential gate only; there is no session yet.
pub async fn login(Extension(state): Extension<AppState>, body: Bytes) -> Response {
    let payload = handle_login(&state, &body).unwrap_or_else(|err| err.payload());
    envelope::sealed(&state.codec, payload)
}

/// GET /verify - echo the verified session claims back to the caller.
pub async fn verify(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<SessionContext>,
) -> Response {
    envelope::sealed(
        &state.codec,
        ResponsePayload::success(200)
            .with_message("User verified successfully")
            .with_data(json!(session.claims())),
    )
}

/// GET /profile - the caller's own directory row, hash scrubbed.
pub async fn profile(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<SessionContext>,
) -> Response {
    let payload = match state.directory.find_profile(session.user_id()) {
        Some(profile) => ResponsePayload::success(200)
            .with_message("")
            .with_data(json!(profile)),
        None => ResponsePayload::new("invalid_user", 401).with_message("Invalid user ID."),
    };
    envelope::sealed(&state.codec, payload)
}

// ─────────────────────────────────────────────────────────────────────────────
// Login flow
// ─────────────────────────────────────────────────────────────────────────────

fn handle_login(state: &AppState, body: &[u8]) -> Result<ResponsePayload, ApiError> {
    let request: LoginRequest = envelope::open_body(&state.codec, body)?;

    let Some(user) = state
        .directory
        .find_login_user(&request.email, request.wants_admin())
    else {
        return Ok(invalid_user());
    };

    // A malformed stored hash verifies as a mismatch, not a fault.
    if !bcrypt::verify(&request.password, &user.password_hash).unwrap_or(false) {
        return Ok(invalid_user());
    }

    let roles = state.directory.role_dropdown();
    let role_modules = state.directory.role_module_ids(user.role_id);

    let issued = state.issuer.issue(
        SessionSeed {
            user_id: user.user_id,
            email: Some(user.email.clone()),
            role_id: user.role_id,
            modules: user.modules.clone(),
            role_modules: role_modules.clone(),
            roles: roles.clone(),
        },
        Utc::now(),
    )?;

    let view = LoginUserView {
        user_id: user.user_id,
        user_name: user.user_name,
        email: user.email,
        mobile: user.mobile,
        password: None,
        address: user.address,
        pincode: user.pincode,
        role_id: user.role_id,
        role_name: user.role_name,
        modules: user.modules,
        roles,
        role_modules,
    };

    tracing::info!(user = view.user_id.as_i64(), "login succeeded");

    Ok(ResponsePayload::success(200)
        .with_message("Login successful.")
        .with_data(json!({
            "user": view,
            "token": issued.token,
            "modules": issued.claims.data.modules,
        })))
}

/// Unknown email, role-surface mismatch, and wrong password all collapse
/// into one answer.
fn invalid_user() -> ResponsePayload {
    ResponsePayload::new("invalid_user", 401).with_message("Invalid email or password.")
}
