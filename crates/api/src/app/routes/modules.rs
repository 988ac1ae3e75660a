//! Module endpoints. Modules have no write surface; they are seeded data.

use axum::response::Response;
use axum::Extension;
use serde_json::json;

use rolegate_core::ResponsePayload;

use crate::app::envelope;
use crate::app::state::AppState;
use crate::context::SessionContext;

/// GET /modules/dropdown - every module, name-ordered, for selects.
pub async fn dropdown(Extension(state): Extension<AppState>) -> Response {
    envelope::sealed(
        &state.codec,
        ResponsePayload::success(200)
            .with_message("")
            .with_data(json!({ "modules": state.directory.module_dropdown() })),
    )
}

/// GET /users/modules - the identity slice of the caller's token: id, email,
/// role, and granted modules. No message key on this one.
pub async fn user_modules(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<SessionContext>,
) -> Response {
    let claims = session.claims();
    envelope::sealed(
        &state.codec,
        ResponsePayload::success(200).with_data(json!({
            "id": claims.sub,
            "email": claims.data.email,
            "role": claims.data.role,
            "modules": claims.data.modules,
        })),
    )
}
