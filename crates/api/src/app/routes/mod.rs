use axum::response::Response;
use axum::routing::{get, post};
use axum::{Extension, Router};

use rolegate_core::ResponsePayload;

use crate::app::envelope;
use crate::app::state::AppState;

pub mod auth;
pub mod modules;
pub mod roles;
pub mod users;

/// Router for every endpoint behind a verified session. `/admin/login` and
/// the 404 fallback are wired separately in `build_app`; they sit outside
/// the session layer.
pub fn session_router() -> Router {
    Router::new()
        .route("/verify", get(auth::verify))
        .route("/profile", get(auth::profile))
        .route("/users", post(users::list))
        .route("/users/add", post(users::create))
        .route("/users/get", post(users::get))
        .route("/users/update", post(users::update))
        .route("/users/delete", post(users::delete))
        .route("/users/modules", get(modules::user_modules))
        .route("/roles", post(roles::list))
        .route("/roles/add", post(roles::create))
        .route("/roles/get", post(roles::get))
        .route("/roles/update", post(roles::update))
        .route("/roles/delete", post(roles::delete))
        .route("/roles/dropdown", get(roles::dropdown))
        .route("/modules/dropdown", get(modules::dropdown))
}

/// Unknown paths still answer inside the envelope.
pub async fn not_found(Extension(state): Extension<AppState>) -> Response {
    envelope::sealed(&state.codec, ResponsePayload::error(404, "Not Found"))
}
