//! Role management endpoints.

use axum::body::Bytes;
use axum::response::Response;
use axum::Extension;
use serde_json::json;

use rolegate_core::{ApiError, ResponsePayload};
use rolegate_directory::ListQuery;

use crate::app::dto::{required_id, required_str, RoleIdRequest, RolePayload};
use crate::app::envelope;
use crate::app::state::AppState;
use crate::context::SessionContext;

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// POST /roles - paged, searchable role list with the caller's role id
/// attached for the client grid.
pub async fn list(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<SessionContext>,
    body: Bytes,
) -> Response {
    let payload = handle_list(&state, &session, &body).unwrap_or_else(|err| err.payload());
    envelope::sealed(&state.codec, payload)
}

/// GET /roles/dropdown - every role, name-ordered, for selects.
pub async fn dropdown(Extension(state): Extension<AppState>) -> Response {
    envelope::sealed(
        &state.codec,
        ResponsePayload::success(200)
            .with_message("")
            .with_data(json!({ "roles": state.directory.role_dropdown() })),
    )
}

/// POST /roles/add - create a role and link its modules.
pub async fn create(Extension(state): Extension<AppState>, body: Bytes) -> Response {
    let payload = handle_create(&state, &body).unwrap_or_else(|err| err.payload());
    envelope::sealed(&state.codec, payload)
}

/// POST /roles/get - one role with its module links.
pub async fn get(Extension(state): Extension<AppState>, body: Bytes) -> Response {
    let payload = handle_get(&state, &body).unwrap_or_else(|err| err.payload());
    envelope::sealed(&state.codec, payload)
}

/// POST /roles/update - rename and relink.
pub async fn update(Extension(state): Extension<AppState>, body: Bytes) -> Response {
    let payload = handle_update(&state, &body).unwrap_or_else(|err| err.payload());
    envelope::sealed(&state.codec, payload)
}

/// POST /roles/delete - delete a role unless it is the admin role or still
/// assigned.
pub async fn delete(Extension(state): Extension<AppState>, body: Bytes) -> Response {
    let payload = handle_delete(&state, &body).unwrap_or_else(|err| err.payload());
    envelope::sealed(&state.codec, payload)
}

// ─────────────────────────────────────────────────────────────────────────────
// Operations
// ─────────────────────────────────────────────────────────────────────────────

fn handle_list(
    state: &AppState,
    session: &SessionContext,
    body: &[u8],
) -> Result<ResponsePayload, ApiError> {
    let query: ListQuery = envelope::open_body(&state.codec, body)?;
    let page = state.directory.list_roles(&query);

    Ok(ResponsePayload::success(200)
        .with_message("")
        .with_data(json!({
            "roles": page.rows,
            "totalCount": page.total_count,
            "roleId": session.role_id(),
        })))
}

fn handle_create(state: &AppState, body: &[u8]) -> Result<ResponsePayload, ApiError> {
    let payload: RolePayload = envelope::open_body(&state.codec, body)?;

    let Some(name) = required_str(&payload.name) else {
        return Ok(bad_request("Role name is required"));
    };
    let name = name.trim();

    if state.directory.count_roles_by_name(name, None) > 0 {
        return Ok(role_exists());
    }

    state.directory.create_role(name, &payload.modules);

    Ok(ResponsePayload::success(201).with_message("Role created successfully"))
}

fn handle_get(state: &AppState, body: &[u8]) -> Result<ResponsePayload, ApiError> {
    let request: RoleIdRequest = envelope::open_body(&state.codec, body)?;
    let Some(role_id) = required_id(request.role_id) else {
        return Ok(bad_request("Role ID is required"));
    };

    Ok(match state.directory.find_role(role_id) {
        // No message on this one; the client reads data straight off.
        Some(role) => ResponsePayload::success(200).with_data(json!(role)),
        None => ResponsePayload::new("not_found", 404).with_message("Role not found"),
    })
}

fn handle_update(state: &AppState, body: &[u8]) -> Result<ResponsePayload, ApiError> {
    let payload: RolePayload = envelope::open_body(&state.codec, body)?;

    let (Some(role_id), Some(name)) = (
        required_id(payload.role_id),
        required_str(&payload.name),
    ) else {
        return Ok(bad_request("Role ID and name are required"));
    };
    let name = name.trim();

    if state.directory.count_roles_by_name(name, Some(role_id)) > 0 {
        return Ok(role_exists());
    }

    // Renaming a missing role is a no-op that still reports success.
    state
        .directory
        .update_role(role_id, name, &payload.modules, &payload.deleted_modules);

    Ok(ResponsePayload::success(200).with_message("Role updated successfully"))
}

fn handle_delete(state: &AppState, body: &[u8]) -> Result<ResponsePayload, ApiError> {
    let request: RoleIdRequest = envelope::open_body(&state.codec, body)?;
    let Some(role_id) = required_id(request.role_id) else {
        return Ok(bad_request("Role ID is required"));
    };

    if role_id.is_admin() {
        return Ok(bad_request("You can't delete the admin role"));
    }
    if state.directory.count_users_with_role(role_id) > 0 {
        return Ok(bad_request(
            "You cannot delete this role because it is assigned to one or more users.",
        ));
    }

    // Deleting an absent role still reports success; only the guards above
    // refuse.
    state.directory.delete_role(role_id);

    Ok(ResponsePayload::success(200).with_message("Role deleted successfully"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared answers
// ─────────────────────────────────────────────────────────────────────────────

fn bad_request(message: &str) -> ResponsePayload {
    ResponsePayload::new("bad_request", 400).with_message(message)
}

fn role_exists() -> ResponsePayload {
    ResponsePayload::new("role-exist", 200).with_message("Role already exists")
}
