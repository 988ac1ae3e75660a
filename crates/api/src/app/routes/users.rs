//! User management endpoints.

use axum::body::Bytes;
use axum::response::Response;
use axum::Extension;
use serde_json::json;

use rolegate_core::{ApiError, ResponsePayload};
use rolegate_directory::{ListQuery, NewUser, UserUpdate};

use crate::app::dto::{required_id, required_str, UserIdRequest, UserPayload};
use crate::app::envelope;
use crate::app::state::AppState;
use crate::context::SessionContext;

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// POST /users - paged, searchable user list. The caller's role id rides
/// along in the data for the client grid.
pub async fn list(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<SessionContext>,
    body: Bytes,
) -> Response {
    let payload = handle_list(&state, &session, &body).unwrap_or_else(|err| err.payload());
    envelope::sealed(&state.codec, payload)
}

/// POST /users/add - create a user.
pub async fn create(Extension(state): Extension<AppState>, body: Bytes) -> Response {
    let payload = handle_create(&state, &body).unwrap_or_else(|err| err.payload());
    envelope::sealed(&state.codec, payload)
}

/// POST /users/get - fetch one user.
pub async fn get(Extension(state): Extension<AppState>, body: Bytes) -> Response {
    let payload = handle_get(&state, &body).unwrap_or_else(|err| err.payload());
    envelope::sealed(&state.codec, payload)
}

/// POST /users/update - full-row update; password only changes when one is
/// supplied.
pub async fn update(Extension(state): Extension<AppState>, body: Bytes) -> Response {
    let payload = handle_update(&state, &body).unwrap_or_else(|err| err.payload());
    envelope::sealed(&state.codec, payload)
}

/// POST /users/delete - delete a user.
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
    let page = state.directory.list_users(&query);

    Ok(ResponsePayload::success(200)
        .with_message("")
        .with_data(json!({
            "users": page.rows,
            "totalCount": page.total_count,
            "role": session.role_id(),
        })))
}

fn handle_create(state: &AppState, body: &[u8]) -> Result<ResponsePayload, ApiError> {
    let payload: UserPayload = envelope::open_body(&state.codec, body)?;

    let (Some(name), Some(email), Some(mobile), Some(role)) = (
        required_str(&payload.name),
        required_str(&payload.email),
        required_str(&payload.mobile),
        required_id(payload.role),
    ) else {
        return Ok(ResponsePayload::error(400, "Missing required fields."));
    };

    if state.directory.count_users_by_email(email, None) > 0 {
        return Ok(email_exists());
    }
    if state.directory.count_users_by_mobile(mobile, None) > 0 {
        return Ok(mobile_exists());
    }

    let password_hash = hash_password(payload.password.as_deref().unwrap_or_default())?;
    let user_id = state.directory.create_user(NewUser {
        name: name.to_owned(),
        email: email.to_owned(),
        mobile: mobile.to_owned(),
        address: payload.address.clone(),
        pincode: payload.pincode.clone(),
        role_id: role,
        password_hash,
    });

    Ok(ResponsePayload::success(201)
        .with_message("User created successfully.")
        .with_data(json!({ "user_id": user_id })))
}

fn handle_get(state: &AppState, body: &[u8]) -> Result<ResponsePayload, ApiError> {
    let request: UserIdRequest = envelope::open_body(&state.codec, body)?;
    let Some(user_id) = required_id(request.user_id) else {
        return Ok(ResponsePayload::error(400, "User id required"));
    };

    Ok(match state.directory.find_user(user_id) {
        Some(user) => ResponsePayload::success(200)
            .with_message("User found")
            .with_data(json!(user)),
        None => user_not_found(),
    })
}

fn handle_update(state: &AppState, body: &[u8]) -> Result<ResponsePayload, ApiError> {
    let payload: UserPayload = envelope::open_body(&state.codec, body)?;

    let Some(user_id) = required_id(payload.user_id) else {
        return Ok(ResponsePayload::error(400, "User id required"));
    };
    let (Some(name), Some(email), Some(mobile), Some(role)) = (
        required_str(&payload.name),
        required_str(&payload.email),
        required_str(&payload.mobile),
        required_id(payload.role),
    ) else {
        return Ok(ResponsePayload::error(400, "Missing required fields."));
    };

    if state.directory.count_users_by_email(email, Some(user_id)) > 0 {
        return Ok(email_exists());
    }
    if state.directory.count_users_by_mobile(mobile, Some(user_id)) > 0 {
        return Ok(mobile_exists());
    }

    let password_hash = match required_str(&payload.password) {
        Some(plain) => Some(hash_password(plain)?),
        None => None,
    };

    // Affected rows are not part of the contract; updating a missing user
    // still reports success.
    state.directory.update_user(
        user_id,
        UserUpdate {
            name: name.to_owned(),
            email: email.to_owned(),
            mobile: mobile.to_owned(),
            address: payload.address.clone(),
            pincode: payload.pincode.clone(),
            role_id: role,
            password_hash,
        },
    );

    Ok(ResponsePayload::success(200)
        .with_message("User updated successfully.")
        .with_data(json!({ "user_id": user_id })))
}

fn handle_delete(state: &AppState, body: &[u8]) -> Result<ResponsePayload, ApiError> {
    let request: UserIdRequest = envelope::open_body(&state.codec, body)?;
    let Some(user_id) = required_id(request.user_id) else {
        return Ok(ResponsePayload::error(400, "User id required"));
    };

    Ok(if state.directory.delete_user(user_id) {
        ResponsePayload::success(200).with_message("User deleted successfully.")
    } else {
        user_not_found()
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared answers
// ─────────────────────────────────────────────────────────────────────────────

fn email_exists() -> ResponsePayload {
    ResponsePayload::new("email-exist", 200).with_message("Email already exists")
}

fn mobile_exists() -> ResponsePayload {
    ResponsePayload::new("mobile-exist", 200).with_message("Mobile already exists")
}

fn user_not_found() -> ResponsePayload {
    ResponsePayload::new("not-found", 404).with_message("User not found")
}

/// Bcrypt at the default cost; a hashing fault is a real 500.
pub(crate) fn hash_password(plain: &str) -> Result<String, ApiError> {
    bcrypt::hash(plain, bcrypt::DEFAULT_COST).map_err(|err| {
        tracing::error!(error = %err, "password hashing failed");
        ApiError::internal("Failed to hash password.")
    })
}
