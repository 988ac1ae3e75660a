//! Request DTOs decrypted out of request envelopes, and the login response
//! view.
//!
//! Every request DTO is `Default` because an absent body decodes to the
//! default value and falls through to the handler's required-field checks.
//! Field names follow the wire contract the clients already speak
//! (camelCase keys next to raw column names; see the directory records for
//! the same inherited mix).

use serde::{Deserialize, Serialize};

use rolegate_auth::RoleOption;
use rolegate_core::{ModuleId, RoleId, UserId};

// ─────────────────────────────────────────────────────────────────────────────
// Auth
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Which client surface is logging in. `"/admin"` selects the
    /// privileged-role lookup; anything else the app lookup.
    #[serde(rename = "type")]
    pub surface: Option<String>,
}

impl LoginRequest {
    pub fn wants_admin(&self) -> bool {
        self.surface.as_deref() == Some("/admin")
    }
}

/// The `user` object inside a successful login response: the directory's
/// login row with the hash scrubbed, plus the dropdown roles and the role's
/// module ids, exactly as clients consume them.
#[derive(Debug, Serialize)]
pub struct LoginUserView {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    #[serde(rename = "userName")]
    pub user_name: String,
    pub email: String,
    pub mobile: String,
    /// Always `None`; the key stays on the wire.
    pub password: Option<String>,
    pub address: Option<String>,
    pub pincode: Option<String>,
    pub role_id: RoleId,
    #[serde(rename = "roleName")]
    pub role_name: String,
    /// The stored `id:name:slug` string, unflattened.
    pub modules: String,
    pub roles: Vec<RoleOption>,
    #[serde(rename = "roleModules")]
    pub role_modules: Vec<ModuleId>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

/// Body of `/users/add` and `/users/update`. `userId` only matters for
/// updates; `role` is the assigned role id.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserPayload {
    #[serde(rename = "userId")]
    pub user_id: Option<UserId>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub pincode: Option<String>,
    pub role: Option<RoleId>,
    pub password: Option<String>,
}

/// Body of `/users/get` and `/users/delete`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserIdRequest {
    #[serde(rename = "userId")]
    pub user_id: Option<UserId>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Roles
// ─────────────────────────────────────────────────────────────────────────────

/// Body of `/roles/add` and `/roles/update`. On update, `modules` are links
/// to add and `deletedModules` links to drop.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RolePayload {
    #[serde(rename = "roleId")]
    pub role_id: Option<RoleId>,
    pub name: Option<String>,
    pub modules: Vec<ModuleId>,
    #[serde(rename = "deletedModules")]
    pub deleted_modules: Vec<ModuleId>,
}

/// Body of `/roles/get` and `/roles/delete`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RoleIdRequest {
    #[serde(rename = "roleId")]
    pub role_id: Option<RoleId>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Field checks
// ─────────────────────────────────────────────────────────────────────────────

/// A string field that must be present and non-empty.
pub fn required_str(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// An id field that must be present and non-zero (zero is the unset marker).
pub fn required_id<T: Copy + Into<i64>>(value: Option<T>) -> Option<T> {
    value.filter(|id| (*id).into() != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_request_reads_the_type_key() {
        let request: LoginRequest =
            serde_json::from_str(r#"{"email":"a@b.com","password":"x","type":"/admin"}"#)
                .unwrap();
        assert!(request.wants_admin());

        let request: LoginRequest =
            serde_json::from_str(r#"{"email":"a@b.com","password":"x","type":"/app"}"#).unwrap();
        assert!(!request.wants_admin());
    }

    #[test]
    fn missing_fields_default_instead_of_failing() {
        let request: LoginRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.email, "");
        assert!(request.surface.is_none());

        let payload: UserPayload = serde_json::from_str(r#"{"name":"Ada"}"#).unwrap();
        assert_eq!(payload.name.as_deref(), Some("Ada"));
        assert!(payload.role.is_none());
    }

    #[test]
    fn required_checks_reject_empty_and_zero() {
        assert_eq!(required_str(&Some("x".into())), Some("x"));
        assert_eq!(required_str(&Some(String::new())), None);
        assert_eq!(required_str(&None), None);

        assert_eq!(required_id(Some(RoleId::new(2))), Some(RoleId::new(2)));
        assert_eq!(required_id(Some(RoleId::new(0))), None);
        assert_eq!(required_id::<RoleId>(None), None);
    }

    #[test]
    fn login_user_view_uses_the_wire_keys() {
        let view = LoginUserView {
            user_id: UserId::new(1),
            user_name: "Ada".into(),
            email: "ada@example.com".into(),
            mobile: "111".into(),
            password: None,
            address: None,
            pincode: None,
            role_id: RoleId::ADMIN,
            role_name: "Admin".into(),
            modules: "1:Users:users".into(),
            roles: vec![],
            role_modules: vec![ModuleId::new(1)],
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["userId"], 1);
        assert_eq!(json["userName"], "Ada");
        assert_eq!(json["password"], serde_json::Value::Null);
        assert_eq!(json["roleName"], "Admin");
        assert_eq!(json["roleModules"], serde_json::json!([1]));
    }
}
