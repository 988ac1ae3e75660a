//! Stored rows, query views, and write inputs.
//!
//! Views serialize with the exact key spelling the clients consume, which is
//! an inherited mix of camelCase aliases and raw column names (`userId` and
//! `roleName` next to `role_id`). The spelling is part of the wire contract;
//! do not tidy it.

use serde::{Deserialize, Serialize};

use rolegate_core::{ModuleId, RoleId, UserId};

// ─────────────────────────────────────────────────────────────────────────────
// Stored rows
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub address: Option<String>,
    pub pincode: Option<String>,
    pub role_id: RoleId,
    /// bcrypt hash, write-only: no view ever carries it out.
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRecord {
    pub id: RoleId,
    pub role_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRecord {
    pub id: ModuleId,
    pub name: String,
    pub route_slug: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Query views
// ─────────────────────────────────────────────────────────────────────────────

/// The login lookup row: user joined with its role and the role's modules.
///
/// Mirrors an inner join: a user whose role is gone, or whose role has no
/// module links, produces no row at all. `modules` is the `id:name:slug`
/// triples of the linked modules joined with commas, ordered by module id.
///
/// Deliberately not serializable: it carries the stored hash for the
/// password check, and the HTTP layer builds its own scrubbed view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginUser {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
    pub mobile: String,
    pub address: Option<String>,
    pub pincode: Option<String>,
    pub role_id: RoleId,
    pub role_name: String,
    pub password_hash: String,
    pub modules: String,
}

/// The `/profile` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileView {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    #[serde(rename = "userName")]
    pub user_name: String,
    pub email: String,
    pub mobile: String,
    /// Always `None`; the slot exists because clients expect the key.
    pub password: Option<String>,
    pub address: Option<String>,
    pub pincode: Option<String>,
    pub role_id: RoleId,
    #[serde(rename = "roleName")]
    pub role_name: String,
}

/// One row of the paged users list. `roles` is the user's role name, `None`
/// when the role row is missing (left-join semantics).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub address: Option<String>,
    pub pincode: Option<String>,
    pub roles: Option<String>,
}

/// The single-user fetch, every stored column with the hash blanked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDetail {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub address: Option<String>,
    pub pincode: Option<String>,
    pub role_id: RoleId,
    /// Always `None`.
    pub password: Option<String>,
}

/// One row of the paged roles list. `modules` is the linked module names
/// joined with ", " in name order, `None` when the role has no links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleSummary {
    pub id: RoleId,
    pub role_name: String,
    pub modules: Option<String>,
}

/// The single-role fetch. `modules` is the raw link ids in insertion order
/// (dangling links included); `selectedModules` is the ids of the linked
/// modules that still exist, ordered by module name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleDetail {
    pub id: RoleId,
    pub name: String,
    pub modules: Vec<ModuleId>,
    #[serde(rename = "selectedModules")]
    pub selected_modules: Vec<ModuleId>,
}

/// One `{id, name}` pair for the modules dropdown. Role dropdown rows reuse
/// the claims-side [`rolegate_auth::RoleOption`] shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleOption {
    pub id: ModuleId,
    pub name: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Write inputs
// ─────────────────────────────────────────────────────────────────────────────

/// A user to insert. The hash is produced by the caller; the directory never
/// sees a plaintext password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub address: Option<String>,
    pub pincode: Option<String>,
    pub role_id: RoleId,
    pub password_hash: String,
}

/// A full-row user update. `password_hash` of `None` keeps the stored hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub address: Option<String>,
    pub pincode: Option<String>,
    pub role_id: RoleId,
    pub password_hash: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// List queries and pages
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Search/sort/page parameters as the clients send them. Every field is
/// optional; the accessors apply the contractual defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    #[serde(rename = "sortColumn")]
    pub sort_column: Option<String>,
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<i64>,
    #[serde(rename = "pageNo")]
    pub page_no: Option<i64>,
}

impl ListQuery {
    /// Trimmed, lowercased needle; `None` when there is nothing to filter on.
    pub fn search_needle(&self) -> Option<String> {
        let needle = self.search.as_deref().unwrap_or("").trim().to_lowercase();
        if needle.is_empty() { None } else { Some(needle) }
    }

    /// Requested sort column, lowercased. Callers match it against their own
    /// allow-list and fall back to the default column on anything else.
    pub fn sort_column_normalized(&self) -> String {
        self.sort_column.as_deref().unwrap_or("").to_lowercase()
    }

    /// `ASC` unless the client asked for `DESC` (case-insensitive).
    pub fn order(&self) -> SortOrder {
        match self.sort_order.as_deref() {
            Some(order) if order.eq_ignore_ascii_case("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }

    /// Page size, default 10, floored at 1.
    pub fn effective_page_size(&self) -> i64 {
        self.page_size.unwrap_or(10).max(1)
    }

    /// Zero-based page number, default 0, floored at 0.
    pub fn effective_page_no(&self) -> i64 {
        self.page_no.unwrap_or(0).max(0)
    }
}

/// One page of rows plus the unpaged total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub total_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_accepts_the_camel_case_wire_shape() {
        let json = r#"{
            "search": " Joe ",
            "sortColumn": "Email",
            "sortOrder": "desc",
            "pageSize": 25,
            "pageNo": 2
        }"#;
        let query: ListQuery = serde_json::from_str(json).unwrap();
        assert_eq!(query.search_needle().as_deref(), Some("joe"));
        assert_eq!(query.sort_column_normalized(), "email");
        assert_eq!(query.order(), SortOrder::Desc);
        assert_eq!(query.effective_page_size(), 25);
        assert_eq!(query.effective_page_no(), 2);
    }

    #[test]
    fn list_query_defaults_apply_to_an_empty_body() {
        let query = ListQuery::default();
        assert_eq!(query.search_needle(), None);
        assert_eq!(query.order(), SortOrder::Asc);
        assert_eq!(query.effective_page_size(), 10);
        assert_eq!(query.effective_page_no(), 0);
    }

    #[test]
    fn page_size_is_floored_at_one_and_page_no_at_zero() {
        let query = ListQuery {
            page_size: Some(0),
            page_no: Some(-3),
            ..ListQuery::default()
        };
        assert_eq!(query.effective_page_size(), 1);
        assert_eq!(query.effective_page_no(), 0);
    }

    #[test]
    fn profile_view_serializes_the_inherited_key_mix() {
        let view = ProfileView {
            user_id: UserId::new(4),
            user_name: "Ada".into(),
            email: "ada@example.com".into(),
            mobile: "5550100".into(),
            password: None,
            address: None,
            pincode: Some("41001".into()),
            role_id: RoleId::new(2),
            role_name: "Staff".into(),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["userId"], 4);
        assert_eq!(json["userName"], "Ada");
        assert_eq!(json["role_id"], 2);
        assert_eq!(json["roleName"], "Staff");
        assert!(json["password"].is_null());
    }

    #[test]
    fn role_detail_uses_the_selected_modules_alias() {
        let detail = RoleDetail {
            id: RoleId::new(3),
            name: "Auditor".into(),
            modules: vec![ModuleId::new(9), ModuleId::new(2)],
            selected_modules: vec![ModuleId::new(2), ModuleId::new(9)],
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["modules"][0], 9);
        assert_eq!(json["selectedModules"][0], 2);
    }
}
