//! The storage port.
//!
//! Handlers depend on this trait alone, so the in-memory engine and any
//! future SQL-backed one are interchangeable. Methods are deliberately
//! primitive reads and writes; business rules (uniqueness, undeletable
//! roles) are decided by the caller from `count_*` lookups.

use std::sync::Arc;

use rolegate_auth::RoleOption;
use rolegate_core::{ModuleId, RoleId, UserId};

use crate::records::{
    ListQuery, LoginUser, ModuleOption, NewUser, Page, ProfileView, RoleDetail, RoleSummary,
    UserDetail, UserSummary, UserUpdate,
};

pub trait Directory: Send + Sync {
    // ── login ────────────────────────────────────────────────────────────

    /// Look up a login candidate by email (case-insensitive). `admin_only`
    /// restricts the match to the administrator role; otherwise the
    /// administrator role is excluded. Returns `None` when there is no such
    /// user, the user's role is gone, or the role has no module links.
    fn find_login_user(&self, email: &str, admin_only: bool) -> Option<LoginUser>;

    /// Profile row for a session's user id; `None` when the user or its
    /// role is gone.
    fn find_profile(&self, user_id: UserId) -> Option<ProfileView>;

    // ── users ────────────────────────────────────────────────────────────

    fn list_users(&self, query: &ListQuery) -> Page<UserSummary>;
    fn create_user(&self, user: NewUser) -> UserId;
    fn find_user(&self, user_id: UserId) -> Option<UserDetail>;
    /// Returns whether the row existed.
    fn update_user(&self, user_id: UserId, update: UserUpdate) -> bool;
    /// Returns whether the row existed.
    fn delete_user(&self, user_id: UserId) -> bool;
    /// Case-insensitive email match, optionally excluding one user id.
    fn count_users_by_email(&self, email: &str, exclude: Option<UserId>) -> usize;
    /// Exact mobile match, optionally excluding one user id.
    fn count_users_by_mobile(&self, mobile: &str, exclude: Option<UserId>) -> usize;
    fn count_users_with_role(&self, role_id: RoleId) -> usize;

    // ── roles ────────────────────────────────────────────────────────────

    fn list_roles(&self, query: &ListQuery) -> Page<RoleSummary>;
    /// All roles ordered by name, for dropdowns and session claims.
    fn role_dropdown(&self) -> Vec<RoleOption>;
    fn create_role(&self, name: &str, module_ids: &[ModuleId]) -> RoleId;
    fn find_role(&self, role_id: RoleId) -> Option<RoleDetail>;
    /// Rename and adjust module links in one step. Returns whether the role
    /// existed; links are untouched when it did not.
    fn update_role(
        &self,
        role_id: RoleId,
        name: &str,
        add: &[ModuleId],
        remove: &[ModuleId],
    ) -> bool;
    /// Removes the role and its module links. Returns whether it existed.
    fn delete_role(&self, role_id: RoleId) -> bool;
    /// Case-insensitive role-name match, optionally excluding one role id.
    fn count_roles_by_name(&self, name: &str, exclude: Option<RoleId>) -> usize;

    // ── modules ──────────────────────────────────────────────────────────

    /// All modules ordered by name.
    fn module_dropdown(&self) -> Vec<ModuleOption>;
    /// Ids of the modules linked to `role_id`, ordered by module name.
    fn role_module_ids(&self, role_id: RoleId) -> Vec<ModuleId>;
}

impl<S> Directory for Arc<S>
where
    S: Directory + ?Sized,
{
    fn find_login_user(&self, email: &str, admin_only: bool) -> Option<LoginUser> {
        (**self).find_login_user(email, admin_only)
    }

    fn find_profile(&self, user_id: UserId) -> Option<ProfileView> {
        (**self).find_profile(user_id)
    }

    fn list_users(&self, query: &ListQuery) -> Page<UserSummary> {
        (**self).list_users(query)
    }

    fn create_user(&self, user: NewUser) -> UserId {
        (**self).create_user(user)
    }

    fn find_user(&self, user_id: UserId) -> Option<UserDetail> {
        (**self).find_user(user_id)
    }

    fn update_user(&self, user_id: UserId, update: UserUpdate) -> bool {
        (**self).update_user(user_id, update)
    }

    fn delete_user(&self, user_id: UserId) -> bool {
        (**self).delete_user(user_id)
    }

    fn count_users_by_email(&self, email: &str, exclude: Option<UserId>) -> usize {
        (**self).count_users_by_email(email, exclude)
    }

    fn count_users_by_mobile(&self, mobile: &str, exclude: Option<UserId>) -> usize {
        (**self).count_users_by_mobile(mobile, exclude)
    }

    fn count_users_with_role(&self, role_id: RoleId) -> usize {
        (**self).count_users_with_role(role_id)
    }

    fn list_roles(&self, query: &ListQuery) -> Page<RoleSummary> {
        (**self).list_roles(query)
    }

    fn role_dropdown(&self) -> Vec<RoleOption> {
        (**self).role_dropdown()
    }

    fn create_role(&self, name: &str, module_ids: &[ModuleId]) -> RoleId {
        (**self).create_role(name, module_ids)
    }

    fn find_role(&self, role_id: RoleId) -> Option<RoleDetail> {
        (**self).find_role(role_id)
    }

    fn update_role(
        &self,
        role_id: RoleId,
        name: &str,
        add: &[ModuleId],
        remove: &[ModuleId],
    ) -> bool {
        (**self).update_role(role_id, name, add, remove)
    }

    fn delete_role(&self, role_id: RoleId) -> bool {
        (**self).delete_role(role_id)
    }

    fn count_roles_by_name(&self, name: &str, exclude: Option<RoleId>) -> usize {
        (**self).count_roles_by_name(name, exclude)
    }

    fn module_dropdown(&self) -> Vec<ModuleOption> {
        (**self).module_dropdown()
    }

    fn role_module_ids(&self, role_id: RoleId) -> Vec<ModuleId> {
        (**self).role_module_ids(role_id)
    }
}
