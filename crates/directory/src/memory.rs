//! In-memory [`Directory`] implementation.
//!
//! Plain `Vec` tables behind one `RwLock`. Insertion order is meaningful for
//! `role_modules` (the raw link order is part of the role-detail contract),
//! so rows are kept in arrival order and every ordering the views promise is
//! applied at query time. String comparisons are case-insensitive: searches
//! and duplicate checks treat `Admin` and `admin` as the same name.

use std::cmp::Ordering;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use rolegate_auth::RoleOption;
use rolegate_core::{ModuleId, RoleId, UserId};

use crate::port::Directory;
use crate::records::{
    ListQuery, LoginUser, ModuleOption, ModuleRecord, NewUser, Page, ProfileView, RoleDetail,
    RoleRecord, RoleSummary, SortOrder, UserDetail, UserRecord, UserSummary, UserUpdate,
};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<UserRecord>,
    roles: Vec<RoleRecord>,
    modules: Vec<ModuleRecord>,
    role_modules: Vec<(RoleId, ModuleId)>,
    next_user_id: i64,
    next_role_id: i64,
    next_module_id: i64,
}

#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    inner: RwLock<Tables>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Modules have no write route; they enter through seeding.
    pub fn insert_module(&self, name: &str, route_slug: &str) -> ModuleId {
        let mut t = self.tables_mut();
        t.next_module_id += 1;
        let id = ModuleId::new(t.next_module_id);
        t.modules.push(ModuleRecord {
            id,
            name: name.to_owned(),
            route_slug: route_slug.to_owned(),
        });
        id
    }

    // Writers never panic while holding the lock, so a poisoned guard still
    // wraps consistent tables.
    fn tables(&self) -> RwLockReadGuard<'_, Tables> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn tables_mut(&self) -> RwLockWriteGuard<'_, Tables> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Directory for InMemoryDirectory {
    fn find_login_user(&self, email: &str, admin_only: bool) -> Option<LoginUser> {
        let t = self.tables();
        let user = t.users.iter().find(|u| {
            u.email.eq_ignore_ascii_case(email)
                && (u.role_id.is_admin() == admin_only)
        })?;
        let role = t.roles.iter().find(|r| r.id == user.role_id)?;

        let mut linked: Vec<&ModuleRecord> = t
            .role_modules
            .iter()
            .filter(|(rid, _)| *rid == user.role_id)
            .filter_map(|(_, mid)| t.modules.iter().find(|m| m.id == *mid))
            .collect();
        // Inner-join semantics: a role without surviving module links yields
        // no login row at all.
        if linked.is_empty() {
            return None;
        }
        linked.sort_by_key(|m| m.id);
        let modules = linked
            .iter()
            .map(|m| format!("{}:{}:{}", m.id, m.name, m.route_slug))
            .collect::<Vec<_>>()
            .join(",");

        Some(LoginUser {
            user_id: user.id,
            user_name: user.name.clone(),
            email: user.email.clone(),
            mobile: user.mobile.clone(),
            address: user.address.clone(),
            pincode: user.pincode.clone(),
            role_id: user.role_id,
            role_name: role.role_name.clone(),
            password_hash: user.password_hash.clone(),
            modules,
        })
    }

    fn find_profile(&self, user_id: UserId) -> Option<ProfileView> {
        let t = self.tables();
        let user = t.users.iter().find(|u| u.id == user_id)?;
        let role = t.roles.iter().find(|r| r.id == user.role_id)?;
        Some(ProfileView {
            user_id: user.id,
            user_name: user.name.clone(),
            email: user.email.clone(),
            mobile: user.mobile.clone(),
            password: None,
            address: user.address.clone(),
            pincode: user.pincode.clone(),
            role_id: user.role_id,
            role_name: role.role_name.clone(),
        })
    }

    fn list_users(&self, query: &ListQuery) -> Page<UserSummary> {
        let t = self.tables();
        let needle = query.search_needle();
        let mut rows: Vec<UserSummary> = t
            .users
            .iter()
            .filter(|u| match needle.as_deref() {
                Some(n) => u.name.to_lowercase().contains(n),
                None => true,
            })
            .map(|u| UserSummary {
                id: u.id,
                name: u.name.clone(),
                email: u.email.clone(),
                mobile: u.mobile.clone(),
                address: u.address.clone(),
                pincode: u.pincode.clone(),
                roles: t
                    .roles
                    .iter()
                    .find(|r| r.id == u.role_id)
                    .map(|r| r.role_name.clone()),
            })
            .collect();
        drop(t);

        let order = query.order();
        let column = query.sort_column_normalized();
        rows.sort_by(|a, b| {
            let ord = match column.as_str() {
                "email" => cmp_ci(&a.email, &b.email),
                "mobile" => cmp_ci(&a.mobile, &b.mobile),
                "pincode" => cmp_opt_ci(&a.pincode, &b.pincode),
                "role" => cmp_opt_ci(&a.roles, &b.roles),
                // "name" and anything off the allow-list.
                _ => cmp_ci(&a.name, &b.name),
            };
            apply_order(ord, order)
        });

        slice_page(rows, query)
    }

    fn create_user(&self, user: NewUser) -> UserId {
        let mut t = self.tables_mut();
        t.next_user_id += 1;
        let id = UserId::new(t.next_user_id);
        t.users.push(UserRecord {
            id,
            name: user.name,
            email: user.email,
            mobile: user.mobile,
            address: user.address,
            pincode: user.pincode,
            role_id: user.role_id,
            password_hash: user.password_hash,
        });
        id
    }

    fn find_user(&self, user_id: UserId) -> Option<UserDetail> {
        let t = self.tables();
        let user = t.users.iter().find(|u| u.id == user_id)?;
        Some(UserDetail {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            mobile: user.mobile.clone(),
            address: user.address.clone(),
            pincode: user.pincode.clone(),
            role_id: user.role_id,
            password: None,
        })
    }

    fn update_user(&self, user_id: UserId, update: UserUpdate) -> bool {
        let mut t = self.tables_mut();
        let Some(user) = t.users.iter_mut().find(|u| u.id == user_id) else {
            return false;
        };
        user.name = update.name;
        user.email = update.email;
        user.mobile = update.mobile;
        user.address = update.address;
        user.pincode = update.pincode;
        user.role_id = update.role_id;
        if let Some(hash) = update.password_hash {
            user.password_hash = hash;
        }
        true
    }

    fn delete_user(&self, user_id: UserId) -> bool {
        let mut t = self.tables_mut();
        let before = t.users.len();
        t.users.retain(|u| u.id != user_id);
        t.users.len() != before
    }

    fn count_users_by_email(&self, email: &str, exclude: Option<UserId>) -> usize {
        let t = self.tables();
        t.users
            .iter()
            .filter(|u| u.email.eq_ignore_ascii_case(email) && exclude != Some(u.id))
            .count()
    }

    fn count_users_by_mobile(&self, mobile: &str, exclude: Option<UserId>) -> usize {
        let t = self.tables();
        t.users
            .iter()
            .filter(|u| u.mobile == mobile && exclude != Some(u.id))
            .count()
    }

    fn count_users_with_role(&self, role_id: RoleId) -> usize {
        let t = self.tables();
        t.users.iter().filter(|u| u.role_id == role_id).count()
    }

    fn list_roles(&self, query: &ListQuery) -> Page<RoleSummary> {
        let t = self.tables();
        let needle = query.search_needle();
        let mut rows: Vec<RoleSummary> = t
            .roles
            .iter()
            .filter(|r| match needle.as_deref() {
                Some(n) => r.role_name.to_lowercase().contains(n),
                None => true,
            })
            .map(|r| {
                let mut names: Vec<&str> = t
                    .role_modules
                    .iter()
                    .filter(|(rid, _)| *rid == r.id)
                    .filter_map(|(_, mid)| t.modules.iter().find(|m| m.id == *mid))
                    .map(|m| m.name.as_str())
                    .collect();
                names.sort_by(|a, b| cmp_ci(a, b));
                RoleSummary {
                    id: r.id,
                    role_name: r.role_name.clone(),
                    modules: if names.is_empty() {
                        None
                    } else {
                        Some(names.join(", "))
                    },
                }
            })
            .collect();
        drop(t);

        // The roles list sorts by name only.
        let order = query.order();
        rows.sort_by(|a, b| apply_order(cmp_ci(&a.role_name, &b.role_name), order));

        slice_page(rows, query)
    }

    fn role_dropdown(&self) -> Vec<RoleOption> {
        let t = self.tables();
        let mut roles: Vec<RoleOption> = t
            .roles
            .iter()
            .map(|r| RoleOption {
                id: r.id,
                role_name: r.role_name.clone(),
            })
            .collect();
        roles.sort_by(|a, b| cmp_ci(&a.role_name, &b.role_name));
        roles
    }

    fn create_role(&self, name: &str, module_ids: &[ModuleId]) -> RoleId {
        let mut t = self.tables_mut();
        t.next_role_id += 1;
        let id = RoleId::new(t.next_role_id);
        t.roles.push(RoleRecord {
            id,
            role_name: name.to_owned(),
        });
        for &module_id in module_ids {
            if !t.role_modules.contains(&(id, module_id)) {
                t.role_modules.push((id, module_id));
            }
        }
        id
    }

    fn find_role(&self, role_id: RoleId) -> Option<RoleDetail> {
        let t = self.tables();
        let role = t.roles.iter().find(|r| r.id == role_id)?;
        let modules: Vec<ModuleId> = t
            .role_modules
            .iter()
            .filter(|(rid, _)| *rid == role_id)
            .map(|(_, mid)| *mid)
            .collect();
        let mut selected: Vec<&ModuleRecord> = modules
            .iter()
            .filter_map(|mid| t.modules.iter().find(|m| m.id == *mid))
            .collect();
        selected.sort_by(|a, b| cmp_ci(&a.name, &b.name));
        Some(RoleDetail {
            id: role.id,
            name: role.role_name.clone(),
            modules,
            selected_modules: selected.into_iter().map(|m| m.id).collect(),
        })
    }

    fn update_role(
        &self,
        role_id: RoleId,
        name: &str,
        add: &[ModuleId],
        remove: &[ModuleId],
    ) -> bool {
        let mut t = self.tables_mut();
        let Some(index) = t.roles.iter().position(|r| r.id == role_id) else {
            return false;
        };
        t.roles[index].role_name = name.to_owned();
        for &module_id in add {
            if !t.role_modules.contains(&(role_id, module_id)) {
                t.role_modules.push((role_id, module_id));
            }
        }
        t.role_modules
            .retain(|(rid, mid)| *rid != role_id || !remove.contains(mid));
        true
    }

    fn delete_role(&self, role_id: RoleId) -> bool {
        let mut t = self.tables_mut();
        t.role_modules.retain(|(rid, _)| *rid != role_id);
        let before = t.roles.len();
        t.roles.retain(|r| r.id != role_id);
        t.roles.len() != before
    }

    fn count_roles_by_name(&self, name: &str, exclude: Option<RoleId>) -> usize {
        let t = self.tables();
        t.roles
            .iter()
            .filter(|r| r.role_name.eq_ignore_ascii_case(name) && exclude != Some(r.id))
            .count()
    }

    fn module_dropdown(&self) -> Vec<ModuleOption> {
        let t = self.tables();
        let mut modules: Vec<ModuleOption> = t
            .modules
            .iter()
            .map(|m| ModuleOption {
                id: m.id,
                name: m.name.clone(),
            })
            .collect();
        modules.sort_by(|a, b| cmp_ci(&a.name, &b.name));
        modules
    }

    fn role_module_ids(&self, role_id: RoleId) -> Vec<ModuleId> {
        let t = self.tables();
        let mut linked: Vec<&ModuleRecord> = t
            .role_modules
            .iter()
            .filter(|(rid, _)| *rid == role_id)
            .filter_map(|(_, mid)| t.modules.iter().find(|m| m.id == *mid))
            .collect();
        linked.sort_by(|a, b| cmp_ci(&a.name, &b.name));
        linked.into_iter().map(|m| m.id).collect()
    }
}

fn cmp_ci(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// `None` sorts first ascending, like SQL NULLs.
fn cmp_opt_ci(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => cmp_ci(a, b),
    }
}

fn apply_order(ord: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Asc => ord,
        SortOrder::Desc => ord.reverse(),
    }
}

/// Clamp the page number into range, then slice. The total is the unpaged
/// row count, so clients can render page controls from any page.
fn slice_page<T>(rows: Vec<T>, query: &ListQuery) -> Page<T> {
    let total_count = rows.len() as i64;
    let page_size = query.effective_page_size();
    let mut page_no = query.effective_page_no();

    let total_pages = (total_count + page_size - 1) / page_size;
    if total_pages > 0 && page_no >= total_pages {
        page_no = total_pages - 1;
    }

    let offset = (page_no * page_size) as usize;
    let rows = rows
        .into_iter()
        .skip(offset)
        .take(page_size as usize)
        .collect();
    Page { rows, total_count }
}
