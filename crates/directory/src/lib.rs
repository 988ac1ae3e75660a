//! `rolegate-directory` — the user/role/module store behind the API.
//!
//! The HTTP layer talks to storage exclusively through the [`Directory`]
//! port; [`InMemoryDirectory`] is the bundled implementation. Records carry
//! bcrypt hashes, never plaintext passwords, and no serializable view exposes
//! a stored hash ([`LoginUser`] carries one for the login check and stays off
//! the wire).

pub mod memory;
pub mod port;
pub mod records;

pub use memory::InMemoryDirectory;
pub use port::Directory;
pub use records::{
    ListQuery, LoginUser, ModuleOption, ModuleRecord, NewUser, Page, ProfileView, RoleDetail,
    RoleRecord, RoleSummary, SortOrder, UserDetail, UserRecord, UserSummary, UserUpdate,
};
