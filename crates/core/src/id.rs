//! Strongly-typed identifiers used across the API.
//!
//! The directory keys its rows by auto-increment integers and the session
//! token carries those integers verbatim, so the newtypes wrap `i64` rather
//! than a UUID.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Identifier of a user row.
#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(i64);

/// Identifier of a role (a named bundle of module permissions).
#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoleId(i64);

/// Identifier of a module (a permission unit grantable to a role).
#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ModuleId(i64);

macro_rules! impl_int_newtype {
    ($t:ty) => {
        impl $t {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = core::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<i64>().map(Self)
            }
        }
    };
}

impl_int_newtype!(UserId);
impl_int_newtype!(RoleId);
impl_int_newtype!(ModuleId);

impl RoleId {
    /// The privileged administrator role. Its members log in through the
    /// `/admin` surface and their module routes are prefixed accordingly.
    pub const ADMIN: RoleId = RoleId(1);

    pub fn is_admin(&self) -> bool {
        *self == Self::ADMIN
    }
}

impl ModuleId {
    /// Module id `0` means "no module gate requested" and always passes the
    /// access check.
    pub const NONE: ModuleId = ModuleId(0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_serde_as_bare_integers() {
        let id = UserId::new(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");
        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn admin_role_is_id_one() {
        assert!(RoleId::new(1).is_admin());
        assert!(!RoleId::new(2).is_admin());
    }

    #[test]
    fn ids_parse_from_strings() {
        assert_eq!("7".parse::<ModuleId>().unwrap(), ModuleId::new(7));
        assert!("seven".parse::<ModuleId>().is_err());
    }
}
