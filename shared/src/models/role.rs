//! Role Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Principal role
///
/// Customers may only act on their own carts and orders; Manager and
/// Admin are elevated roles that may act on any order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    Customer,
    Manager,
    Admin,
}

impl Role {
    /// Elevated roles bypass the owner check on order operations
    pub fn is_elevated(self) -> bool {
        matches!(self, Role::Manager | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Customer => "CUSTOMER",
            Role::Manager => "MANAGER",
            Role::Admin => "ADMIN",
        };
        f.write_str(s)
    }
}
