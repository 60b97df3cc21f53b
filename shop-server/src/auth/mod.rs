//! Authorization
//!
//! Explicit principal threading: every mutating order operation receives
//! the acting principal as an argument and checks it against the order's
//! owner before touching state. No ambient current-user context.

use crate::utils::{AppError, AppResult};
use shared::models::Role;

/// The acting user for a service call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub role: Role,
}

impl Principal {
    pub fn customer(user_id: i64) -> Self {
        Self {
            user_id,
            role: Role::Customer,
        }
    }

    pub fn manager(user_id: i64) -> Self {
        Self {
            user_id,
            role: Role::Manager,
        }
    }

    pub fn admin(user_id: i64) -> Self {
        Self {
            user_id,
            role: Role::Admin,
        }
    }
}

/// Order access policy: the owner may act on their own orders, elevated
/// roles (manager/admin) may act on any order.
pub fn ensure_order_access(principal: Principal, owner_id: i64) -> AppResult<()> {
    if principal.user_id == owner_id || principal.role.is_elevated() {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "user {} may not act on an order owned by user {}",
            principal.user_id, owner_id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_is_allowed() {
        assert!(ensure_order_access(Principal::customer(7), 7).is_ok());
    }

    #[test]
    fn stranger_is_denied() {
        let err = ensure_order_access(Principal::customer(8), 7).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn elevated_roles_bypass_ownership() {
        assert!(ensure_order_access(Principal::admin(999), 7).is_ok());
        assert!(ensure_order_access(Principal::manager(999), 7).is_ok());
    }
}
