//! View scopes for interview stores.

use serde::{Deserialize, Serialize};

use crate::interview::UserId;

/// Identifies what a store currently represents: the user's own schedule, or
/// a delegated read-only view of another user's schedule.
///
/// The scope is the confidentiality boundary of the shared event stream:
/// every incoming change is checked against it before any mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewScope {
    /// The viewing user's own schedule.
    Own,
    /// Another user's schedule, visible through an access grant.
    Delegated(UserId),
}

impl ViewScope {
    /// Whether a record owned by `owner` is visible under this scope for the
    /// given viewing user.
    pub fn accepts(&self, owner: UserId, self_user_id: UserId) -> bool {
        match self {
            ViewScope::Own => owner == self_user_id,
            ViewScope::Delegated(target) => owner == *target,
        }
    }

    pub fn target(&self, self_user_id: UserId) -> UserId {
        match self {
            ViewScope::Own => self_user_id,
            ViewScope::Delegated(target) => *target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_own_scope_accepts_only_self() {
        assert!(ViewScope::Own.accepts(7, 7));
        assert!(!ViewScope::Own.accepts(8, 7));
    }

    #[test]
    fn test_delegated_scope_accepts_only_target() {
        let scope = ViewScope::Delegated(7);
        assert!(scope.accepts(7, 9));
        assert!(!scope.accepts(9, 9));
        assert!(!scope.accepts(3, 9));
    }
}
