use serde::{Deserialize, Serialize};

use medimart_core::UserId;

use crate::Role;

/// The acting user behind a command: who they are and which role they hold.
///
/// Every mutating operation takes a principal so role checks happen inside
/// the domain modules, not only in whatever UI drives them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,
    pub role: Role,
}

impl Principal {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}
