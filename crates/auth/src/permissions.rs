use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are opaque `module.action` strings (e.g. "orders.decide").
/// The well-known ones used by the domain modules are associated constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    /// Browse the catalog.
    pub const CATALOG_READ: Permission = Permission::from_static("catalog.read");
    /// Add or edit catalog items.
    pub const CATALOG_WRITE: Permission = Permission::from_static("catalog.write");
    /// Remove catalog items.
    pub const CATALOG_DELETE: Permission = Permission::from_static("catalog.delete");
    /// Restore the seeded demo catalog.
    pub const CATALOG_RESET: Permission = Permission::from_static("catalog.reset");

    /// Place an order for oneself.
    pub const ORDERS_PLACE: Permission = Permission::from_static("orders.place");
    /// See every customer's orders.
    pub const ORDERS_READ_ALL: Permission = Permission::from_static("orders.read_all");
    /// Accept or decline pending orders.
    pub const ORDERS_DECIDE: Permission = Permission::from_static("orders.decide");
    /// Dispatch and mark orders delivered.
    pub const ORDERS_FULFIL: Permission = Permission::from_static("orders.fulfil");

    /// Open a support ticket.
    pub const TICKETS_OPEN: Permission = Permission::from_static("tickets.open");
    /// See every customer's tickets.
    pub const TICKETS_READ_ALL: Permission = Permission::from_static("tickets.read_all");
    /// Respond to and resolve tickets.
    pub const TICKETS_RESOLVE: Permission = Permission::from_static("tickets.resolve");

    /// Staff dashboard figures.
    pub const DASHBOARD_VIEW: Permission = Permission::from_static("dashboard.view");
    /// Manage staff accounts.
    pub const USERS_MANAGE: Permission = Permission::from_static("users.manage");

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
