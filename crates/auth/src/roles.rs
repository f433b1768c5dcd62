use serde::{Deserialize, Serialize};

use crate::Permission;

/// A user's single role.
///
/// Roles are a flat tag: no role inherits from another, each maps to its own
/// fixed permission set.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Employee,
    Customer,
}

const ADMIN_PERMISSIONS: &[Permission] = &[
    Permission::CATALOG_READ,
    Permission::CATALOG_WRITE,
    Permission::CATALOG_DELETE,
    Permission::CATALOG_RESET,
    Permission::ORDERS_READ_ALL,
    Permission::ORDERS_DECIDE,
    Permission::ORDERS_FULFIL,
    Permission::TICKETS_READ_ALL,
    Permission::TICKETS_RESOLVE,
    Permission::DASHBOARD_VIEW,
    Permission::USERS_MANAGE,
];

const EMPLOYEE_PERMISSIONS: &[Permission] = &[
    Permission::CATALOG_READ,
    Permission::CATALOG_WRITE,
    Permission::ORDERS_READ_ALL,
    Permission::ORDERS_DECIDE,
    Permission::ORDERS_FULFIL,
    Permission::TICKETS_READ_ALL,
    Permission::TICKETS_RESOLVE,
    Permission::DASHBOARD_VIEW,
];

const CUSTOMER_PERMISSIONS: &[Permission] = &[
    Permission::CATALOG_READ,
    Permission::ORDERS_PLACE,
    Permission::TICKETS_OPEN,
];

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Employee, Role::Customer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Employee => "EMPLOYEE",
            Role::Customer => "CUSTOMER",
        }
    }

    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            Role::Admin => ADMIN_PERMISSIONS,
            Role::Employee => EMPLOYEE_PERMISSIONS,
            Role::Customer => CUSTOMER_PERMISSIONS,
        }
    }

    pub fn grants(&self, permission: &Permission) -> bool {
        self.permissions().contains(permission)
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Employee)
    }

    /// Navigation entries visible to this role, in display order.
    pub fn navigation(&self) -> Vec<NavTab> {
        NavTab::ALL
            .into_iter()
            .filter(|tab| tab.visible_to(*self))
            .collect()
    }

    /// Tab shown right after sign-in or session restore.
    pub fn landing_tab(&self) -> NavTab {
        match self {
            Role::Customer => NavTab::Store,
            Role::Admin | Role::Employee => NavTab::Dashboard,
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "EMPLOYEE" => Ok(Role::Employee),
            "CUSTOMER" => Ok(Role::Customer),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// Top-level navigation entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavTab {
    Dashboard,
    Store,
    Inventory,
    Orders,
    Employees,
    Support,
}

impl NavTab {
    pub const ALL: [NavTab; 6] = [
        NavTab::Dashboard,
        NavTab::Store,
        NavTab::Inventory,
        NavTab::Orders,
        NavTab::Employees,
        NavTab::Support,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            NavTab::Dashboard => "Dashboard",
            NavTab::Store => "Store",
            NavTab::Inventory => "Inventory",
            NavTab::Orders => "Orders",
            NavTab::Employees => "Employees",
            NavTab::Support => "Support",
        }
    }

    pub fn visible_to(&self, role: Role) -> bool {
        match self {
            NavTab::Dashboard | NavTab::Inventory => role.is_staff(),
            NavTab::Store => role == Role::Customer,
            NavTab::Employees => role == Role::Admin,
            NavTab::Orders | NavTab::Support => true,
        }
    }
}
