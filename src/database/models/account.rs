use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Staff role taxonomy. The derived ordering is the authorization order:
/// `standard < admin < super-admin`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "kebab-case")]
#[sqlx(type_name = "account_role", rename_all = "kebab-case")]
pub enum Role {
    Standard,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Whether this role meets the given minimum requirement
    pub fn satisfies(self, min: Role) -> bool {
        self >= min
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Standard => "standard",
            Role::Admin => "admin",
            Role::SuperAdmin => "super-admin",
        };
        write!(f, "{}", s)
    }
}

/// Staff account row. Accounts are deactivated, never physically deleted.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_ordering_matches_privilege() {
        assert!(Role::Standard < Role::Admin);
        assert!(Role::Admin < Role::SuperAdmin);
    }

    #[test]
    fn admin_satisfies_admin_but_not_super_admin() {
        assert!(Role::Admin.satisfies(Role::Admin));
        assert!(Role::SuperAdmin.satisfies(Role::Admin));
        assert!(!Role::Standard.satisfies(Role::Admin));
        assert!(!Role::Admin.satisfies(Role::SuperAdmin));
        assert!(Role::SuperAdmin.satisfies(Role::SuperAdmin));
    }

    #[test]
    fn role_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_value(Role::SuperAdmin).unwrap(),
            serde_json::json!("super-admin")
        );
        assert_eq!(
            serde_json::from_value::<Role>(serde_json::json!("admin")).unwrap(),
            Role::Admin
        );
    }
}
