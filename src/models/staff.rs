//! Staff model and roles.

use serde::{Deserialize, Serialize};

/// Access level of a staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full access, including configuration.
    Admin,
    /// Back-office access: registers, products, staff attendance.
    Manager,
    /// Front-of-house: sales and own attendance.
    Employee,
}

impl Role {
    /// Returns true for roles allowed on back-office endpoints.
    ///
    /// ```
    /// use bakery_pos::models::Role;
    ///
    /// assert!(Role::Manager.is_manager());
    /// assert!(!Role::Employee.is_manager());
    /// ```
    pub fn is_manager(self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "ADMIN"),
            Role::Manager => write!(f, "MANAGER"),
            Role::Employee => write!(f, "EMPLOYEE"),
        }
    }
}

/// A person who can sign in and clock in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    /// Unique identifier for the staff member.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Access level.
    pub role: Role,
    /// Disabled accounts cannot sign in or be clocked in.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(serde_json::to_string(&Role::Manager).unwrap(), "\"MANAGER\"");
        assert_eq!(serde_json::to_string(&Role::Employee).unwrap(), "\"EMPLOYEE\"");
    }

    #[test]
    fn test_only_admin_and_manager_are_managers() {
        assert!(Role::Admin.is_manager());
        assert!(Role::Manager.is_manager());
        assert!(!Role::Employee.is_manager());
    }

    #[test]
    fn test_staff_member_defaults_to_active() {
        let json = r#"{"id": "emp_001", "name": "Ana", "role": "EMPLOYEE"}"#;
        let member: StaffMember = serde_json::from_str(json).unwrap();
        assert!(member.active);
        assert_eq!(member.role, Role::Employee);
    }
}
