//! User account model

use serde::{Deserialize, Serialize};

/// Account role, gating operation access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Employee,
    Manager,
    HrAdmin,
    Executive,
}

impl Default for UserRole {
    fn default() -> Self {
        Self::Employee
    }
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "EMPLOYEE",
            Self::Manager => "MANAGER",
            Self::HrAdmin => "HR_ADMIN",
            Self::Executive => "EXECUTIVE",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User account row (internal, carries the password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    /// Linked employee profile, if any
    pub employee_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// User response (without password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: i64,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    pub employee_id: Option<i64>,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            is_active: user.is_active,
            employee_id: user.employee_id,
        }
    }
}

/// Login payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response: access + refresh token pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub token_type: String,
}

/// Refresh payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Refresh response: new access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    pub access: String,
}

/// Password change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(
            serde_json::to_string(&UserRole::HrAdmin).expect("serialize"),
            "\"HR_ADMIN\""
        );
        let role: UserRole = serde_json::from_str("\"EXECUTIVE\"").expect("deserialize");
        assert_eq!(role, UserRole::Executive);
    }

    #[test]
    fn test_role_as_str() {
        assert_eq!(UserRole::Employee.as_str(), "EMPLOYEE");
        assert_eq!(UserRole::Manager.as_str(), "MANAGER");
        assert_eq!(UserRole::HrAdmin.as_str(), "HR_ADMIN");
        assert_eq!(UserRole::Executive.as_str(), "EXECUTIVE");
    }
}
