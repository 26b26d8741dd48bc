use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Staff,
    Student,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Admin, UserRole::Staff, UserRole::Student];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Staff => "STAFF",
            UserRole::Student => "STUDENT",
        }
    }

    /// Staff and admins run programs; students only take part in them.
    pub fn can_manage_programs(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Staff)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(UserRole::Admin),
            "STAFF" => Ok(UserRole::Staff),
            "STUDENT" => Ok(UserRole::Student),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub phone: Option<String>,
    pub image: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub image: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            image: user.image,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Public profile fields embedded in other payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_display() {
        assert_eq!(UserRole::Admin.to_string(), "ADMIN");
        assert_eq!(UserRole::Staff.to_string(), "STAFF");
        assert_eq!(UserRole::Student.to_string(), "STUDENT");
    }

    #[test]
    fn test_user_role_parse_is_case_insensitive() {
        assert_eq!("staff".parse::<UserRole>(), Ok(UserRole::Staff));
        assert!("mentor".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_only_staff_and_admin_manage_programs() {
        assert!(UserRole::Admin.can_manage_programs());
        assert!(UserRole::Staff.can_manage_programs());
        assert!(!UserRole::Student.can_manage_programs());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            name: "John Smith".into(),
            email: "student@example.com".into(),
            password_hash: Some("hash".into()),
            phone: None,
            image: None,
            role: UserRole::Student,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "STUDENT");
    }
}
