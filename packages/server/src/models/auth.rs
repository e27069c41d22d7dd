use common::Role;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::extractors::json::Validate;

/// Request body for user registration.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    /// Unique username (1-32 chars, alphanumeric and underscores).
    #[schema(example = "po_stjosephs")]
    pub username: String,
    /// Password (8-128 characters).
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
    /// Any role except `admin`.
    #[schema(example = "college_po")]
    pub role: Role,
    /// Required for `university` users. Derived from the college when omitted by college staff.
    #[schema(example = json!(null))]
    pub university_id: Option<i32>,
    /// Required for `college_po` and `college_vs` users.
    #[schema(example = 3)]
    pub college_id: Option<i32>,
}

/// Shared username and password rules for every account write.
pub fn validate_credentials(username: &str, password: &str) -> Result<(), AppError> {
    let username = username.trim();
    if username.is_empty() || username.chars().count() > 32 {
        return Err(AppError::Validation(
            "Username must be 1-32 characters".into(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(AppError::Validation(
            "Username must contain only letters, digits, and underscores".into(),
        ));
    }
    validate_password(password)
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < 8 || password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be 8-128 characters".into(),
        ));
    }
    Ok(())
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), AppError> {
        validate_credentials(&self.username, &self.password)?;
        if self.role == Role::Admin {
            return Err(AppError::Validation(
                "Admin accounts cannot be self-registered".into(),
            ));
        }
        Ok(())
    }
}

/// Request body for user login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "po_stjosephs")]
    pub username: String,
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.username.trim().is_empty() {
            return Err(AppError::Validation("Username must not be empty".into()));
        }
        if self.password.is_empty() {
            return Err(AppError::Validation("Password must not be empty".into()));
        }
        Ok(())
    }
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// JWT bearer token.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    #[schema(example = 42)]
    pub user_id: i32,
    #[schema(example = "po_stjosephs")]
    pub username: String,
    #[schema(example = "college_po")]
    pub role: Role,
    /// Permissions granted to the user's role.
    #[schema(example = json!(["volunteer:manage", "event:manage"]))]
    pub permissions: Vec<String>,
}

/// Current authenticated user's profile.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "po_stjosephs")]
    pub username: String,
    #[schema(example = "college_po")]
    pub role: Role,
    #[schema(example = 1)]
    pub university_id: Option<i32>,
    #[schema(example = 3)]
    pub college_id: Option<i32>,
    #[schema(example = json!(["volunteer:manage", "event:manage"]))]
    pub permissions: Vec<String>,
    /// Ids of every college this user may read and write, ascending.
    #[schema(example = json!([3]))]
    pub accessible_college_ids: Vec<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, password: &str, role: Role) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            password: password.into(),
            role,
            university_id: None,
            college_id: Some(1),
        }
    }

    #[test]
    fn test_register_accepts_staff_roles() {
        for role in [Role::University, Role::CollegePo, Role::CollegeVs] {
            assert!(register("vs_unit4", "password123", role).validate().is_ok());
        }
    }

    #[test]
    fn test_register_rejects_admin() {
        let err = register("root", "password123", Role::Admin)
            .validate()
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_register_username_rules() {
        assert!(register("", "password123", Role::CollegeVs).validate().is_err());
        assert!(register("has space", "password123", Role::CollegeVs).validate().is_err());
        assert!(register(&"a".repeat(33), "password123", Role::CollegeVs).validate().is_err());
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"x".repeat(129)).is_err());
        assert!(validate_password("exactly8").is_ok());
    }
}
