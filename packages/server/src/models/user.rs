use chrono::{DateTime, Utc};
use common::Role;
use serde::{Deserialize, Serialize};

use super::auth::{validate_credentials, validate_password};
use super::shared::{Pagination, double_option};
use crate::error::AppError;
use crate::extractors::json::Validate;

/// Admin-side account creation. Unlike registration, any role is allowed.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "coordinator_ku")]
    pub username: String,
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
    #[schema(example = "university")]
    pub role: Role,
    #[schema(example = 1)]
    pub university_id: Option<i32>,
    #[schema(example = json!(null))]
    pub college_id: Option<i32>,
}

impl Validate for CreateUserRequest {
    fn validate(&self) -> Result<(), AppError> {
        validate_credentials(&self.username, &self.password)
    }
}

/// Partial update of an account. The role cannot be changed.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    pub password: Option<String>,
    /// `null` clears the university.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub university_id: Option<Option<i32>>,
    /// `null` clears the college.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub college_id: Option<Option<i32>>,
}

impl Validate for UpdateUserRequest {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(ref password) = self.password {
            validate_password(password)?;
        }
        Ok(())
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "coordinator_ku")]
    pub username: String,
    pub role: Role,
    #[schema(example = "College Program Officer")]
    pub role_label: &'static str,
    pub university_id: Option<i32>,
    pub college_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::user::Model> for UserResponse {
    fn from(m: crate::entity::user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            role: m.role,
            role_label: m.role.display_name(),
            university_id: m.university_id,
            college_id: m.college_id,
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserListResponse {
    pub data: Vec<UserResponse>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    #[param(example = 1)]
    pub page: Option<u64>,
    #[param(example = 20)]
    pub per_page: Option<u64>,
    /// Case-insensitive username search.
    pub search: Option<String>,
    pub role: Option<Role>,
    pub university_id: Option<i32>,
    pub college_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_rejects_role_field() {
        let result: Result<UpdateUserRequest, _> =
            serde_json::from_str(r#"{"role": "admin"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_distinguishes_null_from_absent() {
        let req: UpdateUserRequest = serde_json::from_str(r#"{"college_id": null}"#).unwrap();
        assert_eq!(req.college_id, Some(None));
        assert_eq!(req.university_id, None);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_short_password_rejected_on_update() {
        let req: UpdateUserRequest = serde_json::from_str(r#"{"password": "short"}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_user_allows_admin() {
        let req = CreateUserRequest {
            username: "second_admin".into(),
            password: "password123".into(),
            role: Role::Admin,
            university_id: None,
            college_id: None,
        };
        assert!(req.validate().is_ok());
    }
}
