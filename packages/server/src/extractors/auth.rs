use axum::{extract::FromRequestParts, http::request::Parts};
use common::{AccessScope, Role, UserContext};
use sea_orm::EntityTrait;

use crate::entity::user;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Authenticated user extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication.
/// Permission checks happen via `require_permission()` in the handler body;
/// record visibility via [`AuthUser::scope`].
///
/// Permissions come from the token. Role, university and college are read
/// from the stored user on every request, so affiliation changes and deleted
/// colleges take effect immediately.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
    pub role: Role,
    pub university_id: Option<i32>,
    pub college_id: Option<i32>,
    pub permissions: Vec<String>,
}

impl AuthUser {
    /// Returns `Ok(())` if the user has the given permission, `Err(PermissionDenied)` otherwise.
    pub fn require_permission(&self, permission: &str) -> Result<(), AppError> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    pub fn context(&self) -> UserContext {
        UserContext {
            role: self.role,
            university: self.university_id,
            college: self.college_id,
        }
    }

    /// Colleges this user may read and write.
    pub fn scope(&self) -> AccessScope {
        AccessScope::for_user(&self.context())
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let claims =
            jwt::verify(token, &state.config.auth.jwt_secret).map_err(|_| AppError::TokenInvalid)?;

        let stored = user::Entity::find_by_id(claims.uid)
            .one(&state.db)
            .await?
            .ok_or(AppError::TokenInvalid)?;

        Ok(AuthUser {
            user_id: stored.id,
            username: stored.username,
            role: stored.role,
            university_id: stored.university_id,
            college_id: stored.college_id,
            permissions: claims.permissions,
        })
    }
}
