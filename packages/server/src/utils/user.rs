use common::{CollegeRef, Role, UserAffiliation};
use sea_orm::*;

use crate::entity::{college, role_permission, university, user};
use crate::error::AppError;
use crate::utils::hash;

/// Resolve and validate the affiliation of a user about to be written.
///
/// Looks up the referenced university and college, runs the role/affiliation
/// checks, then fills in the university of college staff from their college.
pub async fn prepare_affiliation<C: ConnectionTrait>(
    db: &C,
    role: Role,
    university_id: Option<i32>,
    college_id: Option<i32>,
) -> Result<UserAffiliation, AppError> {
    if let Some(id) = university_id {
        university::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::Validation(format!("University {id} does not exist")))?;
    }

    let college = match college_id {
        Some(id) => {
            let model = college::Entity::find_by_id(id)
                .one(db)
                .await?
                .ok_or_else(|| AppError::Validation(format!("College {id} does not exist")))?;
            Some(CollegeRef {
                id: model.id,
                university: model.university_id,
            })
        }
        None => None,
    };

    let affiliation = UserAffiliation {
        role,
        university: university_id,
        college,
    }
    .prepare_for_save()?;

    Ok(affiliation)
}

/// Hash the password and insert a user with an already prepared affiliation.
pub async fn insert_user<C: ConnectionTrait>(
    db: &C,
    username: &str,
    password: &str,
    affiliation: UserAffiliation,
) -> Result<user::Model, AppError> {
    let hash = hash::hash_password(password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;

    let new_user = user::ActiveModel {
        username: Set(username.trim().to_string()),
        password: Set(hash),
        role: Set(affiliation.role),
        university_id: Set(affiliation.university),
        college_id: Set(affiliation.college.map(|c| c.id)),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    new_user.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            tracing::debug!("Unique constraint caught on user insert");
            AppError::UsernameTaken
        }
        _ => AppError::from(e),
    })
}

/// Permissions granted to a role, sorted.
pub async fn role_permissions<C: ConnectionTrait>(
    db: &C,
    role: Role,
) -> Result<Vec<String>, AppError> {
    let rows = role_permission::Entity::find()
        .filter(role_permission::Column::Role.eq(role.as_str()))
        .order_by_asc(role_permission::Column::Permission)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|rp| rp.permission).collect())
}
