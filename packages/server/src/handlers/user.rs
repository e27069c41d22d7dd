use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{attendance_sheet, camp, event, user, volunteer};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::ValidJson;
use crate::models::shared::{Pagination, escape_like, page_params};
use crate::models::user::*;
use crate::state::AppState;
use crate::utils::hash;
use crate::utils::user::{insert_user, prepare_affiliation};

#[utoipa::path(
    get,
    path = "/",
    tag = "Users",
    operation_id = "listUsers",
    summary = "List user accounts",
    description = "Paginated list of every account, optionally filtered by role, university or college. Requires `user:manage`.",
    params(UserListQuery),
    responses(
        (status = 200, description = "List of users", body = UserListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_users(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<UserListResponse>, AppError> {
    auth_user.require_permission("user:manage")?;
    let (page, per_page) = page_params(query.page, query.per_page);

    let mut select = user::Entity::find();
    if let Some(role) = query.role {
        select = select.filter(user::Column::Role.eq(role));
    }
    if let Some(university_id) = query.university_id {
        select = select.filter(user::Column::UniversityId.eq(university_id));
    }
    if let Some(college_id) = query.college_id {
        select = select.filter(user::Column::CollegeId.eq(college_id));
    }
    if let Some(ref search) = query.search {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(user::Column::Username)))
                    .like(LikeExpr::new(format!("%{}%", term.to_lowercase())).escape('\\')),
            );
        }
    }

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;

    let data = select
        .order_by_asc(user::Column::Id)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(&state.db)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(UserListResponse {
        data,
        pagination: Pagination::new(page, per_page, total),
    }))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Users",
    operation_id = "createUser",
    summary = "Create a user account",
    description = "Creates an account of any role, including `admin`. The same affiliation rules as registration apply. Requires `user:manage`.",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 409, description = "Username taken (USERNAME_TAKEN)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(username = %payload.username))]
pub async fn create_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("user:manage")?;

    let affiliation = prepare_affiliation(
        &state.db,
        payload.role,
        payload.university_id,
        payload.college_id,
    )
    .await?;
    let model = insert_user(&state.db, &payload.username, &payload.password, affiliation).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Users",
    operation_id = "getUser",
    summary = "Get a user account",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = UserResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UserResponse>, AppError> {
    auth_user.require_permission("user:manage")?;
    let model = find_user(&state.db, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Users",
    operation_id = "updateUser",
    summary = "Update a user account",
    description = "Changes the password or affiliation of an account. The role is fixed at creation and cannot be sent. The merged affiliation is re-validated; when the college changes without an explicit university, a college staff member's university is derived again. An empty payload returns the account unchanged. Requires `user:manage`.",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidJson(payload): ValidJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    auth_user.require_permission("user:manage")?;

    if payload == UpdateUserRequest::default() {
        let existing = find_user(&state.db, id).await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;
    let existing = find_user(&txn, id).await?;

    let college_id = payload.college_id.unwrap_or(existing.college_id);
    let university_id = match payload.university_id {
        Some(university_id) => university_id,
        None if payload.college_id.is_some() && existing.role.is_college_staff() => None,
        None => existing.university_id,
    };
    let affiliation = prepare_affiliation(&txn, existing.role, university_id, college_id).await?;

    let mut active: user::ActiveModel = existing.into();
    active.university_id = Set(affiliation.university);
    active.college_id = Set(affiliation.college.map(|c| c.id));
    if let Some(ref password) = payload.password {
        let hash = hash::hash_password(password)
            .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;
        active.password = Set(hash);
    }

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Users",
    operation_id = "deleteUser",
    summary = "Delete a user account",
    description = "Deletes the account. Records it created, reviewed or coordinates keep existing with the reference cleared. Admins cannot delete their own account. Requires `user:manage`.",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Deleting own account (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("user:manage")?;
    if id == auth_user.user_id {
        return Err(AppError::Conflict("Cannot delete your own account".into()));
    }

    let txn = state.db.begin().await?;
    let _user = find_user(&txn, id).await?;

    let cleared: Option<i32> = None;
    volunteer::Entity::update_many()
        .col_expr(volunteer::Column::CreatedBy, Expr::value(cleared))
        .filter(volunteer::Column::CreatedBy.eq(id))
        .exec(&txn)
        .await?;
    event::Entity::update_many()
        .col_expr(event::Column::CreatedBy, Expr::value(cleared))
        .filter(event::Column::CreatedBy.eq(id))
        .exec(&txn)
        .await?;
    attendance_sheet::Entity::update_many()
        .col_expr(attendance_sheet::Column::CreatedBy, Expr::value(cleared))
        .filter(attendance_sheet::Column::CreatedBy.eq(id))
        .exec(&txn)
        .await?;
    attendance_sheet::Entity::update_many()
        .col_expr(attendance_sheet::Column::ApprovedBy, Expr::value(cleared))
        .filter(attendance_sheet::Column::ApprovedBy.eq(id))
        .exec(&txn)
        .await?;
    camp::Entity::update_many()
        .col_expr(camp::Column::CoordinatorId, Expr::value(cleared))
        .filter(camp::Column::CoordinatorId.eq(id))
        .exec(&txn)
        .await?;
    user::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn find_user<C: ConnectionTrait>(db: &C, id: i32) -> Result<user::Model, AppError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}
