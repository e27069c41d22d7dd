use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::department;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::ValidJson;
use crate::models::department::*;
use crate::state::AppState;
use crate::utils::scope::college_in_scope;

const DUPLICATE: &str = "A department with this name already exists in the college";

#[utoipa::path(
    get,
    path = "/{id}/departments",
    tag = "Departments",
    operation_id = "listDepartments",
    summary = "List the departments of a college",
    params(("id" = i32, Path, description = "College ID")),
    responses(
        (status = 200, description = "Departments ordered by name", body = Vec<DepartmentResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "College not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(college_id))]
pub async fn list_departments(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(college_id): Path<i32>,
) -> Result<Json<Vec<DepartmentResponse>>, AppError> {
    college_in_scope(&state.db, &auth_user, college_id, "College").await?;

    let rows = department::Entity::find()
        .filter(department::Column::CollegeId.eq(college_id))
        .order_by_asc(department::Column::Name)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(DepartmentResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/{id}/departments",
    tag = "Departments",
    operation_id = "createDepartment",
    summary = "Create a department",
    description = "Requires `department:manage`. Names are unique within a college.",
    params(("id" = i32, Path, description = "College ID")),
    request_body = CreateDepartmentRequest,
    responses(
        (status = 201, description = "Department created", body = DepartmentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "College not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Duplicate name (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(college_id, name = %payload.name))]
pub async fn create_department(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(college_id): Path<i32>,
    ValidJson(payload): ValidJson<CreateDepartmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("department:manage")?;
    college_in_scope(&state.db, &auth_user, college_id, "College").await?;

    let model = department::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        code: Set(payload.code.map(|c| c.trim().to_string())),
        college_id: Set(college_id),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| AppError::on_duplicate(e, DUPLICATE))?;

    Ok((StatusCode::CREATED, Json(DepartmentResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Departments",
    operation_id = "getDepartment",
    summary = "Get a department",
    params(("id" = i32, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department details", body = DepartmentResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Department not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_department(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DepartmentResponse>, AppError> {
    let model = find_department_in_scope(&state.db, &auth_user, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Departments",
    operation_id = "updateDepartment",
    summary = "Update a department",
    description = "Partial update. Requires `department:manage`.",
    params(("id" = i32, Path, description = "Department ID")),
    request_body = UpdateDepartmentRequest,
    responses(
        (status = 200, description = "Department updated", body = DepartmentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Department not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Duplicate name (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_department(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidJson(payload): ValidJson<UpdateDepartmentRequest>,
) -> Result<Json<DepartmentResponse>, AppError> {
    auth_user.require_permission("department:manage")?;
    let existing = find_department_in_scope(&state.db, &auth_user, id).await?;

    if payload == UpdateDepartmentRequest::default() {
        return Ok(Json(existing.into()));
    }

    let mut active: department::ActiveModel = existing.into();
    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(code) = payload.code {
        active.code = Set(code.map(|c| c.trim().to_string()));
    }

    let model = active
        .update(&state.db)
        .await
        .map_err(|e| AppError::on_duplicate(e, DUPLICATE))?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Departments",
    operation_id = "deleteDepartment",
    summary = "Delete a department",
    description = "Deletes the department, its programmes and the volunteers enrolled in them. Requires `department:manage`.",
    params(("id" = i32, Path, description = "Department ID")),
    responses(
        (status = 204, description = "Department deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Department not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_department(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("department:manage")?;
    let existing = find_department_in_scope(&state.db, &auth_user, id).await?;

    department::Entity::delete_by_id(existing.id)
        .exec(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Load a department whose college is inside the caller's scope.
pub(crate) async fn find_department_in_scope<C: ConnectionTrait>(
    db: &C,
    auth_user: &AuthUser,
    id: i32,
) -> Result<department::Model, AppError> {
    let model = department::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Department not found".into()))?;
    college_in_scope(db, auth_user, model.college_id, "Department").await?;
    Ok(model)
}
