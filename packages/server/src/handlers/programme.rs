use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use super::department::find_department_in_scope;
use crate::entity::{department, programme};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::ValidJson;
use crate::models::department::*;
use crate::state::AppState;
use crate::utils::scope::college_in_scope;

const DUPLICATE: &str = "A programme with this name already exists in the department";

#[utoipa::path(
    get,
    path = "/{id}/programmes",
    tag = "Programmes",
    operation_id = "listProgrammes",
    summary = "List the programmes of a department",
    params(("id" = i32, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Programmes ordered by name", body = Vec<ProgrammeResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Department not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(department_id))]
pub async fn list_programmes(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(department_id): Path<i32>,
) -> Result<Json<Vec<ProgrammeResponse>>, AppError> {
    find_department_in_scope(&state.db, &auth_user, department_id).await?;

    let rows = programme::Entity::find()
        .filter(programme::Column::DepartmentId.eq(department_id))
        .order_by_asc(programme::Column::Name)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(ProgrammeResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/{id}/programmes",
    tag = "Programmes",
    operation_id = "createProgramme",
    summary = "Create a programme",
    description = "Requires `department:manage`. Names are unique within a department.",
    params(("id" = i32, Path, description = "Department ID")),
    request_body = CreateProgrammeRequest,
    responses(
        (status = 201, description = "Programme created", body = ProgrammeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Department not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Duplicate name (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(department_id, name = %payload.name))]
pub async fn create_programme(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(department_id): Path<i32>,
    ValidJson(payload): ValidJson<CreateProgrammeRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("department:manage")?;
    find_department_in_scope(&state.db, &auth_user, department_id).await?;

    let model = programme::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        duration_years: Set(payload.duration_years),
        grad_level: Set(payload.grad_level),
        code: Set(payload.code.map(|c| c.trim().to_string())),
        department_id: Set(department_id),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| AppError::on_duplicate(e, DUPLICATE))?;

    Ok((StatusCode::CREATED, Json(ProgrammeResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Programmes",
    operation_id = "getProgramme",
    summary = "Get a programme",
    params(("id" = i32, Path, description = "Programme ID")),
    responses(
        (status = 200, description = "Programme details", body = ProgrammeResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Programme not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_programme(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProgrammeResponse>, AppError> {
    let (model, _) = find_programme_in_scope(&state.db, &auth_user, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Programmes",
    operation_id = "updateProgramme",
    summary = "Update a programme",
    description = "Partial update. Requires `department:manage`.",
    params(("id" = i32, Path, description = "Programme ID")),
    request_body = UpdateProgrammeRequest,
    responses(
        (status = 200, description = "Programme updated", body = ProgrammeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Programme not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Duplicate name (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_programme(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidJson(payload): ValidJson<UpdateProgrammeRequest>,
) -> Result<Json<ProgrammeResponse>, AppError> {
    auth_user.require_permission("department:manage")?;
    let (existing, _) = find_programme_in_scope(&state.db, &auth_user, id).await?;

    if payload == UpdateProgrammeRequest::default() {
        return Ok(Json(existing.into()));
    }

    let mut active: programme::ActiveModel = existing.into();
    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(duration_years) = payload.duration_years {
        active.duration_years = Set(duration_years);
    }
    if let Some(grad_level) = payload.grad_level {
        active.grad_level = Set(grad_level);
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
    tag = "Programmes",
    operation_id = "deleteProgramme",
    summary = "Delete a programme",
    description = "Deletes the programme and the volunteers enrolled in it. Requires `department:manage`.",
    params(("id" = i32, Path, description = "Programme ID")),
    responses(
        (status = 204, description = "Programme deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Programme not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_programme(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("department:manage")?;
    let (existing, _) = find_programme_in_scope(&state.db, &auth_user, id).await?;

    programme::Entity::delete_by_id(existing.id)
        .exec(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Load a programme whose college is inside the caller's scope, with its department.
pub(crate) async fn find_programme_in_scope<C: ConnectionTrait>(
    db: &C,
    auth_user: &AuthUser,
    id: i32,
) -> Result<(programme::Model, department::Model), AppError> {
    let not_found = || AppError::NotFound("Programme not found".into());
    let model = programme::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(not_found)?;
    let dept = department::Entity::find_by_id(model.department_id)
        .one(db)
        .await?
        .ok_or_else(not_found)?;
    college_in_scope(db, auth_user, dept.college_id, "Programme").await?;
    Ok((model, dept))
}
