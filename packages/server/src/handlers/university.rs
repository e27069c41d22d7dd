use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::instrument;

use crate::entity::university;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::ValidJson;
use crate::models::shared::{Pagination, escape_like, page_params};
use crate::models::university::*;
use crate::state::AppState;
use crate::utils::scope::university_condition;

const DUPLICATE: &str = "A university with this name or domain already exists";

#[utoipa::path(
    get,
    path = "/",
    tag = "Universities",
    operation_id = "listUniversities",
    summary = "List universities",
    description = "Admins see every university; other users see the university their access scope belongs to.",
    params(UniversityListQuery),
    responses(
        (status = 200, description = "List of universities", body = UniversityListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_universities(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<UniversityListQuery>,
) -> Result<Json<UniversityListResponse>, AppError> {
    let (page, per_page) = page_params(query.page, query.per_page);

    let mut select = university::Entity::find().filter(university_condition(auth_user.scope()));
    if let Some(ref search) = query.search {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(university::Column::Name)))
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
        .order_by_asc(university::Column::Name)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(&state.db)
        .await?
        .into_iter()
        .map(UniversityResponse::from)
        .collect();

    Ok(Json(UniversityListResponse {
        data,
        pagination: Pagination::new(page, per_page, total),
    }))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Universities",
    operation_id = "createUniversity",
    summary = "Create a university",
    description = "Requires `university:manage`.",
    request_body = CreateUniversityRequest,
    responses(
        (status = 201, description = "University created", body = UniversityResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 409, description = "Duplicate name or domain (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_university(
    auth_user: AuthUser,
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreateUniversityRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("university:manage")?;

    let model = university::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        directorate: Set(payload.directorate.trim().to_string()),
        domain: Set(payload.domain.map(|d| d.trim().to_lowercase())),
        is_active: Set(payload.is_active.unwrap_or(true)),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| AppError::on_duplicate(e, DUPLICATE))?;

    Ok((StatusCode::CREATED, Json(UniversityResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Universities",
    operation_id = "getUniversity",
    summary = "Get a university",
    params(("id" = i32, Path, description = "University ID")),
    responses(
        (status = 200, description = "University details", body = UniversityResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "University not found or outside scope (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_university(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UniversityResponse>, AppError> {
    let model = university::Entity::find_by_id(id)
        .filter(university_condition(auth_user.scope()))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("University not found".into()))?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Universities",
    operation_id = "updateUniversity",
    summary = "Update a university",
    description = "Partial update; `domain: null` clears the domain. Requires `university:manage`.",
    params(("id" = i32, Path, description = "University ID")),
    request_body = UpdateUniversityRequest,
    responses(
        (status = 200, description = "University updated", body = UniversityResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "University not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Duplicate name or domain (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_university(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidJson(payload): ValidJson<UpdateUniversityRequest>,
) -> Result<Json<UniversityResponse>, AppError> {
    auth_user.require_permission("university:manage")?;
    let existing = find_university(&state.db, id).await?;

    if payload == UpdateUniversityRequest::default() {
        return Ok(Json(existing.into()));
    }

    let mut active: university::ActiveModel = existing.into();
    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(ref directorate) = payload.directorate {
        active.directorate = Set(directorate.trim().to_string());
    }
    if let Some(domain) = payload.domain {
        active.domain = Set(domain.map(|d| d.trim().to_lowercase()));
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
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
    tag = "Universities",
    operation_id = "deleteUniversity",
    summary = "Delete a university",
    description = "Deletes the university together with its colleges and every record owned by them. Users affiliated with it keep their account with the affiliation cleared. Requires `university:manage`.",
    params(("id" = i32, Path, description = "University ID")),
    responses(
        (status = 204, description = "University deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "University not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_university(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("university:manage")?;

    let result = university::Entity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("University not found".into()));
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn find_university<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<university::Model, AppError> {
    university::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("University not found".into()))
}
