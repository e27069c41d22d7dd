use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{college, university};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::ValidJson;
use crate::models::college::*;
use crate::models::shared::{Pagination, escape_like, page_params};
use crate::state::AppState;
use crate::utils::scope::{college_condition, college_in_scope};

const DUPLICATE: &str = "A college with this name already exists";

#[utoipa::path(
    get,
    path = "/",
    tag = "Colleges",
    operation_id = "listColleges",
    summary = "List colleges in scope",
    description = "Admins see every college, university users the colleges of their university, college staff their own college.",
    params(CollegeListQuery),
    responses(
        (status = 200, description = "List of colleges", body = CollegeListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_colleges(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<CollegeListQuery>,
) -> Result<Json<CollegeListResponse>, AppError> {
    let (page, per_page) = page_params(query.page, query.per_page);

    let mut select = college::Entity::find()
        .filter(college_condition(auth_user.scope(), college::Column::Id));
    if let Some(university_id) = query.university_id {
        select = select.filter(college::Column::UniversityId.eq(university_id));
    }
    if let Some(ref search) = query.search {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(college::Column::Name)))
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
        .order_by_asc(college::Column::Id)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(&state.db)
        .await?
        .into_iter()
        .map(CollegeResponse::from)
        .collect();

    Ok(Json(CollegeListResponse {
        data,
        pagination: Pagination::new(page, per_page, total),
    }))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Colleges",
    operation_id = "createCollege",
    summary = "Create a college",
    description = "Requires `college:manage`. The university must exist.",
    request_body = CreateCollegeRequest,
    responses(
        (status = 201, description = "College created", body = CollegeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 409, description = "Duplicate name (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name, university_id = payload.university_id))]
pub async fn create_college(
    auth_user: AuthUser,
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreateCollegeRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("college:manage")?;

    university::Entity::find_by_id(payload.university_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::Validation(format!(
                "University {} does not exist",
                payload.university_id
            ))
        })?;

    let model = college::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        directorate: Set(payload.directorate.trim().to_string()),
        university_id: Set(payload.university_id),
        nss_unit: Set(payload.nss_unit),
        contact_email: Set(payload.contact_email),
        contact_phone: Set(payload.contact_phone.map(|p| p.trim().to_string())),
        address: Set(payload.address),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| AppError::on_duplicate(e, DUPLICATE))?;

    Ok((StatusCode::CREATED, Json(CollegeResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Colleges",
    operation_id = "getCollege",
    summary = "Get a college",
    description = "Returns 404 (not 403) for colleges outside the caller's scope.",
    params(("id" = i32, Path, description = "College ID")),
    responses(
        (status = 200, description = "College details", body = CollegeResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "College not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_college(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CollegeResponse>, AppError> {
    let model = college_in_scope(&state.db, &auth_user, id, "College").await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Colleges",
    operation_id = "updateCollege",
    summary = "Update a college",
    description = "Partial update. The owning university cannot be changed. Requires `college:manage`.",
    params(("id" = i32, Path, description = "College ID")),
    request_body = UpdateCollegeRequest,
    responses(
        (status = 200, description = "College updated", body = CollegeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "College not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Duplicate name (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_college(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidJson(payload): ValidJson<UpdateCollegeRequest>,
) -> Result<Json<CollegeResponse>, AppError> {
    auth_user.require_permission("college:manage")?;
    let existing = college_in_scope(&state.db, &auth_user, id, "College").await?;

    if payload == UpdateCollegeRequest::default() {
        return Ok(Json(existing.into()));
    }

    let mut active: college::ActiveModel = existing.into();
    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(ref directorate) = payload.directorate {
        active.directorate = Set(directorate.trim().to_string());
    }
    if let Some(nss_unit) = payload.nss_unit {
        active.nss_unit = Set(nss_unit);
    }
    if let Some(contact_email) = payload.contact_email {
        active.contact_email = Set(contact_email);
    }
    if let Some(contact_phone) = payload.contact_phone {
        active.contact_phone = Set(contact_phone.map(|p| p.trim().to_string()));
    }
    if let Some(address) = payload.address {
        active.address = Set(address);
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
    tag = "Colleges",
    operation_id = "deleteCollege",
    summary = "Delete a college",
    description = "Deletes the college and every record it owns. Staff accounts of the college remain with the college cleared. Requires `college:manage`.",
    params(("id" = i32, Path, description = "College ID")),
    responses(
        (status = 204, description = "College deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "College not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_college(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("college:manage")?;
    let existing = college_in_scope(&state.db, &auth_user, id, "College").await?;

    college::Entity::delete_by_id(existing.id)
        .exec(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
