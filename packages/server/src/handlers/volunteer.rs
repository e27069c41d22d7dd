use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{department, programme, volunteer};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::ValidJson;
use crate::models::shared::{Pagination, escape_like, page_params};
use crate::models::volunteer::*;
use crate::state::AppState;
use crate::utils::scope::college_in_scope;

const DUPLICATE: &str = "A volunteer with this roll number already exists in the college";

#[utoipa::path(
    get,
    path = "/{id}/volunteers",
    tag = "Volunteers",
    operation_id = "listVolunteers",
    summary = "List the volunteers of a college",
    params(("id" = i32, Path, description = "College ID"), VolunteerListQuery),
    responses(
        (status = 200, description = "Volunteers ordered by name", body = VolunteerListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "College not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(college_id))]
pub async fn list_volunteers(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(college_id): Path<i32>,
    Query(query): Query<VolunteerListQuery>,
) -> Result<Json<VolunteerListResponse>, AppError> {
    college_in_scope(&state.db, &auth_user, college_id, "College").await?;
    let (page, per_page) = page_params(query.page, query.per_page);

    let mut select = volunteer::Entity::find().filter(volunteer::Column::CollegeId.eq(college_id));
    if let Some(programme_id) = query.programme_id {
        select = select.filter(volunteer::Column::ProgrammeId.eq(programme_id));
    }
    if let Some(year) = query.year {
        select = select.filter(volunteer::Column::Year.eq(year));
    }
    if let Some(unit) = query.unit {
        select = select.filter(volunteer::Column::Unit.eq(unit));
    }
    if let Some(ref search) = query.search {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(volunteer::Column::Name)))
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
        .select_only()
        .column(volunteer::Column::Id)
        .column(volunteer::Column::Name)
        .column(volunteer::Column::RollNo)
        .column(volunteer::Column::ProgrammeId)
        .column(volunteer::Column::Year)
        .column(volunteer::Column::Unit)
        .column(volunteer::Column::Status)
        .column(volunteer::Column::Mobile)
        .column(volunteer::Column::Email)
        .order_by_asc(volunteer::Column::Name)
        .order_by_asc(volunteer::Column::Id)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .into_model::<VolunteerListItem>()
        .all(&state.db)
        .await?;

    Ok(Json(VolunteerListResponse {
        data,
        pagination: Pagination::new(page, per_page, total),
    }))
}

#[utoipa::path(
    post,
    path = "/{id}/volunteers",
    tag = "Volunteers",
    operation_id = "createVolunteer",
    summary = "Enrol a volunteer",
    description = "Requires `volunteer:manage`. The programme must belong to a department of the same college; roll numbers are unique within a college.",
    params(("id" = i32, Path, description = "College ID")),
    request_body = CreateVolunteerRequest,
    responses(
        (status = 201, description = "Volunteer created", body = VolunteerResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "College not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Duplicate roll number (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(college_id))]
pub async fn create_volunteer(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(college_id): Path<i32>,
    ValidJson(payload): ValidJson<CreateVolunteerRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("volunteer:manage")?;
    college_in_scope(&state.db, &auth_user, college_id, "College").await?;
    check_programme_college(&state.db, payload.programme_id, college_id).await?;

    let now = chrono::Utc::now();
    let model = volunteer::ActiveModel {
        college_id: Set(college_id),
        programme_id: Set(payload.programme_id),
        name: Set(payload.name.trim().to_string()),
        status: Set(payload.status.trim().to_string()),
        guardian_name: Set(payload.guardian_name.trim().to_string()),
        guardian_mobile: Set(payload.guardian_mobile),
        sex: Set(payload.sex),
        dob: Set(payload.dob),
        year: Set(payload.year),
        community: Set(payload.community),
        address: Set(payload.address),
        blood_group: Set(payload.blood_group),
        height: Set(payload.height),
        weight: Set(payload.weight),
        unit: Set(payload.unit),
        mobile: Set(payload.mobile),
        email: Set(payload.email.trim().to_string()),
        year_of_enrollment: Set(payload.year_of_enrollment),
        cultural_talents: Set(payload.cultural_talents),
        hobbies: Set(payload.hobbies),
        roll_no: Set(payload.roll_no),
        image: Set(payload.image),
        created_by: Set(Some(auth_user.user_id)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| AppError::on_duplicate(e, DUPLICATE))?;

    Ok((StatusCode::CREATED, Json(VolunteerResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Volunteers",
    operation_id = "getVolunteer",
    summary = "Get a volunteer",
    params(("id" = i32, Path, description = "Volunteer ID")),
    responses(
        (status = 200, description = "Volunteer details", body = VolunteerResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Volunteer not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_volunteer(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<VolunteerResponse>, AppError> {
    let model = find_volunteer_in_scope(&state.db, &auth_user, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Volunteers",
    operation_id = "updateVolunteer",
    summary = "Update a volunteer",
    description = "Partial update; `roll_no: null` and `image: null` clear those fields. A new programme must belong to the volunteer's college. Requires `volunteer:manage`.",
    params(("id" = i32, Path, description = "Volunteer ID")),
    request_body = UpdateVolunteerRequest,
    responses(
        (status = 200, description = "Volunteer updated", body = VolunteerResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Volunteer not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Duplicate roll number (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_volunteer(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidJson(payload): ValidJson<UpdateVolunteerRequest>,
) -> Result<Json<VolunteerResponse>, AppError> {
    auth_user.require_permission("volunteer:manage")?;
    let existing = find_volunteer_in_scope(&state.db, &auth_user, id).await?;

    if payload == UpdateVolunteerRequest::default() {
        return Ok(Json(existing.into()));
    }
    if let Some(programme_id) = payload.programme_id {
        check_programme_college(&state.db, programme_id, existing.college_id).await?;
    }

    let mut active: volunteer::ActiveModel = existing.into();
    if let Some(programme_id) = payload.programme_id {
        active.programme_id = Set(programme_id);
    }
    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(ref status) = payload.status {
        active.status = Set(status.trim().to_string());
    }
    if let Some(ref guardian_name) = payload.guardian_name {
        active.guardian_name = Set(guardian_name.trim().to_string());
    }
    if let Some(guardian_mobile) = payload.guardian_mobile {
        active.guardian_mobile = Set(guardian_mobile);
    }
    if let Some(sex) = payload.sex {
        active.sex = Set(sex);
    }
    if let Some(dob) = payload.dob {
        active.dob = Set(dob);
    }
    if let Some(year) = payload.year {
        active.year = Set(year);
    }
    if let Some(community) = payload.community {
        active.community = Set(community);
    }
    if let Some(address) = payload.address {
        active.address = Set(address);
    }
    if let Some(blood_group) = payload.blood_group {
        active.blood_group = Set(blood_group);
    }
    if let Some(height) = payload.height {
        active.height = Set(height);
    }
    if let Some(weight) = payload.weight {
        active.weight = Set(weight);
    }
    if let Some(unit) = payload.unit {
        active.unit = Set(unit);
    }
    if let Some(mobile) = payload.mobile {
        active.mobile = Set(mobile);
    }
    if let Some(ref email) = payload.email {
        active.email = Set(email.trim().to_string());
    }
    if let Some(year_of_enrollment) = payload.year_of_enrollment {
        active.year_of_enrollment = Set(year_of_enrollment);
    }
    if let Some(cultural_talents) = payload.cultural_talents {
        active.cultural_talents = Set(cultural_talents);
    }
    if let Some(hobbies) = payload.hobbies {
        active.hobbies = Set(hobbies);
    }
    if let Some(roll_no) = payload.roll_no {
        active.roll_no = Set(roll_no);
    }
    if let Some(image) = payload.image {
        active.image = Set(image);
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active
        .update(&state.db)
        .await
        .map_err(|e| AppError::on_duplicate(e, DUPLICATE))?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Volunteers",
    operation_id = "deleteVolunteer",
    summary = "Delete a volunteer",
    description = "Deletes the volunteer with their attendance rows and camp registrations. Requires `volunteer:manage`.",
    params(("id" = i32, Path, description = "Volunteer ID")),
    responses(
        (status = 204, description = "Volunteer deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Volunteer not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_volunteer(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("volunteer:manage")?;
    let existing = find_volunteer_in_scope(&state.db, &auth_user, id).await?;

    volunteer::Entity::delete_by_id(existing.id)
        .exec(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn find_volunteer_in_scope<C: ConnectionTrait>(
    db: &C,
    auth_user: &AuthUser,
    id: i32,
) -> Result<volunteer::Model, AppError> {
    let model = volunteer::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Volunteer not found".into()))?;
    college_in_scope(db, auth_user, model.college_id, "Volunteer").await?;
    Ok(model)
}

/// The programme must exist and be run by a department of `college_id`.
async fn check_programme_college<C: ConnectionTrait>(
    db: &C,
    programme_id: i32,
    college_id: i32,
) -> Result<(), AppError> {
    let owner: Option<i32> = programme::Entity::find_by_id(programme_id)
        .select_only()
        .column(department::Column::CollegeId)
        .inner_join(department::Entity)
        .into_tuple()
        .one(db)
        .await?;

    match owner {
        Some(owner) if owner == college_id => Ok(()),
        Some(_) => Err(AppError::Validation(
            "Programme must belong to a department of the volunteer's college".into(),
        )),
        None => Err(AppError::Validation(format!(
            "Programme {programme_id} does not exist"
        ))),
    }
}
