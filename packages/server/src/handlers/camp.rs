use std::collections::BTreeSet;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::NaiveDate;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::{camp, camp_attendance, camp_event, camp_event_photo, user, volunteer};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::ValidJson;
use crate::models::camp::*;
use crate::models::event::{CreatePhotoRequest, PhotoResponse};
use crate::state::AppState;
use crate::utils::scope::college_in_scope;

const DUPLICATE: &str = "A camp with this name already starts on that date";

#[utoipa::path(
    get,
    path = "/{id}/camps",
    tag = "Camps",
    operation_id = "listCamps",
    summary = "List the camps of a college",
    params(("id" = i32, Path, description = "College ID")),
    responses(
        (status = 200, description = "Camps, latest first", body = Vec<CampResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "College not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(college_id))]
pub async fn list_camps(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(college_id): Path<i32>,
) -> Result<Json<Vec<CampResponse>>, AppError> {
    college_in_scope(&state.db, &auth_user, college_id, "College").await?;

    let rows = camp::Entity::find()
        .filter(camp::Column::CollegeId.eq(college_id))
        .order_by_desc(camp::Column::FromDate)
        .order_by_asc(camp::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(CampResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/{id}/camps",
    tag = "Camps",
    operation_id = "createCamp",
    summary = "Create a camp",
    description = "Requires `camp:manage`. The coordinator, when given, must be a staff account of the same college.",
    params(("id" = i32, Path, description = "College ID")),
    request_body = CreateCampRequest,
    responses(
        (status = 201, description = "Camp created", body = CampResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "College not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Duplicate camp (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(college_id, name = %payload.name))]
pub async fn create_camp(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(college_id): Path<i32>,
    ValidJson(payload): ValidJson<CreateCampRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("camp:manage")?;
    college_in_scope(&state.db, &auth_user, college_id, "College").await?;
    if let Some(coordinator_id) = payload.coordinator_id {
        check_coordinator(&state.db, coordinator_id, college_id).await?;
    }

    let model = camp::ActiveModel {
        college_id: Set(college_id),
        name: Set(payload.name.trim().to_string()),
        from_date: Set(payload.from_date),
        to_date: Set(payload.to_date),
        location: Set(payload.location.trim().to_string()),
        theme: Set(payload.theme.map(|t| t.trim().to_string())),
        coordinator_id: Set(payload.coordinator_id),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| AppError::on_duplicate(e, DUPLICATE))?;

    Ok((StatusCode::CREATED, Json(CampResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Camps",
    operation_id = "getCamp",
    summary = "Get a camp",
    params(("id" = i32, Path, description = "Camp ID")),
    responses(
        (status = 200, description = "Camp details", body = CampResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Camp not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_camp(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CampResponse>, AppError> {
    let model = find_camp_in_scope(&state.db, &auth_user, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Camps",
    operation_id = "updateCamp",
    summary = "Update a camp",
    description = "Partial update. The merged dates must stay ordered and must still cover every camp event. Requires `camp:manage`.",
    params(("id" = i32, Path, description = "Camp ID")),
    request_body = UpdateCampRequest,
    responses(
        (status = 200, description = "Camp updated", body = CampResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Camp not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Duplicate camp (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_camp(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidJson(payload): ValidJson<UpdateCampRequest>,
) -> Result<Json<CampResponse>, AppError> {
    auth_user.require_permission("camp:manage")?;
    let existing = find_camp_in_scope(&state.db, &auth_user, id).await?;

    if payload == UpdateCampRequest::default() {
        return Ok(Json(existing.into()));
    }

    let from_date = payload.from_date.unwrap_or(existing.from_date);
    let to_date = payload.to_date.unwrap_or(existing.to_date);
    validate_date_order(from_date, to_date)?;
    if from_date != existing.from_date || to_date != existing.to_date {
        let outside = camp_event::Entity::find()
            .filter(camp_event::Column::CampId.eq(existing.id))
            .filter(
                Condition::any()
                    .add(camp_event::Column::Date.lt(from_date))
                    .add(camp_event::Column::Date.gt(to_date)),
            )
            .count(&state.db)
            .await?;
        if outside > 0 {
            return Err(AppError::Validation(
                "Camp dates must cover all of its events".into(),
            ));
        }
    }
    if let Some(Some(coordinator_id)) = payload.coordinator_id {
        check_coordinator(&state.db, coordinator_id, existing.college_id).await?;
    }

    let mut active: camp::ActiveModel = existing.into();
    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(ref location) = payload.location {
        active.location = Set(location.trim().to_string());
    }
    if let Some(theme) = payload.theme {
        active.theme = Set(theme.map(|t| t.trim().to_string()));
    }
    if let Some(coordinator_id) = payload.coordinator_id {
        active.coordinator_id = Set(coordinator_id);
    }
    active.from_date = Set(from_date);
    active.to_date = Set(to_date);

    let model = active
        .update(&state.db)
        .await
        .map_err(|e| AppError::on_duplicate(e, DUPLICATE))?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Camps",
    operation_id = "deleteCamp",
    summary = "Delete a camp",
    description = "Deletes the camp with its attendees, events and photos. Requires `camp:manage`.",
    params(("id" = i32, Path, description = "Camp ID")),
    responses(
        (status = 204, description = "Camp deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Camp not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_camp(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("camp:manage")?;
    let existing = find_camp_in_scope(&state.db, &auth_user, id).await?;

    camp::Entity::delete_by_id(existing.id)
        .exec(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/{id}/attendees",
    tag = "Camps",
    operation_id = "listCampAttendees",
    summary = "List the volunteers registered for a camp",
    params(("id" = i32, Path, description = "Camp ID")),
    responses(
        (status = 200, description = "Attendees ordered by name", body = Vec<CampAttendeeResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Camp not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(camp_id))]
pub async fn list_attendees(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(camp_id): Path<i32>,
) -> Result<Json<Vec<CampAttendeeResponse>>, AppError> {
    find_camp_in_scope(&state.db, &auth_user, camp_id).await?;

    let rows = camp_attendance::Entity::find()
        .select_only()
        .column(camp_attendance::Column::VolunteerId)
        .column(volunteer::Column::Name)
        .column(volunteer::Column::Unit)
        .column(camp_attendance::Column::RegisteredAt)
        .inner_join(volunteer::Entity)
        .filter(camp_attendance::Column::CampId.eq(camp_id))
        .order_by_asc(volunteer::Column::Name)
        .order_by_asc(camp_attendance::Column::VolunteerId)
        .into_model::<CampAttendeeResponse>()
        .all(&state.db)
        .await?;

    Ok(Json(rows))
}

#[utoipa::path(
    post,
    path = "/{id}/attendees",
    tag = "Camps",
    operation_id = "addCampAttendees",
    summary = "Register volunteers for a camp",
    description = "Every volunteer must belong to the camp's college. Volunteers already registered are skipped. Requires `camp:manage`.",
    params(("id" = i32, Path, description = "Camp ID")),
    request_body = AddAttendeesRequest,
    responses(
        (status = 200, description = "Volunteers registered", body = AddAttendeesResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Camp not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(camp_id, count = payload.volunteer_ids.len()))]
pub async fn add_attendees(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(camp_id): Path<i32>,
    ValidJson(payload): ValidJson<AddAttendeesRequest>,
) -> Result<Json<AddAttendeesResponse>, AppError> {
    auth_user.require_permission("camp:manage")?;

    let txn = state.db.begin().await?;
    let camp = find_camp_in_scope(&txn, &auth_user, camp_id).await?;

    let requested: BTreeSet<i32> = payload.volunteer_ids.iter().copied().collect();
    let found: BTreeSet<i32> = volunteer::Entity::find()
        .select_only()
        .column(volunteer::Column::Id)
        .filter(volunteer::Column::CollegeId.eq(camp.college_id))
        .filter(volunteer::Column::Id.is_in(requested.iter().copied()))
        .into_tuple::<i32>()
        .all(&txn)
        .await?
        .into_iter()
        .collect();
    if found.len() != requested.len() {
        let missing: Vec<String> = requested
            .difference(&found)
            .map(|id| id.to_string())
            .collect();
        return Err(AppError::Validation(format!(
            "Volunteers not enrolled in the camp's college: {}",
            missing.join(", ")
        )));
    }

    let now = chrono::Utc::now();
    let rows = requested.iter().map(|&volunteer_id| camp_attendance::ActiveModel {
        camp_id: Set(camp.id),
        volunteer_id: Set(volunteer_id),
        registered_at: Set(now),
    });
    let added = match camp_attendance::Entity::insert_many(rows)
        .on_conflict(
            OnConflict::columns([
                camp_attendance::Column::CampId,
                camp_attendance::Column::VolunteerId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(&txn)
        .await
    {
        Ok(n) => n,
        Err(DbErr::RecordNotInserted) => 0,
        Err(e) => return Err(e.into()),
    };

    txn.commit().await?;

    info!(camp_id = camp.id, added, "Camp attendees registered");
    Ok(Json(AddAttendeesResponse { added }))
}

#[utoipa::path(
    delete,
    path = "/{id}/attendees/{volunteer_id}",
    tag = "Camps",
    operation_id = "removeCampAttendee",
    summary = "Remove a volunteer from a camp",
    description = "Requires `camp:manage`.",
    params(
        ("id" = i32, Path, description = "Camp ID"),
        ("volunteer_id" = i32, Path, description = "Volunteer ID"),
    ),
    responses(
        (status = 204, description = "Volunteer removed"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Camp or registration not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(camp_id, volunteer_id))]
pub async fn remove_attendee(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((camp_id, volunteer_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("camp:manage")?;
    find_camp_in_scope(&state.db, &auth_user, camp_id).await?;

    let result = camp_attendance::Entity::delete_many()
        .filter(camp_attendance::Column::CampId.eq(camp_id))
        .filter(camp_attendance::Column::VolunteerId.eq(volunteer_id))
        .exec(&state.db)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(
            "Volunteer is not registered for this camp".into(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/{id}/events",
    tag = "Camps",
    operation_id = "listCampEvents",
    summary = "List the events of a camp",
    params(("id" = i32, Path, description = "Camp ID")),
    responses(
        (status = 200, description = "Events in date order", body = Vec<CampEventResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Camp not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(camp_id))]
pub async fn list_camp_events(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(camp_id): Path<i32>,
) -> Result<Json<Vec<CampEventResponse>>, AppError> {
    find_camp_in_scope(&state.db, &auth_user, camp_id).await?;

    let rows = camp_event::Entity::find()
        .filter(camp_event::Column::CampId.eq(camp_id))
        .order_by_asc(camp_event::Column::Date)
        .order_by_asc(camp_event::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(CampEventResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/{id}/events",
    tag = "Camps",
    operation_id = "createCampEvent",
    summary = "Add an event to a camp",
    description = "The event date must fall within the camp dates. Requires `camp:manage`.",
    params(("id" = i32, Path, description = "Camp ID")),
    request_body = CreateCampEventRequest,
    responses(
        (status = 201, description = "Camp event created", body = CampEventResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Camp not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(camp_id, date = %payload.date))]
pub async fn create_camp_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(camp_id): Path<i32>,
    ValidJson(payload): ValidJson<CreateCampEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("camp:manage")?;
    let camp = find_camp_in_scope(&state.db, &auth_user, camp_id).await?;
    check_within_camp(camp.from_date, camp.to_date, payload.date)?;

    let model = camp_event::ActiveModel {
        camp_id: Set(camp.id),
        event_name: Set(payload.event_name.trim().to_string()),
        description: Set(payload.description.trim().to_string()),
        date: Set(payload.date),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(CampEventResponse::from(model))))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Camps",
    operation_id = "deleteCampEvent",
    summary = "Delete a camp event",
    description = "Deletes the event and its photos. Requires `camp:manage`.",
    params(("id" = i32, Path, description = "Camp event ID")),
    responses(
        (status = 204, description = "Camp event deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Camp event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_camp_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("camp:manage")?;
    let model = find_camp_event_in_scope(&state.db, &auth_user, id).await?;

    camp_event::Entity::delete_by_id(model.id)
        .exec(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/{id}/photos",
    tag = "Camps",
    operation_id = "listCampEventPhotos",
    summary = "List the photos of a camp event",
    params(("id" = i32, Path, description = "Camp event ID")),
    responses(
        (status = 200, description = "Photos, oldest first", body = Vec<PhotoResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Camp event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(camp_event_id))]
pub async fn list_camp_event_photos(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(camp_event_id): Path<i32>,
) -> Result<Json<Vec<PhotoResponse>>, AppError> {
    find_camp_event_in_scope(&state.db, &auth_user, camp_event_id).await?;

    let rows = camp_event_photo::Entity::find()
        .filter(camp_event_photo::Column::CampEventId.eq(camp_event_id))
        .order_by_asc(camp_event_photo::Column::UploadedAt)
        .order_by_asc(camp_event_photo::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(PhotoResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/{id}/photos",
    tag = "Camps",
    operation_id = "addCampEventPhoto",
    summary = "Attach a photo to a camp event",
    description = "Requires `camp:manage`.",
    params(("id" = i32, Path, description = "Camp event ID")),
    request_body = CreatePhotoRequest,
    responses(
        (status = 201, description = "Photo attached", body = PhotoResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Camp event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(camp_event_id))]
pub async fn add_camp_event_photo(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(camp_event_id): Path<i32>,
    ValidJson(payload): ValidJson<CreatePhotoRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("camp:manage")?;
    find_camp_event_in_scope(&state.db, &auth_user, camp_event_id).await?;

    let model = camp_event_photo::ActiveModel {
        camp_event_id: Set(camp_event_id),
        photo: Set(payload.photo.trim().to_string()),
        uploaded_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(PhotoResponse::from(model))))
}

fn check_within_camp(from: NaiveDate, to: NaiveDate, date: NaiveDate) -> Result<(), AppError> {
    if date < from || date > to {
        return Err(AppError::Validation(format!(
            "Camp event date must be between {from} and {to}"
        )));
    }
    Ok(())
}

/// The coordinator must be an account attached to the camp's college.
async fn check_coordinator<C: ConnectionTrait>(
    db: &C,
    coordinator_id: i32,
    college_id: i32,
) -> Result<(), AppError> {
    let coordinator = user::Entity::find_by_id(coordinator_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::Validation(format!("User {coordinator_id} does not exist")))?;
    if coordinator.college_id != Some(college_id) {
        return Err(AppError::Validation(
            "Camp coordinator must belong to the camp's college".into(),
        ));
    }
    Ok(())
}

async fn find_camp_in_scope<C: ConnectionTrait>(
    db: &C,
    auth_user: &AuthUser,
    id: i32,
) -> Result<camp::Model, AppError> {
    let model = camp::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Camp not found".into()))?;
    college_in_scope(db, auth_user, model.college_id, "Camp").await?;
    Ok(model)
}

async fn find_camp_event_in_scope<C: ConnectionTrait>(
    db: &C,
    auth_user: &AuthUser,
    id: i32,
) -> Result<camp_event::Model, AppError> {
    let not_found = || AppError::NotFound("Camp event not found".into());
    let model = camp_event::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(not_found)?;
    let owner = camp::Entity::find_by_id(model.camp_id)
        .one(db)
        .await?
        .ok_or_else(not_found)?;
    college_in_scope(db, auth_user, owner.college_id, "Camp event").await?;
    Ok(model)
}
