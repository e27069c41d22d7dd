use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{event, event_detail, event_photo};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::ValidJson;
use crate::models::event::*;
use crate::models::shared::{Pagination, escape_like, page_params};
use crate::state::AppState;
use crate::utils::scope::college_in_scope;

const DUPLICATE: &str = "An event with this name already exists on that date";

#[utoipa::path(
    get,
    path = "/{id}/events",
    tag = "Events",
    operation_id = "listEvents",
    summary = "List the events of a college",
    description = "Newest first, optionally limited to a date range.",
    params(("id" = i32, Path, description = "College ID"), EventListQuery),
    responses(
        (status = 200, description = "List of events", body = EventListResponse),
        (status = 400, description = "Invalid date range (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "College not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(college_id))]
pub async fn list_events(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(college_id): Path<i32>,
    Query(query): Query<EventListQuery>,
) -> Result<Json<EventListResponse>, AppError> {
    college_in_scope(&state.db, &auth_user, college_id, "College").await?;
    let (page, per_page) = page_params(query.page, query.per_page);

    if let (Some(from), Some(to)) = (query.from, query.to)
        && from > to
    {
        return Err(AppError::Validation("from must not be after to".into()));
    }

    let mut select = event::Entity::find().filter(event::Column::CollegeId.eq(college_id));
    if let Some(from) = query.from {
        select = select.filter(event::Column::Date.gte(from));
    }
    if let Some(to) = query.to {
        select = select.filter(event::Column::Date.lte(to));
    }
    if let Some(ref search) = query.search {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(event::Column::EventName)))
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
        .order_by_desc(event::Column::Date)
        .order_by_desc(event::Column::Id)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(&state.db)
        .await?
        .into_iter()
        .map(EventResponse::from)
        .collect();

    Ok(Json(EventListResponse {
        data,
        pagination: Pagination::new(page, per_page, total),
    }))
}

#[utoipa::path(
    post,
    path = "/{id}/events",
    tag = "Events",
    operation_id = "createEvent",
    summary = "Create an event",
    description = "Requires `event:manage`. Event names are unique per college and date.",
    params(("id" = i32, Path, description = "College ID")),
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "College not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Duplicate event (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(college_id, event_name = %payload.event_name))]
pub async fn create_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(college_id): Path<i32>,
    ValidJson(payload): ValidJson<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("event:manage")?;
    college_in_scope(&state.db, &auth_user, college_id, "College").await?;

    let model = event::ActiveModel {
        college_id: Set(college_id),
        event_name: Set(payload.event_name.trim().to_string()),
        date: Set(payload.date),
        is_campus_event: Set(payload.is_campus_event.unwrap_or(true)),
        location: Set(payload.location),
        created_by: Set(Some(auth_user.user_id)),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| AppError::on_duplicate(e, DUPLICATE))?;

    Ok((StatusCode::CREATED, Json(EventResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Events",
    operation_id = "getEvent",
    summary = "Get an event",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event details", body = EventResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<EventResponse>, AppError> {
    let model = find_event_in_scope(&state.db, &auth_user, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Events",
    operation_id = "updateEvent",
    summary = "Update an event",
    description = "Partial update. Requires `event:manage`.",
    params(("id" = i32, Path, description = "Event ID")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = EventResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Duplicate event (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidJson(payload): ValidJson<UpdateEventRequest>,
) -> Result<Json<EventResponse>, AppError> {
    auth_user.require_permission("event:manage")?;
    let existing = find_event_in_scope(&state.db, &auth_user, id).await?;

    if payload == UpdateEventRequest::default() {
        return Ok(Json(existing.into()));
    }

    let mut active: event::ActiveModel = existing.into();
    if let Some(ref event_name) = payload.event_name {
        active.event_name = Set(event_name.trim().to_string());
    }
    if let Some(date) = payload.date {
        active.date = Set(date);
    }
    if let Some(is_campus_event) = payload.is_campus_event {
        active.is_campus_event = Set(is_campus_event);
    }
    if let Some(location) = payload.location {
        active.location = Set(location);
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
    tag = "Events",
    operation_id = "deleteEvent",
    summary = "Delete an event",
    description = "Deletes the event with its details, photos and attendance. Requires `event:manage`.",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("event:manage")?;
    let existing = find_event_in_scope(&state.db, &auth_user, id).await?;

    event::Entity::delete_by_id(existing.id)
        .exec(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/{id}/details",
    tag = "Events",
    operation_id = "listEventDetails",
    summary = "List the report entries of an event",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event details in insertion order", body = Vec<EventDetailResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(event_id))]
pub async fn list_event_details(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<i32>,
) -> Result<Json<Vec<EventDetailResponse>>, AppError> {
    find_event_in_scope(&state.db, &auth_user, event_id).await?;

    let rows = event_detail::Entity::find()
        .filter(event_detail::Column::EventId.eq(event_id))
        .order_by_asc(event_detail::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(EventDetailResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/{id}/details",
    tag = "Events",
    operation_id = "createEventDetail",
    summary = "Add a report entry to an event",
    description = "Requires `event:manage`.",
    params(("id" = i32, Path, description = "Event ID")),
    request_body = CreateEventDetailRequest,
    responses(
        (status = 201, description = "Detail added", body = EventDetailResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(event_id))]
pub async fn create_event_detail(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<i32>,
    ValidJson(payload): ValidJson<CreateEventDetailRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("event:manage")?;
    find_event_in_scope(&state.db, &auth_user, event_id).await?;

    let model = event_detail::ActiveModel {
        event_id: Set(event_id),
        description: Set(payload.description),
        expense: Set(payload.expense),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(EventDetailResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}/photos",
    tag = "Events",
    operation_id = "listEventPhotos",
    summary = "List the photos of an event",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Photos, oldest first", body = Vec<PhotoResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(event_id))]
pub async fn list_event_photos(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<i32>,
) -> Result<Json<Vec<PhotoResponse>>, AppError> {
    find_event_in_scope(&state.db, &auth_user, event_id).await?;

    let rows = event_photo::Entity::find()
        .filter(event_photo::Column::EventId.eq(event_id))
        .order_by_asc(event_photo::Column::UploadedAt)
        .order_by_asc(event_photo::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(PhotoResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/{id}/photos",
    tag = "Events",
    operation_id = "addEventPhoto",
    summary = "Attach a photo to an event",
    description = "Records the storage path of an uploaded photo. Requires `event:manage`.",
    params(("id" = i32, Path, description = "Event ID")),
    request_body = CreatePhotoRequest,
    responses(
        (status = 201, description = "Photo attached", body = PhotoResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(event_id))]
pub async fn add_event_photo(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<i32>,
    ValidJson(payload): ValidJson<CreatePhotoRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("event:manage")?;
    find_event_in_scope(&state.db, &auth_user, event_id).await?;

    let model = event_photo::ActiveModel {
        event_id: Set(event_id),
        photo: Set(payload.photo.trim().to_string()),
        uploaded_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(PhotoResponse::from(model))))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Events",
    operation_id = "deleteEventPhoto",
    summary = "Remove a photo from an event",
    description = "Requires `event:manage`.",
    params(("id" = i32, Path, description = "Event photo ID")),
    responses(
        (status = 204, description = "Photo removed"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Photo not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_event_photo(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("event:manage")?;

    let photo = event_photo::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Photo not found".into()))?;
    let owner = event::Entity::find_by_id(photo.event_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Photo not found".into()))?;
    college_in_scope(&state.db, &auth_user, owner.college_id, "Photo").await?;

    event_photo::Entity::delete_by_id(photo.id)
        .exec(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Load an event whose college is inside the caller's scope.
pub(crate) async fn find_event_in_scope<C: ConnectionTrait>(
    db: &C,
    auth_user: &AuthUser,
    id: i32,
) -> Result<event::Model, AppError> {
    let model = event::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".into()))?;
    college_in_scope(db, auth_user, model.college_id, "Event").await?;
    Ok(model)
}
