use std::collections::{BTreeSet, HashMap};

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::ApprovalStatus;
use sea_orm::sea_query::LockType;
use sea_orm::*;
use tracing::{info, instrument};

use super::event::find_event_in_scope;
use crate::entity::{attendance, attendance_sheet, volunteer};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::ValidJson;
use crate::models::attendance::*;
use crate::state::AppState;
use crate::utils::scope::college_in_scope;

#[utoipa::path(
    get,
    path = "/{id}/attendance",
    tag = "Attendance",
    operation_id = "listAttendanceSheets",
    summary = "List the attendance sheets of an event",
    params(("id" = i32, Path, description = "Event ID"), AttendanceSheetListQuery),
    responses(
        (status = 200, description = "Sheets, newest date first", body = Vec<AttendanceSheetListItem>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(event_id))]
pub async fn list_sheets(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<i32>,
    Query(query): Query<AttendanceSheetListQuery>,
) -> Result<Json<Vec<AttendanceSheetListItem>>, AppError> {
    find_event_in_scope(&state.db, &auth_user, event_id).await?;

    let mut select =
        attendance_sheet::Entity::find().filter(attendance_sheet::Column::EventId.eq(event_id));
    if let Some(status) = query.status {
        select = select.filter(attendance_sheet::Column::Status.eq(status));
    }
    if let Some(date) = query.date {
        select = select.filter(attendance_sheet::Column::Date.eq(date));
    }
    let sheets = select
        .order_by_desc(attendance_sheet::Column::Date)
        .order_by_asc(attendance_sheet::Column::Unit)
        .all(&state.db)
        .await?;

    let sheet_ids: Vec<i32> = sheets.iter().map(|s| s.id).collect();
    let mut counts: HashMap<i32, i64> = HashMap::new();
    if !sheet_ids.is_empty() {
        let rows: Vec<i32> = attendance::Entity::find()
            .select_only()
            .column(attendance::Column::SheetId)
            .filter(attendance::Column::SheetId.is_in(sheet_ids))
            .into_tuple()
            .all(&state.db)
            .await?;
        for sheet_id in rows {
            *counts.entry(sheet_id).or_default() += 1;
        }
    }

    let data = sheets
        .into_iter()
        .map(|sheet| {
            let count = counts.get(&sheet.id).copied().unwrap_or(0);
            AttendanceSheetListItem::new(sheet, count)
        })
        .collect();

    Ok(Json(data))
}

#[utoipa::path(
    post,
    path = "/{id}/attendance",
    tag = "Attendance",
    operation_id = "submitAttendance",
    summary = "Submit an attendance sheet",
    description = "Records the attendance of one NSS unit at the event on one date. The sheet and all of its rows are written in a single transaction and start out `pending`. Every volunteer must belong to the event's college. Requires `attendance:submit`.",
    params(("id" = i32, Path, description = "Event ID")),
    request_body = SubmitAttendanceRequest,
    responses(
        (status = 201, description = "Sheet submitted", body = AttendanceSheetResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Sheet or volunteer attendance already recorded (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(event_id, date = %payload.date, unit = payload.unit))]
pub async fn submit_sheet(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<i32>,
    ValidJson(payload): ValidJson<SubmitAttendanceRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("attendance:submit")?;

    let txn = state.db.begin().await?;
    let event = find_event_in_scope(&txn, &auth_user, event_id).await?;

    let requested: BTreeSet<i32> = payload.entries.iter().map(|e| e.volunteer_id).collect();
    let found: BTreeSet<i32> = volunteer::Entity::find()
        .select_only()
        .column(volunteer::Column::Id)
        .filter(volunteer::Column::CollegeId.eq(event.college_id))
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
            "Volunteers not enrolled in the event's college: {}",
            missing.join(", ")
        )));
    }

    let sheet = attendance_sheet::ActiveModel {
        college_id: Set(event.college_id),
        event_id: Set(event.id),
        date: Set(payload.date),
        unit: Set(payload.unit),
        status: Set(ApprovalStatus::Pending),
        approved_by: Set(None),
        created_by: Set(Some(auth_user.user_id)),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| {
        AppError::on_duplicate(
            e,
            "Attendance for this event, date and unit was already submitted",
        )
    })?;

    let rows = payload.entries.iter().map(|entry| attendance::ActiveModel {
        sheet_id: Set(sheet.id),
        volunteer_id: Set(entry.volunteer_id),
        event_id: Set(event.id),
        date: Set(payload.date),
        hours: Set(entry.hours),
        ..Default::default()
    });
    attendance::Entity::insert_many(rows)
        .exec(&txn)
        .await
        .map_err(|e| {
            AppError::on_duplicate(
                e,
                "A volunteer already has attendance for this event on that date",
            )
        })?;

    let entries = load_entries(&txn, sheet.id).await?;
    txn.commit().await?;

    info!(sheet_id = sheet.id, entries = entries.len(), "Attendance sheet submitted");
    Ok((
        StatusCode::CREATED,
        Json(AttendanceSheetResponse::new(sheet, entries)),
    ))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Attendance",
    operation_id = "getAttendanceSheet",
    summary = "Get an attendance sheet with its rows",
    params(("id" = i32, Path, description = "Attendance sheet ID")),
    responses(
        (status = 200, description = "Sheet details", body = AttendanceSheetResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Sheet not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_sheet(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<AttendanceSheetResponse>, AppError> {
    let sheet = find_sheet_in_scope(&state.db, &auth_user, id, false).await?;
    let entries = load_entries(&state.db, sheet.id).await?;
    Ok(Json(AttendanceSheetResponse::new(sheet, entries)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Attendance",
    operation_id = "deleteAttendanceSheet",
    summary = "Withdraw an attendance sheet",
    description = "Deletes a pending or rejected sheet and its rows. Approved sheets are final. Requires `attendance:submit`.",
    params(("id" = i32, Path, description = "Attendance sheet ID")),
    responses(
        (status = 204, description = "Sheet deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Sheet not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Sheet already approved (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_sheet(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("attendance:submit")?;

    let txn = state.db.begin().await?;
    let sheet = find_sheet_in_scope(&txn, &auth_user, id, true).await?;
    if sheet.status == ApprovalStatus::Approved {
        return Err(AppError::Conflict(
            "Approved attendance sheets cannot be deleted".into(),
        ));
    }

    attendance::Entity::delete_many()
        .filter(attendance::Column::SheetId.eq(sheet.id))
        .exec(&txn)
        .await?;
    attendance_sheet::Entity::delete_by_id(sheet.id)
        .exec(&txn)
        .await?;

    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/{id}/approve",
    tag = "Attendance",
    operation_id = "approveAttendanceSheet",
    summary = "Approve a pending attendance sheet",
    description = "Moves the sheet from `pending` to `approved` and records the reviewer. Requires `attendance:approve`.",
    params(("id" = i32, Path, description = "Attendance sheet ID")),
    responses(
        (status = 200, description = "Sheet approved", body = AttendanceSheetResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Sheet not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Sheet is not pending (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn approve_sheet(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<AttendanceSheetResponse>, AppError> {
    review_sheet(&state, &auth_user, id, true).await.map(Json)
}

#[utoipa::path(
    post,
    path = "/{id}/reject",
    tag = "Attendance",
    operation_id = "rejectAttendanceSheet",
    summary = "Reject a pending attendance sheet",
    description = "Moves the sheet from `pending` to `rejected` and records the reviewer. Requires `attendance:approve`.",
    params(("id" = i32, Path, description = "Attendance sheet ID")),
    responses(
        (status = 200, description = "Sheet rejected", body = AttendanceSheetResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Sheet not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Sheet is not pending (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn reject_sheet(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<AttendanceSheetResponse>, AppError> {
    review_sheet(&state, &auth_user, id, false).await.map(Json)
}

async fn review_sheet(
    state: &AppState,
    auth_user: &AuthUser,
    id: i32,
    approve: bool,
) -> Result<AttendanceSheetResponse, AppError> {
    auth_user.require_permission("attendance:approve")?;

    let txn = state.db.begin().await?;
    let sheet = find_sheet_in_scope(&txn, auth_user, id, true).await?;
    let next = sheet.status.decide(approve)?;

    let mut active: attendance_sheet::ActiveModel = sheet.into();
    active.status = Set(next);
    active.approved_by = Set(Some(auth_user.user_id));
    let sheet = active.update(&txn).await?;

    let entries = load_entries(&txn, sheet.id).await?;
    txn.commit().await?;

    info!(
        sheet_id = sheet.id,
        status = next.as_str(),
        reviewer = auth_user.user_id,
        "Attendance sheet reviewed"
    );
    Ok(AttendanceSheetResponse::new(sheet, entries))
}

async fn find_sheet_in_scope<C: ConnectionTrait>(
    db: &C,
    auth_user: &AuthUser,
    id: i32,
    for_update: bool,
) -> Result<attendance_sheet::Model, AppError> {
    let mut select = attendance_sheet::Entity::find_by_id(id);
    if for_update {
        select = select.lock(LockType::Update);
    }
    let sheet = select
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Attendance sheet not found".into()))?;
    college_in_scope(db, auth_user, sheet.college_id, "Attendance sheet").await?;
    Ok(sheet)
}

async fn load_entries<C: ConnectionTrait>(
    db: &C,
    sheet_id: i32,
) -> Result<Vec<AttendanceRowResponse>, AppError> {
    let rows = attendance::Entity::find()
        .select_only()
        .column(attendance::Column::Id)
        .column(attendance::Column::VolunteerId)
        .column_as(volunteer::Column::Name, "volunteer_name")
        .column(attendance::Column::Hours)
        .inner_join(volunteer::Entity)
        .filter(attendance::Column::SheetId.eq(sheet_id))
        .order_by_asc(volunteer::Column::Name)
        .order_by_asc(attendance::Column::Id)
        .into_model::<AttendanceRowResponse>()
        .all(db)
        .await?;
    Ok(rows)
}
