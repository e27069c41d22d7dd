use chrono::{DateTime, NaiveDate, Utc};
use common::ApprovalStatus;
use common::choices::NSS_UNITS;
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use super::shared::{validate_bulk_ids, validate_choice, validate_range};
use crate::error::AppError;
use crate::extractors::json::Validate;

/// Upper bound on rows in one submitted sheet.
pub const MAX_SHEET_ENTRIES: usize = 500;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AttendanceEntry {
    #[schema(example = 17)]
    pub volunteer_id: i32,
    /// Hours credited for the day (1-24).
    #[schema(example = 4)]
    pub hours: i32,
}

/// One sheet: the attendance of an NSS unit at an event on one date.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SubmitAttendanceRequest {
    #[schema(example = "2025-08-12")]
    pub date: NaiveDate,
    #[schema(example = 96)]
    pub unit: i32,
    pub entries: Vec<AttendanceEntry>,
}

impl Validate for SubmitAttendanceRequest {
    fn validate(&self) -> Result<(), AppError> {
        validate_choice("Unit", self.unit, NSS_UNITS)?;
        let ids: Vec<i32> = self.entries.iter().map(|e| e.volunteer_id).collect();
        validate_bulk_ids(&ids, "volunteer", MAX_SHEET_ENTRIES)?;
        for entry in &self.entries {
            validate_range("Hours", entry.hours.into(), 1, 24)?;
        }
        Ok(())
    }
}

#[derive(Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct AttendanceRowResponse {
    pub id: i32,
    pub volunteer_id: i32,
    pub volunteer_name: String,
    pub hours: i32,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AttendanceSheetResponse {
    #[schema(example = 8)]
    pub id: i32,
    pub college_id: i32,
    pub event_id: i32,
    pub date: NaiveDate,
    pub unit: i32,
    pub status: ApprovalStatus,
    #[schema(example = "Pending for Approval")]
    pub status_label: &'static str,
    /// Reviewer of the sheet.
    pub approved_by: Option<i32>,
    pub created_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub entries: Vec<AttendanceRowResponse>,
}

impl AttendanceSheetResponse {
    pub fn new(
        m: crate::entity::attendance_sheet::Model,
        entries: Vec<AttendanceRowResponse>,
    ) -> Self {
        Self {
            id: m.id,
            college_id: m.college_id,
            event_id: m.event_id,
            date: m.date,
            unit: m.unit,
            status: m.status,
            status_label: m.status.display_name(),
            approved_by: m.approved_by,
            created_by: m.created_by,
            created_at: m.created_at,
            entries,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AttendanceSheetListItem {
    pub id: i32,
    pub date: NaiveDate,
    pub unit: i32,
    pub status: ApprovalStatus,
    pub status_label: &'static str,
    pub approved_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    /// Number of volunteers on the sheet.
    pub entry_count: i64,
}

impl AttendanceSheetListItem {
    pub fn new(m: crate::entity::attendance_sheet::Model, entry_count: i64) -> Self {
        Self {
            id: m.id,
            date: m.date,
            unit: m.unit,
            status: m.status,
            status_label: m.status.display_name(),
            approved_by: m.approved_by,
            created_at: m.created_at,
            entry_count,
        }
    }
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceSheetListQuery {
    pub status: Option<ApprovalStatus>,
    pub date: Option<NaiveDate>,
}
