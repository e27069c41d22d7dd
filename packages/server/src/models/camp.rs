use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use super::shared::{double_option, validate_bulk_ids, validate_optional_text, validate_text};
use crate::error::AppError;
use crate::extractors::json::Validate;

pub fn validate_date_order(from_date: NaiveDate, to_date: NaiveDate) -> Result<(), AppError> {
    if from_date > to_date {
        return Err(AppError::Validation(
            "Camp start date must not be after its end date".into(),
        ));
    }
    Ok(())
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCampRequest {
    #[schema(example = "Special Camp 2025")]
    pub name: String,
    #[schema(example = "2025-12-20")]
    pub from_date: NaiveDate,
    #[schema(example = "2025-12-26")]
    pub to_date: NaiveDate,
    #[schema(example = "GHSS Pinarayi")]
    pub location: String,
    #[schema(example = "Swachh Bharat")]
    pub theme: Option<String>,
    /// User coordinating the camp; must be staff of the same college.
    pub coordinator_id: Option<i32>,
}

impl Validate for CreateCampRequest {
    fn validate(&self) -> Result<(), AppError> {
        validate_text("Name", &self.name, 100)?;
        validate_text("Location", &self.location, 255)?;
        validate_optional_text("Theme", self.theme.as_deref(), 255)?;
        validate_date_order(self.from_date, self.to_date)
    }
}

/// Partial update. Date order is checked against the merged record.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateCampRequest {
    pub name: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub location: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub theme: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub coordinator_id: Option<Option<i32>>,
}

impl Validate for UpdateCampRequest {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(ref name) = self.name {
            validate_text("Name", name, 100)?;
        }
        if let Some(ref location) = self.location {
            validate_text("Location", location, 255)?;
        }
        validate_optional_text(
            "Theme",
            self.theme.as_ref().and_then(|t| t.as_deref()),
            255,
        )
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CampResponse {
    #[schema(example = 4)]
    pub id: i32,
    pub college_id: i32,
    pub name: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub location: String,
    pub theme: Option<String>,
    pub coordinator_id: Option<i32>,
}

impl From<crate::entity::camp::Model> for CampResponse {
    fn from(m: crate::entity::camp::Model) -> Self {
        Self {
            id: m.id,
            college_id: m.college_id,
            name: m.name,
            from_date: m.from_date,
            to_date: m.to_date,
            location: m.location,
            theme: m.theme,
            coordinator_id: m.coordinator_id,
        }
    }
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AddAttendeesRequest {
    #[schema(example = json!([17, 18, 21]))]
    pub volunteer_ids: Vec<i32>,
}

impl Validate for AddAttendeesRequest {
    fn validate(&self) -> Result<(), AppError> {
        validate_bulk_ids(&self.volunteer_ids, "volunteer", 500)
    }
}

#[derive(Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct CampAttendeeResponse {
    pub volunteer_id: i32,
    pub name: String,
    pub unit: i32,
    pub registered_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AddAttendeesResponse {
    /// Volunteers newly registered; already registered ones are skipped.
    pub added: u64,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCampEventRequest {
    #[schema(example = "Road cleaning drive")]
    pub event_name: String,
    pub description: String,
    /// Must fall within the camp dates.
    #[schema(example = "2025-12-21")]
    pub date: NaiveDate,
}

impl Validate for CreateCampEventRequest {
    fn validate(&self) -> Result<(), AppError> {
        validate_text("Event name", &self.event_name, 60)?;
        validate_text("Description", &self.description, 10_000)
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CampEventResponse {
    pub id: i32,
    pub camp_id: i32,
    pub event_name: String,
    pub description: String,
    pub date: NaiveDate,
}

impl From<crate::entity::camp_event::Model> for CampEventResponse {
    fn from(m: crate::entity::camp_event::Model) -> Self {
        Self {
            id: m.id,
            camp_id: m.camp_id,
            event_name: m.event_name,
            description: m.description,
            date: m.date,
        }
    }
}
