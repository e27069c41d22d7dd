use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, double_option, validate_optional_text, validate_text};
use crate::error::AppError;
use crate::extractors::json::Validate;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateEventRequest {
    #[schema(example = "Blood Donation Camp")]
    pub event_name: String,
    #[schema(example = "2025-08-12")]
    pub date: NaiveDate,
    /// Defaults to `true`.
    pub is_campus_event: Option<bool>,
    #[schema(example = "Main auditorium")]
    pub location: Option<String>,
}

impl Validate for CreateEventRequest {
    fn validate(&self) -> Result<(), AppError> {
        validate_text("Event name", &self.event_name, 100)?;
        validate_optional_text("Location", self.location.as_deref(), 255)
    }
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateEventRequest {
    pub event_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub is_campus_event: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub location: Option<Option<String>>,
}

impl Validate for UpdateEventRequest {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(ref name) = self.event_name {
            validate_text("Event name", name, 100)?;
        }
        validate_optional_text(
            "Location",
            self.location.as_ref().and_then(|l| l.as_deref()),
            255,
        )
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct EventResponse {
    #[schema(example = 21)]
    pub id: i32,
    #[schema(example = 3)]
    pub college_id: i32,
    pub event_name: String,
    pub date: NaiveDate,
    pub is_campus_event: bool,
    pub location: Option<String>,
    pub created_by: Option<i32>,
}

impl From<crate::entity::event::Model> for EventResponse {
    fn from(m: crate::entity::event::Model) -> Self {
        Self {
            id: m.id,
            college_id: m.college_id,
            event_name: m.event_name,
            date: m.date,
            is_campus_event: m.is_campus_event,
            location: m.location,
            created_by: m.created_by,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct EventListResponse {
    pub data: Vec<EventResponse>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventListQuery {
    #[param(example = 1)]
    pub page: Option<u64>,
    #[param(example = 20)]
    pub per_page: Option<u64>,
    /// Case-insensitive event name search.
    pub search: Option<String>,
    /// Only events on or after this date.
    pub from: Option<NaiveDate>,
    /// Only events on or before this date.
    pub to: Option<NaiveDate>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateEventDetailRequest {
    #[schema(example = "Collected 48 units with the district blood bank.")]
    pub description: String,
    #[schema(example = "Refreshments: 2400")]
    pub expense: Option<String>,
}

impl Validate for CreateEventDetailRequest {
    fn validate(&self) -> Result<(), AppError> {
        validate_text("Description", &self.description, 10_000)?;
        validate_optional_text("Expense", self.expense.as_deref(), 1000)
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct EventDetailResponse {
    pub id: i32,
    pub event_id: i32,
    pub description: String,
    pub expense: Option<String>,
}

impl From<crate::entity::event_detail::Model> for EventDetailResponse {
    fn from(m: crate::entity::event_detail::Model) -> Self {
        Self {
            id: m.id,
            event_id: m.event_id,
            description: m.description,
            expense: m.expense,
        }
    }
}

/// Registers an already stored photo against an event or camp event.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreatePhotoRequest {
    /// Storage path of the photo.
    #[schema(example = "events/2025/blood-donation-1.jpg")]
    pub photo: String,
}

impl Validate for CreatePhotoRequest {
    fn validate(&self) -> Result<(), AppError> {
        validate_text("Photo", &self.photo, 255)
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PhotoResponse {
    pub id: i32,
    pub photo: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<crate::entity::event_photo::Model> for PhotoResponse {
    fn from(m: crate::entity::event_photo::Model) -> Self {
        Self {
            id: m.id,
            photo: m.photo,
            uploaded_at: m.uploaded_at,
        }
    }
}

impl From<crate::entity::camp_event_photo::Model> for PhotoResponse {
    fn from(m: crate::entity::camp_event_photo::Model) -> Self {
        Self {
            id: m.id,
            photo: m.photo,
            uploaded_at: m.uploaded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_name_limit() {
        let req = CreateEventRequest {
            event_name: "x".repeat(101),
            date: NaiveDate::from_ymd_opt(2025, 8, 12).unwrap(),
            is_campus_event: None,
            location: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_blank_photo_path_rejected() {
        let req = CreatePhotoRequest { photo: "  ".into() };
        assert!(req.validate().is_err());
    }
}
