use chrono::{DateTime, NaiveDate, Utc};
use common::choices::{NSS_UNITS, VOLUNTEER_YEARS};
use common::{BloodGroup, Community, Sex};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use super::shared::{
    Pagination, double_option, validate_choice, validate_email, validate_range, validate_text,
};
use crate::error::AppError;
use crate::extractors::json::Validate;

const MAX_MOBILE: i64 = 999_999_999_999_999;

fn default_status() -> String {
    "active".into()
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateVolunteerRequest {
    /// Must belong to a department of the same college.
    #[schema(example = 11)]
    pub programme_id: i32,
    #[schema(example = "Anjali Menon")]
    pub name: String,
    /// Defaults to `active`.
    #[serde(default = "default_status")]
    #[schema(example = "active")]
    pub status: String,
    #[schema(example = "Suresh Menon")]
    pub guardian_name: String,
    #[schema(example = 9876543210_i64)]
    pub guardian_mobile: i64,
    pub sex: Sex,
    #[schema(example = "2004-06-15")]
    pub dob: NaiveDate,
    #[schema(example = 2)]
    pub year: i32,
    pub community: Community,
    pub address: String,
    pub blood_group: BloodGroup,
    /// Centimetres.
    #[schema(example = 160)]
    pub height: i32,
    /// Kilograms.
    #[schema(example = 55)]
    pub weight: i32,
    #[schema(example = 96)]
    pub unit: i32,
    #[schema(example = 9123456780_i64)]
    pub mobile: i64,
    #[schema(example = "anjali@example.com")]
    pub email: String,
    #[schema(example = 2023)]
    pub year_of_enrollment: i32,
    #[serde(default)]
    pub cultural_talents: String,
    #[serde(default)]
    pub hobbies: String,
    /// Unique within the college when set.
    #[schema(example = 1042)]
    pub roll_no: Option<i32>,
    /// Storage path of the portrait.
    pub image: Option<String>,
}

impl Validate for CreateVolunteerRequest {
    fn validate(&self) -> Result<(), AppError> {
        validate_text("Name", &self.name, 25)?;
        validate_text("Status", &self.status, 20)?;
        validate_text("Guardian name", &self.guardian_name, 25)?;
        validate_range("Guardian mobile", self.guardian_mobile, 1, MAX_MOBILE)?;
        validate_choice("Year", self.year, VOLUNTEER_YEARS)?;
        validate_text("Address", &self.address, 1000)?;
        validate_range("Height", self.height.into(), 1, 300)?;
        validate_range("Weight", self.weight.into(), 1, 500)?;
        validate_choice("Unit", self.unit, NSS_UNITS)?;
        validate_range("Mobile", self.mobile, 1, MAX_MOBILE)?;
        validate_email("Email", &self.email)?;
        validate_range("Year of enrollment", self.year_of_enrollment.into(), 1900, 2100)?;
        validate_extras(&self.cultural_talents, &self.hobbies)?;
        if let Some(roll_no) = self.roll_no {
            validate_range("Roll number", roll_no.into(), 1, i32::MAX.into())?;
        }
        if let Some(ref image) = self.image {
            validate_text("Image", image, 255)?;
        }
        Ok(())
    }
}

fn validate_extras(cultural_talents: &str, hobbies: &str) -> Result<(), AppError> {
    if cultural_talents.chars().count() > 1000 || hobbies.chars().count() > 1000 {
        return Err(AppError::Validation(
            "Cultural talents and hobbies must be at most 1000 characters".into(),
        ));
    }
    Ok(())
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateVolunteerRequest {
    pub programme_id: Option<i32>,
    pub name: Option<String>,
    pub status: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_mobile: Option<i64>,
    pub sex: Option<Sex>,
    pub dob: Option<NaiveDate>,
    pub year: Option<i32>,
    pub community: Option<Community>,
    pub address: Option<String>,
    pub blood_group: Option<BloodGroup>,
    pub height: Option<i32>,
    pub weight: Option<i32>,
    pub unit: Option<i32>,
    pub mobile: Option<i64>,
    pub email: Option<String>,
    pub year_of_enrollment: Option<i32>,
    pub cultural_talents: Option<String>,
    pub hobbies: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub roll_no: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,
}

impl Validate for UpdateVolunteerRequest {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(ref name) = self.name {
            validate_text("Name", name, 25)?;
        }
        if let Some(ref status) = self.status {
            validate_text("Status", status, 20)?;
        }
        if let Some(ref guardian_name) = self.guardian_name {
            validate_text("Guardian name", guardian_name, 25)?;
        }
        if let Some(mobile) = self.guardian_mobile {
            validate_range("Guardian mobile", mobile, 1, MAX_MOBILE)?;
        }
        if let Some(year) = self.year {
            validate_choice("Year", year, VOLUNTEER_YEARS)?;
        }
        if let Some(ref address) = self.address {
            validate_text("Address", address, 1000)?;
        }
        if let Some(height) = self.height {
            validate_range("Height", height.into(), 1, 300)?;
        }
        if let Some(weight) = self.weight {
            validate_range("Weight", weight.into(), 1, 500)?;
        }
        if let Some(unit) = self.unit {
            validate_choice("Unit", unit, NSS_UNITS)?;
        }
        if let Some(mobile) = self.mobile {
            validate_range("Mobile", mobile, 1, MAX_MOBILE)?;
        }
        if let Some(ref email) = self.email {
            validate_email("Email", email)?;
        }
        if let Some(year) = self.year_of_enrollment {
            validate_range("Year of enrollment", year.into(), 1900, 2100)?;
        }
        validate_extras(
            self.cultural_talents.as_deref().unwrap_or_default(),
            self.hobbies.as_deref().unwrap_or_default(),
        )?;
        if let Some(Some(roll_no)) = self.roll_no {
            validate_range("Roll number", roll_no.into(), 1, i32::MAX.into())?;
        }
        if let Some(Some(ref image)) = self.image {
            validate_text("Image", image, 255)?;
        }
        Ok(())
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct VolunteerResponse {
    pub id: i32,
    pub college_id: i32,
    pub programme_id: i32,
    pub name: String,
    pub status: String,
    pub guardian_name: String,
    pub guardian_mobile: i64,
    pub sex: Sex,
    pub dob: NaiveDate,
    pub year: i32,
    pub community: Community,
    pub address: String,
    pub blood_group: BloodGroup,
    pub height: i32,
    pub weight: i32,
    pub unit: i32,
    pub mobile: i64,
    pub email: String,
    pub year_of_enrollment: i32,
    pub cultural_talents: String,
    pub hobbies: String,
    pub roll_no: Option<i32>,
    pub image: Option<String>,
    pub created_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<crate::entity::volunteer::Model> for VolunteerResponse {
    fn from(m: crate::entity::volunteer::Model) -> Self {
        Self {
            id: m.id,
            college_id: m.college_id,
            programme_id: m.programme_id,
            name: m.name,
            status: m.status,
            guardian_name: m.guardian_name,
            guardian_mobile: m.guardian_mobile,
            sex: m.sex,
            dob: m.dob,
            year: m.year,
            community: m.community,
            address: m.address,
            blood_group: m.blood_group,
            height: m.height,
            weight: m.weight,
            unit: m.unit,
            mobile: m.mobile,
            email: m.email,
            year_of_enrollment: m.year_of_enrollment,
            cultural_talents: m.cultural_talents,
            hobbies: m.hobbies,
            roll_no: m.roll_no,
            image: m.image,
            created_by: m.created_by,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct VolunteerListItem {
    pub id: i32,
    pub name: String,
    pub roll_no: Option<i32>,
    pub programme_id: i32,
    pub year: i32,
    pub unit: i32,
    pub status: String,
    pub mobile: i64,
    pub email: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct VolunteerListResponse {
    pub data: Vec<VolunteerListItem>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VolunteerListQuery {
    #[param(example = 1)]
    pub page: Option<u64>,
    #[param(example = 20)]
    pub per_page: Option<u64>,
    /// Case-insensitive name search.
    pub search: Option<String>,
    pub programme_id: Option<i32>,
    pub year: Option<i32>,
    pub unit: Option<i32>,
}
