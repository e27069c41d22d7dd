use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, double_option, validate_text};
use crate::error::AppError;
use crate::extractors::json::Validate;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateUniversityRequest {
    #[schema(example = "Kannur University")]
    pub name: String,
    #[schema(example = "Directorate of Collegiate Education")]
    pub directorate: String,
    /// Email domain of the university, unique when set.
    #[schema(example = "kannuruniv.ac.in")]
    pub domain: Option<String>,
    /// Defaults to `true`.
    pub is_active: Option<bool>,
}

impl Validate for CreateUniversityRequest {
    fn validate(&self) -> Result<(), AppError> {
        validate_text("Name", &self.name, 255)?;
        validate_text("Directorate", &self.directorate, 255)?;
        if let Some(ref domain) = self.domain {
            validate_domain(domain)?;
        }
        Ok(())
    }
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateUniversityRequest {
    pub name: Option<String>,
    pub directorate: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub domain: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl Validate for UpdateUniversityRequest {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(ref name) = self.name {
            validate_text("Name", name, 255)?;
        }
        if let Some(ref directorate) = self.directorate {
            validate_text("Directorate", directorate, 255)?;
        }
        if let Some(Some(ref domain)) = self.domain {
            validate_domain(domain)?;
        }
        Ok(())
    }
}

fn validate_domain(domain: &str) -> Result<(), AppError> {
    validate_text("Domain", domain, 100)?;
    if !domain.contains('.')
        || !domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(AppError::Validation("Domain must be a host name".into()));
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UniversityResponse {
    #[schema(example = 1)]
    pub id: i32,
    pub name: String,
    pub directorate: String,
    pub domain: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::university::Model> for UniversityResponse {
    fn from(m: crate::entity::university::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            directorate: m.directorate,
            domain: m.domain,
            is_active: m.is_active,
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UniversityListResponse {
    pub data: Vec<UniversityResponse>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UniversityListQuery {
    #[param(example = 1)]
    pub page: Option<u64>,
    #[param(example = 20)]
    pub per_page: Option<u64>,
    /// Case-insensitive name search.
    pub search: Option<String>,
}
