use serde::{Deserialize, Serialize};

use super::shared::{
    Pagination, double_option, validate_email, validate_optional_text, validate_phone,
    validate_range, validate_text,
};
use crate::error::AppError;
use crate::extractors::json::Validate;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCollegeRequest {
    #[schema(example = "St. Joseph's College")]
    pub name: String,
    #[schema(example = "Directorate of Collegiate Education")]
    pub directorate: String,
    #[schema(example = 1)]
    pub university_id: i32,
    #[schema(example = 96)]
    pub nss_unit: Option<i32>,
    #[schema(example = "nss@stjosephs.ac.in")]
    pub contact_email: Option<String>,
    #[schema(example = "+91 497 2700000")]
    pub contact_phone: Option<String>,
    pub address: Option<String>,
}

fn validate_contact(
    nss_unit: Option<i32>,
    email: Option<&str>,
    phone: Option<&str>,
    address: Option<&str>,
) -> Result<(), AppError> {
    if let Some(unit) = nss_unit {
        validate_range("NSS unit", unit.into(), 1, 9999)?;
    }
    if let Some(email) = email {
        validate_email("Contact email", email)?;
    }
    if let Some(phone) = phone {
        validate_phone("Contact phone", phone)?;
    }
    validate_optional_text("Address", address, 1000)
}

impl Validate for CreateCollegeRequest {
    fn validate(&self) -> Result<(), AppError> {
        validate_text("Name", &self.name, 255)?;
        validate_text("Directorate", &self.directorate, 255)?;
        validate_contact(
            self.nss_unit,
            self.contact_email.as_deref(),
            self.contact_phone.as_deref(),
            self.address.as_deref(),
        )
    }
}

/// Partial update. A college cannot move to another university.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateCollegeRequest {
    pub name: Option<String>,
    pub directorate: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub nss_unit: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub contact_email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub contact_phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub address: Option<Option<String>>,
}

impl Validate for UpdateCollegeRequest {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(ref name) = self.name {
            validate_text("Name", name, 255)?;
        }
        if let Some(ref directorate) = self.directorate {
            validate_text("Directorate", directorate, 255)?;
        }
        validate_contact(
            self.nss_unit.flatten(),
            self.contact_email.as_ref().and_then(|v| v.as_deref()),
            self.contact_phone.as_ref().and_then(|v| v.as_deref()),
            self.address.as_ref().and_then(|v| v.as_deref()),
        )
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CollegeResponse {
    #[schema(example = 3)]
    pub id: i32,
    pub name: String,
    pub directorate: String,
    #[schema(example = 1)]
    pub university_id: i32,
    pub nss_unit: Option<i32>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
}

impl From<crate::entity::college::Model> for CollegeResponse {
    fn from(m: crate::entity::college::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            directorate: m.directorate,
            university_id: m.university_id,
            nss_unit: m.nss_unit,
            contact_email: m.contact_email,
            contact_phone: m.contact_phone,
            address: m.address,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CollegeListResponse {
    pub data: Vec<CollegeResponse>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CollegeListQuery {
    #[param(example = 1)]
    pub page: Option<u64>,
    #[param(example = 20)]
    pub per_page: Option<u64>,
    /// Case-insensitive name search.
    pub search: Option<String>,
    /// Narrow the (already scoped) list to one university.
    pub university_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_rejects_university_change() {
        let result: Result<UpdateCollegeRequest, _> =
            serde_json::from_str(r#"{"university_id": 2}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_contact_checks() {
        let mut req = CreateCollegeRequest {
            name: "Govt. College".into(),
            directorate: "DCE".into(),
            university_id: 1,
            nss_unit: Some(4),
            contact_email: Some("nss@gc.ac.in".into()),
            contact_phone: Some("0497 270000".into()),
            address: None,
        };
        assert!(req.validate().is_ok());
        req.contact_phone = Some("12345678901234567".into());
        assert!(req.validate().is_err());
    }
}
