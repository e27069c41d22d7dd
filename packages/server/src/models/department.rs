use common::GradLevel;
use serde::{Deserialize, Serialize};

use super::shared::{double_option, validate_range, validate_text};
use crate::error::AppError;
use crate::extractors::json::Validate;

fn validate_code(code: Option<&str>) -> Result<(), AppError> {
    match code {
        Some(code) => validate_text("Code", code, 20),
        None => Ok(()),
    }
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateDepartmentRequest {
    #[schema(example = "Physics")]
    pub name: String,
    #[schema(example = "PHY")]
    pub code: Option<String>,
}

impl Validate for CreateDepartmentRequest {
    fn validate(&self) -> Result<(), AppError> {
        validate_text("Name", &self.name, 100)?;
        validate_code(self.code.as_deref())
    }
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateDepartmentRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub code: Option<Option<String>>,
}

impl Validate for UpdateDepartmentRequest {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(ref name) = self.name {
            validate_text("Name", name, 100)?;
        }
        validate_code(self.code.as_ref().and_then(|c| c.as_deref()))
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DepartmentResponse {
    #[schema(example = 5)]
    pub id: i32,
    pub name: String,
    pub code: Option<String>,
    #[schema(example = 3)]
    pub college_id: i32,
}

impl From<crate::entity::department::Model> for DepartmentResponse {
    fn from(m: crate::entity::department::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            code: m.code,
            college_id: m.college_id,
        }
    }
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateProgrammeRequest {
    #[schema(example = "BSc Physics")]
    pub name: String,
    #[schema(example = 3)]
    pub duration_years: i32,
    pub grad_level: GradLevel,
    #[schema(example = "BSCPHY")]
    pub code: Option<String>,
}

impl Validate for CreateProgrammeRequest {
    fn validate(&self) -> Result<(), AppError> {
        validate_text("Name", &self.name, 100)?;
        validate_range("Duration", self.duration_years.into(), 1, 10)?;
        validate_code(self.code.as_deref())
    }
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateProgrammeRequest {
    pub name: Option<String>,
    pub duration_years: Option<i32>,
    pub grad_level: Option<GradLevel>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub code: Option<Option<String>>,
}

impl Validate for UpdateProgrammeRequest {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(ref name) = self.name {
            validate_text("Name", name, 100)?;
        }
        if let Some(years) = self.duration_years {
            validate_range("Duration", years.into(), 1, 10)?;
        }
        validate_code(self.code.as_ref().and_then(|c| c.as_deref()))
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProgrammeResponse {
    #[schema(example = 11)]
    pub id: i32,
    pub name: String,
    pub duration_years: i32,
    pub grad_level: GradLevel,
    pub code: Option<String>,
    #[schema(example = 5)]
    pub department_id: i32,
}

impl From<crate::entity::programme::Model> for ProgrammeResponse {
    fn from(m: crate::entity::programme::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            duration_years: m.duration_years,
            grad_level: m.grad_level,
            code: m.code,
            department_id: m.department_id,
        }
    }
}
