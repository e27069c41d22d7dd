//! Fixed choice lists used by volunteer and programme records.

#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(15))")
)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "male"))]
    Male,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "female"))]
    Female,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(15))")
)]
pub enum Community {
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "ST"))]
    #[serde(rename = "ST")]
    St,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "SC"))]
    #[serde(rename = "SC")]
    Sc,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "General"))]
    General,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "OBC"))]
    #[serde(rename = "OBC")]
    Obc,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(15))")
)]
pub enum BloodGroup {
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "A+"))]
    #[serde(rename = "A+")]
    APositive,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "A-"))]
    #[serde(rename = "A-")]
    ANegative,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "B+"))]
    #[serde(rename = "B+")]
    BPositive,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "B-"))]
    #[serde(rename = "B-")]
    BNegative,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "O+"))]
    #[serde(rename = "O+")]
    OPositive,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "O-"))]
    #[serde(rename = "O-")]
    ONegative,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "AB+"))]
    #[serde(rename = "AB+")]
    AbPositive,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "AB-"))]
    #[serde(rename = "AB-")]
    AbNegative,
}

/// Level of study of a programme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")
)]
pub enum GradLevel {
    /// Undergraduate.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "UG"))]
    #[serde(rename = "UG")]
    Ug,
    /// Postgraduate.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "PG"))]
    #[serde(rename = "PG")]
    Pg,
    /// Doctorate.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "PhD"))]
    #[serde(rename = "PhD")]
    Phd,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Diploma"))]
    Diploma,
}

/// Study years a volunteer can be enrolled in.
pub const VOLUNTEER_YEARS: &[i32] = &[1, 2, 3];

/// NSS units a volunteer can be assigned to.
pub const NSS_UNITS: &[i32] = &[4, 5, 96];
