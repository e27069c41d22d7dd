#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of an account. Fixed at creation time.
///
/// The role decides which colleges a user can see (see [`crate::access`]) and
/// which affiliation fields are mandatory (see [`crate::affiliation`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Program-wide administrator.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "admin"))]
    Admin,
    /// University coordinator, bound to one university.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "university"))]
    University,
    /// College program officer, bound to one college.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "college_po"))]
    CollegePo,
    /// College volunteer secretary, bound to one college.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "college_vs"))]
    CollegeVs,
}

impl Role {
    pub const ALL: &'static [Role] = &[
        Self::Admin,
        Self::University,
        Self::CollegePo,
        Self::CollegeVs,
    ];

    /// Returns the stored string representation (snake_case).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::University => "university",
            Self::CollegePo => "college_po",
            Self::CollegeVs => "college_vs",
        }
    }

    /// Human-readable label.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::University => "University",
            Self::CollegePo => "College Program Officer",
            Self::CollegeVs => "College Volunteer Secretary",
        }
    }

    /// Returns true for the two college staff roles.
    pub fn is_college_staff(&self) -> bool {
        matches!(self, Self::CollegePo | Self::CollegeVs)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
