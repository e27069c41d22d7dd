#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Review state of an attendance sheet.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(30))")
)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    /// Submitted, waiting for review.
    #[default]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "pending"))]
    Pending,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "approved"))]
    Approved,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "rejected"))]
    Rejected,
}

/// Returned when a review decision is not allowed from the current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Attendance sheet is already {current}")]
pub struct ApprovalError {
    pub current: ApprovalStatus,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Human-readable label.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pending => "Pending for Approval",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    /// Decide a pending sheet. Decisions are final.
    pub fn decide(self, approve: bool) -> Result<Self, ApprovalError> {
        match self {
            Self::Pending if approve => Ok(Self::Approved),
            Self::Pending => Ok(Self::Rejected),
            current => Err(ApprovalError { current }),
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
