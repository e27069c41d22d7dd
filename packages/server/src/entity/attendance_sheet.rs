use common::ApprovalStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One reviewed batch of attendance: an event, a date and an NSS unit.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance_sheet")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub college_id: i32,
    #[sea_orm(belongs_to, from = "college_id", to = "id", on_delete = "Cascade")]
    pub college: HasOne<super::college::Entity>,

    pub event_id: i32,
    #[sea_orm(belongs_to, from = "event_id", to = "id", on_delete = "Cascade")]
    pub event: HasOne<super::event::Entity>,

    pub date: Date,
    pub unit: i32,
    pub status: ApprovalStatus,

    #[sea_orm(has_many)]
    pub entries: HasMany<super::attendance::Entity>,

    /// Reviewer of the sheet, set on approval or rejection.
    pub approved_by: Option<i32>,
    pub created_by: Option<i32>,
    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
