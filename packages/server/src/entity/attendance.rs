use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub sheet_id: i32,
    #[sea_orm(belongs_to, from = "sheet_id", to = "id", on_delete = "Cascade")]
    pub sheet: HasOne<super::attendance_sheet::Entity>,

    pub volunteer_id: i32,
    #[sea_orm(belongs_to, from = "volunteer_id", to = "id", on_delete = "Cascade")]
    pub volunteer: HasOne<super::volunteer::Entity>,

    pub event_id: i32,
    #[sea_orm(belongs_to, from = "event_id", to = "id", on_delete = "Cascade")]
    pub event: HasOne<super::event::Entity>,

    pub date: Date,
    pub hours: i32,
}

impl ActiveModelBehavior for ActiveModel {}
