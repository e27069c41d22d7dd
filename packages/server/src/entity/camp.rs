use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "camp")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub college_id: i32,
    #[sea_orm(belongs_to, from = "college_id", to = "id", on_delete = "Cascade")]
    pub college: HasOne<super::college::Entity>,

    pub name: String,
    pub from_date: Date,
    pub to_date: Date,
    pub location: String,
    pub theme: Option<String>,
    pub coordinator_id: Option<i32>,

    #[sea_orm(has_many)]
    pub events: HasMany<super::camp_event::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
