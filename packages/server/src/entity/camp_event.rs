use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "camp_event")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub camp_id: i32,
    #[sea_orm(belongs_to, from = "camp_id", to = "id", on_delete = "Cascade")]
    pub camp: HasOne<super::camp::Entity>,

    pub event_name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub date: Date,

    #[sea_orm(has_many)]
    pub photos: HasMany<super::camp_event_photo::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
