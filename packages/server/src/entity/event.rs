use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub college_id: i32,
    #[sea_orm(belongs_to, from = "college_id", to = "id", on_delete = "Cascade")]
    pub college: HasOne<super::college::Entity>,

    pub event_name: String,
    pub date: Date,
    pub is_campus_event: bool,
    pub location: Option<String>,

    #[sea_orm(has_many)]
    pub details: HasMany<super::event_detail::Entity>,
    #[sea_orm(has_many)]
    pub photos: HasMany<super::event_photo::Entity>,

    pub created_by: Option<i32>,
}

impl ActiveModelBehavior for ActiveModel {}
