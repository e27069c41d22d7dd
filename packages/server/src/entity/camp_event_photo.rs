use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "camp_event_photo")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub camp_event_id: i32,
    #[sea_orm(belongs_to, from = "camp_event_id", to = "id", on_delete = "Cascade")]
    pub camp_event: HasOne<super::camp_event::Entity>,

    pub photo: String,
    pub uploaded_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
