use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "camp_attendance")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub camp_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub volunteer_id: i32,
    #[sea_orm(belongs_to, from = "camp_id", to = "id", on_delete = "Cascade")]
    pub camp: HasOne<super::camp::Entity>,
    #[sea_orm(belongs_to, from = "volunteer_id", to = "id", on_delete = "Cascade")]
    pub volunteer: HasOne<super::volunteer::Entity>,

    pub registered_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
