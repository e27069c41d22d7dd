use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Unique per (name, college); the index is created in `seed::ensure_indexes`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "department")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    pub code: Option<String>,

    pub college_id: i32,
    #[sea_orm(belongs_to, from = "college_id", to = "id", on_delete = "Cascade")]
    pub college: HasOne<super::college::Entity>,

    #[sea_orm(has_many)]
    pub programmes: HasMany<super::programme::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
