use common::GradLevel;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "programme")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    pub duration_years: i32,
    pub grad_level: GradLevel,
    pub code: Option<String>,

    pub department_id: i32,
    #[sea_orm(belongs_to, from = "department_id", to = "id", on_delete = "Cascade")]
    pub department: HasOne<super::department::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
