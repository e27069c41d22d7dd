use common::Role;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,
    pub password: String,
    pub role: Role,

    /// Required for `university` users, derived from the college for college staff.
    pub university_id: Option<i32>,
    #[sea_orm(belongs_to, from = "university_id", to = "id", on_delete = "SetNull")]
    pub university: HasOne<super::university::Entity>,

    /// Required for `college_po` and `college_vs` users.
    pub college_id: Option<i32>,
    #[sea_orm(belongs_to, from = "college_id", to = "id", on_delete = "SetNull")]
    pub college: HasOne<super::college::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
