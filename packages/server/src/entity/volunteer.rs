use common::{BloodGroup, Community, Sex};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "volunteer")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub college_id: i32,
    #[sea_orm(belongs_to, from = "college_id", to = "id", on_delete = "Cascade")]
    pub college: HasOne<super::college::Entity>,

    /// Must belong to a department of the same college.
    pub programme_id: i32,
    #[sea_orm(belongs_to, from = "programme_id", to = "id", on_delete = "Cascade")]
    pub programme: HasOne<super::programme::Entity>,

    pub name: String,
    pub status: String,
    pub guardian_name: String,
    pub guardian_mobile: i64,
    pub sex: Sex,
    pub dob: Date,
    /// Study year, one of 1, 2, 3.
    pub year: i32,
    pub community: Community,
    #[sea_orm(column_type = "Text")]
    pub address: String,
    pub blood_group: BloodGroup,
    pub height: i32,
    pub weight: i32,
    /// NSS unit, one of 4, 5, 96.
    pub unit: i32,
    pub mobile: i64,
    pub email: String,
    pub year_of_enrollment: i32,
    #[sea_orm(column_type = "Text")]
    pub cultural_talents: String,
    #[sea_orm(column_type = "Text")]
    pub hobbies: String,
    /// Unique within a college when present.
    pub roll_no: Option<i32>,
    /// Storage path of the uploaded portrait.
    pub image: Option<String>,

    /// NULL once the creating user is deleted.
    pub created_by: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
