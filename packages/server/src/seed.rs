use common::Role;
use sea_orm::sea_query::{Index, IndexCreateStatement, OnConflict};
use sea_orm::*;
use tracing::info;

use crate::config::BootstrapAdmin;
use crate::entity::{
    attendance, attendance_sheet, camp, department, event, programme, role_permission, user,
    volunteer,
};
use crate::utils::hash;

/// Default role-permission mappings seeded on startup.
pub const DEFAULT_MAPPINGS: &[(Role, &str)] = &[
    // Admin: all permissions
    (Role::Admin, "user:manage"),
    (Role::Admin, "university:manage"),
    (Role::Admin, "college:manage"),
    (Role::Admin, "department:manage"),
    (Role::Admin, "volunteer:manage"),
    (Role::Admin, "event:manage"),
    (Role::Admin, "attendance:submit"),
    (Role::Admin, "attendance:approve"),
    (Role::Admin, "camp:manage"),
    // University coordinator
    (Role::University, "department:manage"),
    (Role::University, "attendance:approve"),
    // Program officer
    (Role::CollegePo, "department:manage"),
    (Role::CollegePo, "volunteer:manage"),
    (Role::CollegePo, "event:manage"),
    (Role::CollegePo, "attendance:submit"),
    (Role::CollegePo, "attendance:approve"),
    (Role::CollegePo, "camp:manage"),
    // Volunteer secretary
    (Role::CollegeVs, "volunteer:manage"),
    (Role::CollegeVs, "event:manage"),
    (Role::CollegeVs, "attendance:submit"),
];

/// Seed the `role_permission` table with defaults.
pub async fn seed_role_permissions(db: &DatabaseConnection) -> Result<(), DbErr> {
    let mut perms_inserted = 0u32;
    for &(role, permission) in DEFAULT_MAPPINGS {
        let model = role_permission::ActiveModel {
            role: Set(role.as_str().to_string()),
            permission: Set(permission.to_string()),
        };

        let result = role_permission::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    role_permission::Column::Role,
                    role_permission::Column::Permission,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(n) if n > 0 => perms_inserted += 1,
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if perms_inserted > 0 {
        info!("Seeded {} new role-permission mappings", perms_inserted);
    }

    Ok(())
}

/// Create the configured admin account if no user with that name exists.
pub async fn ensure_bootstrap_admin(
    db: &DatabaseConnection,
    admin: &BootstrapAdmin,
) -> Result<(), anyhow::Error> {
    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(&admin.username))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let password = hash::hash_password(&admin.password)
        .map_err(|e| anyhow::anyhow!("Password hash error: {}", e))?;
    user::ActiveModel {
        username: Set(admin.username.clone()),
        password: Set(password),
        role: Set(Role::Admin),
        university_id: Set(None),
        college_id: Set(None),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(username = %admin.username, "Created bootstrap admin");
    Ok(())
}

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite unique keys,
/// so we create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let indexes = [
        (
            "uq_department_name_college",
            Index::create()
                .if_not_exists()
                .unique()
                .name("uq_department_name_college")
                .table(department::Entity)
                .col(department::Column::Name)
                .col(department::Column::CollegeId)
                .to_owned(),
        ),
        (
            "uq_programme_name_department",
            Index::create()
                .if_not_exists()
                .unique()
                .name("uq_programme_name_department")
                .table(programme::Entity)
                .col(programme::Column::Name)
                .col(programme::Column::DepartmentId)
                .to_owned(),
        ),
        (
            "uq_volunteer_roll_no_college",
            Index::create()
                .if_not_exists()
                .unique()
                .name("uq_volunteer_roll_no_college")
                .table(volunteer::Entity)
                .col(volunteer::Column::RollNo)
                .col(volunteer::Column::CollegeId)
                .to_owned(),
        ),
        (
            "uq_event_name_college_date",
            Index::create()
                .if_not_exists()
                .unique()
                .name("uq_event_name_college_date")
                .table(event::Entity)
                .col(event::Column::EventName)
                .col(event::Column::CollegeId)
                .col(event::Column::Date)
                .to_owned(),
        ),
        (
            "uq_attendance_sheet_date_unit_college_event",
            Index::create()
                .if_not_exists()
                .unique()
                .name("uq_attendance_sheet_date_unit_college_event")
                .table(attendance_sheet::Entity)
                .col(attendance_sheet::Column::Date)
                .col(attendance_sheet::Column::Unit)
                .col(attendance_sheet::Column::CollegeId)
                .col(attendance_sheet::Column::EventId)
                .to_owned(),
        ),
        (
            "uq_attendance_volunteer_event_date",
            Index::create()
                .if_not_exists()
                .unique()
                .name("uq_attendance_volunteer_event_date")
                .table(attendance::Entity)
                .col(attendance::Column::VolunteerId)
                .col(attendance::Column::EventId)
                .col(attendance::Column::Date)
                .to_owned(),
        ),
        (
            "uq_camp_name_college_from_date",
            Index::create()
                .if_not_exists()
                .unique()
                .name("uq_camp_name_college_from_date")
                .table(camp::Entity)
                .col(camp::Column::Name)
                .col(camp::Column::CollegeId)
                .col(camp::Column::FromDate)
                .to_owned(),
        ),
    ];

    for (name, stmt) in &indexes {
        create_index(db, name, stmt).await;
    }

    Ok(())
}

async fn create_index(db: &DatabaseConnection, name: &str, stmt: &IndexCreateStatement) {
    let backend = db.get_database_backend();

    match db.execute_raw(backend.build(stmt)).await {
        Ok(_) => info!("Ensured index {} exists", name),
        Err(e) => tracing::warn!("Failed to create index {}: {}", name, e),
    }
}
