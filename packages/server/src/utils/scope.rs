use std::collections::BTreeSet;

use common::{AccessScope, CollegeSnapshot, resolve_accessible_colleges};
use sea_orm::sea_query::Query as SeaQuery;
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QuerySelect};

use crate::entity::{college, university};
use crate::error::AppError;
use crate::extractors::auth::AuthUser;

/// Load the `(college, university)` pairs the resolver is evaluated against.
pub async fn college_snapshot<C: ConnectionTrait>(db: &C) -> Result<CollegeSnapshot, DbErr> {
    let rows: Vec<(i32, i32)> = college::Entity::find()
        .select_only()
        .column(college::Column::Id)
        .column(college::Column::UniversityId)
        .into_tuple()
        .all(db)
        .await?;
    Ok(CollegeSnapshot::new(rows))
}

/// Ids of every college the caller may access.
pub async fn accessible_college_ids<C: ConnectionTrait>(
    db: &C,
    auth_user: &AuthUser,
) -> Result<BTreeSet<i32>, AppError> {
    let snapshot = college_snapshot(db).await?;
    Ok(resolve_accessible_colleges(&auth_user.context(), &snapshot))
}

/// SQL filter restricting a college id column to the given scope.
pub fn college_condition<Col: ColumnTrait>(scope: AccessScope, column: Col) -> Condition {
    match scope {
        AccessScope::All => Condition::all(),
        AccessScope::University(university_id) => Condition::all().add(
            column.in_subquery(
                SeaQuery::select()
                    .column(college::Column::Id)
                    .from(college::Entity)
                    .and_where(college::Column::UniversityId.eq(university_id))
                    .to_owned(),
            ),
        ),
        AccessScope::College(college_id) => Condition::all().add(column.eq(college_id)),
        AccessScope::Nothing => Condition::all().add(column.is_in(Vec::<i32>::new())),
    }
}

/// SQL filter restricting universities to those owning a college in scope.
pub fn university_condition(scope: AccessScope) -> Condition {
    match scope {
        AccessScope::All => Condition::all(),
        AccessScope::University(university_id) => {
            Condition::all().add(university::Column::Id.eq(university_id))
        }
        AccessScope::College(college_id) => Condition::all().add(
            university::Column::Id.in_subquery(
                SeaQuery::select()
                    .column(college::Column::UniversityId)
                    .from(college::Entity)
                    .and_where(college::Column::Id.eq(college_id))
                    .to_owned(),
            ),
        ),
        AccessScope::Nothing => {
            Condition::all().add(university::Column::Id.is_in(Vec::<i32>::new()))
        }
    }
}

/// Load a college the caller may access.
///
/// Colleges outside the caller's scope are reported as missing so their
/// existence is not disclosed. `what` names the record in the 404 message.
pub async fn college_in_scope<C: ConnectionTrait>(
    db: &C,
    auth_user: &AuthUser,
    college_id: i32,
    what: &str,
) -> Result<college::Model, AppError> {
    let not_found = || AppError::NotFound(format!("{what} not found"));
    let model = college::Entity::find_by_id(college_id)
        .one(db)
        .await?
        .ok_or_else(not_found)?;
    if auth_user.scope().permits(model.id, model.university_id) {
        Ok(model)
    } else {
        Err(not_found())
    }
}
