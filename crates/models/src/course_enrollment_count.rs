//! Per-course occupancy counter.
//!
//! Every mutation here is a single statement so it can be composed inside the
//! caller's transaction. Admission is a conditional increment: the seat check
//! and the write happen in one `UPDATE`, so concurrent callers serialize on
//! the row and cannot overshoot `capacity`.
use sea_orm::{entity::prelude::*, sea_query::{Expr, OnConflict}, ConnectionTrait, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "course_enrollment_count")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub course_id: i32,
    pub count: i32,
    pub capacity: i32,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn seats_left(&self) -> i32 {
        (self.capacity - self.count).max(0)
    }
}

fn fresh(course_id: i32, capacity: i32) -> ActiveModel {
    ActiveModel {
        course_id: Set(course_id),
        count: Set(0),
        capacity: Set(capacity),
        updated_at: Set(Utc::now().into()),
    }
}

pub async fn find<C: ConnectionTrait>(conn: &C, course_id: i32) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(course_id).one(conn).await?)
}

/// Create `{count: 0, capacity}` unless a row already exists. An existing
/// row keeps its capacity.
pub async fn ensure<C: ConnectionTrait>(conn: &C, course_id: i32, capacity: i32) -> Result<(), ModelError> {
    Entity::insert(fresh(course_id, capacity))
        .on_conflict(OnConflict::column(Column::CourseId).do_nothing().to_owned())
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

/// Take one seat. Returns `false` when the course is full (or has no row).
pub async fn try_admit<C: ConnectionTrait>(conn: &C, course_id: i32) -> Result<bool, ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::Count, Expr::col(Column::Count).add(1))
        .col_expr(Column::UpdatedAt, Expr::value(chrono_now()))
        .filter(Column::CourseId.eq(course_id))
        .filter(Expr::col(Column::Count).lt(Expr::col(Column::Capacity)))
        .exec(conn)
        .await?;
    Ok(res.rows_affected == 1)
}

/// Give back one seat, never going below zero. Returns `false` when nothing
/// was decremented.
pub async fn release<C: ConnectionTrait>(conn: &C, course_id: i32) -> Result<bool, ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::Count, Expr::col(Column::Count).sub(1))
        .col_expr(Column::UpdatedAt, Expr::value(chrono_now()))
        .filter(Column::CourseId.eq(course_id))
        .filter(Column::Count.gt(0))
        .exec(conn)
        .await?;
    Ok(res.rows_affected == 1)
}

/// Upsert the capacity ceiling; a missing row starts at `count = 0`.
pub async fn set_capacity<C: ConnectionTrait>(conn: &C, course_id: i32, capacity: i32) -> Result<Model, ModelError> {
    Entity::insert(fresh(course_id, capacity))
        .on_conflict(
            OnConflict::column(Column::CourseId)
                .update_columns([Column::Capacity, Column::UpdatedAt])
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    find(conn, course_id)
        .await?
        .ok_or_else(|| ModelError::NotFound("enrollment counter".into()))
}

/// Overwrite `count` with an externally computed value.
pub async fn store_count<C: ConnectionTrait>(conn: &C, course_id: i32, count: i32) -> Result<Model, ModelError> {
    let mut am: ActiveModel = find(conn, course_id)
        .await?
        .ok_or_else(|| ModelError::NotFound("enrollment counter".into()))?
        .into();
    am.count = Set(count);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(conn).await?)
}

pub async fn remove<C: ConnectionTrait>(conn: &C, course_id: i32) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(course_id).exec(conn).await?;
    Ok(res.rows_affected > 0)
}

fn chrono_now() -> DateTimeWithTimeZone {
    Utc::now().into()
}
