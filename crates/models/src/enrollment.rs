use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};

/// One student seated in one course. `(student_id, course_id)` is unique.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "enrollment")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub student_id: i32,
    pub course_id: i32,
    pub enrolled_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

/// Insert on any connection, usually an open transaction.
pub async fn insert<C: ConnectionTrait>(conn: &C, student_id: i32, course_id: i32) -> Result<Model, ModelError> {
    let now = Utc::now().into();
    let am = ActiveModel {
        student_id: Set(student_id),
        course_id: Set(course_id),
        enrolled_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    am.insert(conn).await.map_err(|e| errors::on_duplicate(e, "student already enrolled in course"))
}

pub async fn find_by_key<C: ConnectionTrait>(conn: &C, student_id: i32, course_id: i32) -> Result<Option<Model>, ModelError> {
    let found = Entity::find()
        .filter(Column::StudentId.eq(student_id))
        .filter(Column::CourseId.eq(course_id))
        .one(conn)
        .await?;
    Ok(found)
}

pub async fn count_for_course<C: ConnectionTrait>(conn: &C, course_id: i32) -> Result<u64, ModelError> {
    let n = Entity::find().filter(Column::CourseId.eq(course_id)).count(conn).await?;
    Ok(n)
}
