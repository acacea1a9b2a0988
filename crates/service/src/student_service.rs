use sea_orm::{DatabaseConnection, EntityTrait, ModelTrait, QueryOrder};
use tracing::{info, instrument};

use models::student::{self, NewStudent, StudentPatch};
use crate::errors::ServiceError;

/// Create a student.
#[instrument(skip(db, input), fields(email = %input.email))]
pub async fn create_student(db: &DatabaseConnection, input: NewStudent) -> Result<student::Model, ServiceError> {
    let created = student::create(db, input).await?;
    info!(service = "student", event = "created", id = created.id);
    Ok(created)
}

/// All students, oldest first.
pub async fn list_students(db: &DatabaseConnection) -> Result<Vec<student::Model>, ServiceError> {
    Ok(student::Entity::find().order_by_asc(student::Column::Id).all(db).await?)
}

pub async fn get_student(db: &DatabaseConnection, id: i32) -> Result<student::Model, ServiceError> {
    student::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("student"))
}

/// Partial update; only fields present in `patch` change.
pub async fn update_student(db: &DatabaseConnection, id: i32, patch: StudentPatch) -> Result<student::Model, ServiceError> {
    Ok(student::update(db, id, patch).await?)
}

/// Hard delete; returns the removed record.
#[instrument(skip(db))]
pub async fn delete_student(db: &DatabaseConnection, id: i32) -> Result<student::Model, ServiceError> {
    let found = get_student(db, id).await?;
    found.clone().delete(db).await?;
    info!(service = "student", event = "deleted", id);
    Ok(found)
}
