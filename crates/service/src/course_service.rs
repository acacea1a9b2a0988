use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryOrder, Set};
use tracing::{info, instrument};

use models::course::{self, CoursePatch, NewCourse};
use crate::errors::ServiceError;

/// Create a course; capacity defaults to [`course::DEFAULT_CAPACITY`].
#[instrument(skip(db, input), fields(name = %input.name))]
pub async fn create_course(db: &DatabaseConnection, input: NewCourse) -> Result<course::Model, ServiceError> {
    let created = course::create(db, input).await?;
    info!(service = "course", event = "created", id = created.id, capacity = created.capacity);
    Ok(created)
}

pub async fn list_courses(db: &DatabaseConnection) -> Result<Vec<course::Model>, ServiceError> {
    Ok(course::Entity::find().order_by_asc(course::Column::Id).all(db).await?)
}

pub async fn get_course(db: &DatabaseConnection, id: i32) -> Result<course::Model, ServiceError> {
    course::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("course"))
}

pub async fn update_course(db: &DatabaseConnection, id: i32, patch: CoursePatch) -> Result<course::Model, ServiceError> {
    Ok(course::update(db, id, patch).await?)
}

/// Change only the seat limit. The enrollment counter is mirrored separately.
#[instrument(skip(db))]
pub async fn update_capacity(db: &DatabaseConnection, id: i32, capacity: i32) -> Result<course::Model, ServiceError> {
    let capacity = course::validate_capacity(capacity)?;
    let mut am: course::ActiveModel = get_course(db, id).await?.into();
    am.capacity = Set(capacity);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    info!(service = "course", event = "capacity_updated", id, capacity);
    Ok(updated)
}

#[instrument(skip(db))]
pub async fn delete_course(db: &DatabaseConnection, id: i32) -> Result<course::Model, ServiceError> {
    let found = get_course(db, id).await?;
    found.clone().delete(db).await?;
    info!(service = "course", event = "deleted", id);
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn course_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;

        let c = create_course(&db, NewCourse { name: "Algebra".into(), capacity: Some(2), ..Default::default() }).await?;
        assert_eq!(c.capacity, 2);

        let patch = CoursePatch { description: Some("linear".into()), ..Default::default() };
        let c = update_course(&db, c.id, patch).await?;
        assert_eq!(c.description.as_deref(), Some("linear"));
        assert_eq!(c.capacity, 2);

        let c = update_capacity(&db, c.id, 40).await?;
        assert_eq!(c.capacity, 40);
        assert_eq!(get_course(&db, c.id).await?.capacity, 40);

        assert_eq!(list_courses(&db).await?.len(), 1);
        delete_course(&db, c.id).await?;
        assert!(list_courses(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn capacity_rules() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let c = create_course(&db, NewCourse { name: "History".into(), ..Default::default() }).await?;
        assert_eq!(c.capacity, course::DEFAULT_CAPACITY);
        assert!(matches!(update_capacity(&db, c.id, 0).await, Err(ServiceError::Validation(_))));
        assert!(matches!(update_capacity(&db, c.id + 1, 10).await, Err(ServiceError::NotFound(_))));
        let zero = NewCourse { name: "Art".into(), capacity: Some(0), ..Default::default() };
        assert!(matches!(create_course(&db, zero).await, Err(ServiceError::Validation(_))));
        Ok(())
    }
}
