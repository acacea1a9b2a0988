use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use models::course::{self, DEFAULT_CAPACITY};
use models::course_enrollment_count as counter;
use models::enrollment;
use crate::errors::ServiceError;

/// Enrollment request. `capacity` seeds the course counter the first time the
/// course is seen; later requests do not change it.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEnrollment {
    pub student_id: i32,
    pub course_id: i32,
    #[serde(default)]
    pub capacity: Option<i32>,
}

/// Seat accounting for enrollments.
///
/// `count` in the counter row is kept equal to the number of enrollment rows
/// for the course by doing the enrollment write and the counter write in the
/// same transaction.
#[derive(Clone)]
pub struct EnrollmentService {
    db: DatabaseConnection,
}

fn validate_id(field: &str, id: i32) -> Result<i32, ServiceError> {
    if id < 1 {
        return Err(ServiceError::Validation(format!("{field} must be a positive integer")));
    }
    Ok(id)
}

impl EnrollmentService {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    pub fn db(&self) -> &DatabaseConnection { &self.db }

    /// Admit a student: ensure the counter, take a seat, write the row.
    /// A full course or a duplicate pair leaves both tables untouched.
    #[instrument(skip(self, req), fields(student_id = req.student_id, course_id = req.course_id))]
    pub async fn create(&self, req: NewEnrollment) -> Result<enrollment::Model, ServiceError> {
        let student_id = validate_id("studentId", req.student_id)?;
        let course_id = validate_id("courseId", req.course_id)?;
        let capacity = course::validate_capacity(req.capacity.unwrap_or(DEFAULT_CAPACITY))?;

        let txn = self.db.begin().await?;
        counter::ensure(&txn, course_id, capacity).await?;
        if !counter::try_admit(&txn, course_id).await? {
            info!(service = "enrollment", event = "capacity_exceeded", course_id);
            return Err(ServiceError::CapacityExceeded { course_id });
        }
        // a duplicate aborts here and the dropped txn undoes the increment
        let created = enrollment::insert(&txn, student_id, course_id).await?;
        txn.commit().await?;

        info!(service = "enrollment", event = "created", id = created.id, student_id, course_id);
        Ok(created)
    }

    pub async fn list(&self) -> Result<Vec<enrollment::Model>, ServiceError> {
        Ok(enrollment::Entity::find().order_by_asc(enrollment::Column::Id).all(&self.db).await?)
    }

    pub async fn by_student(&self, student_id: i32) -> Result<Vec<enrollment::Model>, ServiceError> {
        Ok(enrollment::Entity::find()
            .filter(enrollment::Column::StudentId.eq(student_id))
            .order_by_asc(enrollment::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn by_course(&self, course_id: i32) -> Result<Vec<enrollment::Model>, ServiceError> {
        Ok(enrollment::Entity::find()
            .filter(enrollment::Column::CourseId.eq(course_id))
            .order_by_asc(enrollment::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Delete by exact key and give the seat back.
    #[instrument(skip(self))]
    pub async fn remove(&self, student_id: i32, course_id: i32) -> Result<enrollment::Model, ServiceError> {
        let txn = self.db.begin().await?;
        let found = enrollment::find_by_key(&txn, student_id, course_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("enrollment"))?;
        found.clone().delete(&txn).await?;
        if !counter::release(&txn, course_id).await? {
            warn!(service = "enrollment", event = "counter_underflow", course_id, "no seat to release; counter out of sync");
        }
        txn.commit().await?;

        info!(service = "enrollment", event = "removed", id = found.id, student_id, course_id);
        Ok(found)
    }

    /// Mirror a new seat limit. Lowering it below the current count is
    /// allowed; new admissions simply fail until enough seats free up.
    #[instrument(skip(self))]
    pub async fn update_capacity(&self, course_id: i32, capacity: i32) -> Result<counter::Model, ServiceError> {
        let course_id = validate_id("courseId", course_id)?;
        let capacity = course::validate_capacity(capacity)?;
        let row = counter::set_capacity(&self.db, course_id, capacity).await?;
        if row.capacity < row.count {
            warn!(service = "enrollment", event = "capacity_below_count", course_id, capacity, count = row.count);
        }
        info!(service = "enrollment", event = "capacity_mirrored", course_id, capacity);
        Ok(row)
    }

    pub async fn counter(&self, course_id: i32) -> Result<counter::Model, ServiceError> {
        counter::find(&self.db, course_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("enrollment counter"))
    }

    /// Drop every enrollment of a deleted student, releasing each seat.
    #[instrument(skip(self))]
    pub async fn purge_student(&self, student_id: i32) -> Result<u64, ServiceError> {
        let txn = self.db.begin().await?;
        let rows = enrollment::Entity::find()
            .filter(enrollment::Column::StudentId.eq(student_id))
            .all(&txn)
            .await?;
        for row in &rows {
            row.clone().delete(&txn).await?;
            if !counter::release(&txn, row.course_id).await? {
                warn!(service = "enrollment", event = "counter_underflow", course_id = row.course_id);
            }
        }
        txn.commit().await?;

        let removed = rows.len() as u64;
        info!(service = "enrollment", event = "student_purged", student_id, removed);
        Ok(removed)
    }

    /// Drop every enrollment of a deleted course together with its counter.
    #[instrument(skip(self))]
    pub async fn purge_course(&self, course_id: i32) -> Result<u64, ServiceError> {
        let txn = self.db.begin().await?;
        let res = enrollment::Entity::delete_many()
            .filter(enrollment::Column::CourseId.eq(course_id))
            .exec(&txn)
            .await?;
        counter::remove(&txn, course_id).await?;
        txn.commit().await?;

        info!(service = "enrollment", event = "course_purged", course_id, removed = res.rows_affected);
        Ok(res.rows_affected)
    }

    /// Recount enrollment rows and store the result.
    #[instrument(skip(self))]
    pub async fn reconcile(&self, course_id: i32) -> Result<counter::Model, ServiceError> {
        let txn = self.db.begin().await?;
        let before = counter::find(&txn, course_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("enrollment counter"))?;
        let actual = enrollment::count_for_course(&txn, course_id).await?;
        let actual = i32::try_from(actual).map_err(|_| ServiceError::Db("enrollment count overflow".into()))?;
        let row = counter::store_count(&txn, course_id, actual).await?;
        txn.commit().await?;

        if before.count != actual {
            warn!(service = "enrollment", event = "counter_reconciled", course_id, stored = before.count, actual);
        }
        Ok(row)
    }
}
