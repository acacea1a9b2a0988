use std::sync::Arc;

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, instrument};

use crate::clients::{CourseClient, EnrollmentClient, EnrollmentKey, StudentClient};
use crate::errors::GatewayError;
use crate::observability::{AGGREGATION_DURATION, CAPACITY_MIRROR_FAILURES_TOTAL, CASCADE_FAILURES_TOTAL};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentDetails {
    pub student: Value,
    pub courses: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetails {
    pub course: Value,
    pub enrollment_count: usize,
    pub students: Vec<Value>,
}

/// Enrollment request as accepted by the gateway; `capacity` is optional here.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRequest {
    pub student_id: i32,
    pub course_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i32>,
}

/// Stateless aggregator over the three record services.
#[derive(Clone)]
pub struct GatewayService {
    students: Arc<dyn StudentClient>,
    courses: Arc<dyn CourseClient>,
    enrollments: Arc<dyn EnrollmentClient>,
}

fn decode_keys(rows: Value) -> Result<Vec<EnrollmentKey>, GatewayError> {
    serde_json::from_value(rows).map_err(|e| GatewayError::Decode { upstream: "enrollment", detail: e.to_string() })
}

fn capacity_of(course: &Value) -> Result<i32, GatewayError> {
    course
        .get("capacity")
        .and_then(Value::as_i64)
        .and_then(|c| i32::try_from(c).ok())
        .ok_or_else(|| GatewayError::Decode { upstream: "course", detail: "course without capacity".into() })
}

impl GatewayService {
    pub fn new(
        students: Arc<dyn StudentClient>,
        courses: Arc<dyn CourseClient>,
        enrollments: Arc<dyn EnrollmentClient>,
    ) -> Self {
        Self { students, courses, enrollments }
    }

    pub fn students(&self) -> &dyn StudentClient { self.students.as_ref() }
    pub fn courses(&self) -> &dyn CourseClient { self.courses.as_ref() }
    pub fn enrollments(&self) -> &dyn EnrollmentClient { self.enrollments.as_ref() }

    /// Student plus every course they are enrolled in, in enrollment order.
    /// Any failed call fails the whole view.
    #[instrument(skip(self))]
    pub async fn student_details(&self, student_id: i32) -> Result<StudentDetails, GatewayError> {
        let _timer = AGGREGATION_DURATION.with_label_values(&["student"]).start_timer();
        let (student, rows) = tokio::try_join!(
            self.students.get(student_id),
            self.enrollments.by_student(student_id),
        )?;
        let keys = decode_keys(rows)?;
        let courses = try_join_all(keys.iter().map(|k| self.courses.get(k.course_id))).await?;
        Ok(StudentDetails { student, courses })
    }

    /// Course plus its enrolled students; the count is the enrollment list length.
    #[instrument(skip(self))]
    pub async fn course_details(&self, course_id: i32) -> Result<CourseDetails, GatewayError> {
        let _timer = AGGREGATION_DURATION.with_label_values(&["course"]).start_timer();
        let (course, rows) = tokio::try_join!(
            self.courses.get(course_id),
            self.enrollments.by_course(course_id),
        )?;
        let keys = decode_keys(rows)?;
        let students = try_join_all(keys.iter().map(|k| self.students.get(k.student_id))).await?;
        Ok(CourseDetails { course, enrollment_count: keys.len(), students })
    }

    /// Update the authoritative capacity, then mirror it into the enrollment
    /// counter. The mirror is best effort: its failure is logged and counted
    /// but the caller still gets the updated course.
    #[instrument(skip(self))]
    pub async fn update_course_capacity(&self, course_id: i32, capacity: i32) -> Result<Value, GatewayError> {
        let course = self.courses.update_capacity(course_id, capacity).await?;
        self.mirror(course_id, capacity).await;
        Ok(course)
    }

    /// Forward a course update; a body carrying `capacity` is mirrored too.
    #[instrument(skip(self, body))]
    pub async fn update_course(&self, course_id: i32, body: Value) -> Result<Value, GatewayError> {
        let touches_capacity = body.get("capacity").is_some_and(|c| !c.is_null());
        let course = self.courses.update(course_id, body).await?;
        if touches_capacity {
            self.mirror(course_id, capacity_of(&course)?).await;
        }
        Ok(course)
    }

    async fn mirror(&self, course_id: i32, capacity: i32) {
        if let Err(e) = self.enrollments.mirror_capacity(course_id, capacity).await {
            CAPACITY_MIRROR_FAILURES_TOTAL.inc();
            error!(course_id, capacity, error = %e, "capacity mirror failed; enrollment counter is stale");
        }
    }

    /// Forward an enrollment, resolving a missing capacity from the course.
    #[instrument(skip(self))]
    pub async fn create_enrollment(&self, mut req: EnrollmentRequest) -> Result<Value, GatewayError> {
        if req.capacity.is_none() {
            let course = self.courses.get(req.course_id).await?;
            req.capacity = Some(capacity_of(&course)?);
        }
        let body = serde_json::to_value(req).map_err(|e| GatewayError::Validation(e.to_string()))?;
        self.enrollments.create(body).await
    }

    /// Delete the student, then purge their enrollments (best effort).
    #[instrument(skip(self))]
    pub async fn delete_student(&self, student_id: i32) -> Result<Value, GatewayError> {
        let deleted = self.students.delete(student_id).await?;
        match self.enrollments.purge_student(student_id).await {
            Ok(removed) => info!(student_id, %removed, "student enrollments purged"),
            Err(e) => {
                CASCADE_FAILURES_TOTAL.inc();
                error!(student_id, error = %e, "enrollment purge failed; orphaned enrollments remain");
            }
        }
        Ok(deleted)
    }

    #[instrument(skip(self))]
    pub async fn delete_course(&self, course_id: i32) -> Result<Value, GatewayError> {
        let deleted = self.courses.delete(course_id).await?;
        match self.enrollments.purge_course(course_id).await {
            Ok(removed) => info!(course_id, %removed, "course enrollments purged"),
            Err(e) => {
                CASCADE_FAILURES_TOTAL.inc();
                error!(course_id, error = %e, "enrollment purge failed; orphaned enrollments remain");
            }
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::http::StatusCode;
    use common::{ErrorBody, ErrorCode};
    use serde_json::json;

    use super::*;

    fn not_found(what: &str) -> GatewayError {
        GatewayError::Upstream {
            upstream: "fake",
            status: StatusCode::NOT_FOUND,
            body: ErrorBody::new(ErrorCode::NotFound, format!("{what} not found")),
        }
    }

    /// In-memory stand-in for all three services.
    #[derive(Default)]
    struct FakeUpstream {
        students: Mutex<HashMap<i32, Value>>,
        courses: Mutex<HashMap<i32, Value>>,
        enrollments: Mutex<Vec<EnrollmentKey>>,
        mirrored: Mutex<Vec<(i32, i32)>>,
        purged: Mutex<Vec<String>>,
        enrollment_down: bool,
    }

    impl FakeUpstream {
        fn seeded() -> Self {
            let fake = FakeUpstream::default();
            fake.students.lock().unwrap().insert(1, json!({"id": 1, "firstName": "Ada"}));
            fake.students.lock().unwrap().insert(2, json!({"id": 2, "firstName": "Alan"}));
            for (id, cap) in [(10, 25), (20, 40)] {
                fake.courses.lock().unwrap().insert(id, json!({"id": id, "name": format!("c{id}"), "capacity": cap}));
            }
            // enrollment list order differs from id order on purpose
            fake.enrollments.lock().unwrap().extend([
                EnrollmentKey { student_id: 1, course_id: 20 },
                EnrollmentKey { student_id: 1, course_id: 10 },
                EnrollmentKey { student_id: 2, course_id: 10 },
            ]);
            fake
        }

        fn check_up(&self) -> Result<(), GatewayError> {
            if self.enrollment_down {
                return Err(GatewayError::Unavailable("enrollment"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl StudentClient for FakeUpstream {
        async fn list(&self) -> Result<Value, GatewayError> {
            Ok(Value::Array(self.students.lock().unwrap().values().cloned().collect()))
        }
        async fn get(&self, id: i32) -> Result<Value, GatewayError> {
            self.students.lock().unwrap().get(&id).cloned().ok_or_else(|| not_found("student"))
        }
        async fn create(&self, body: Value) -> Result<Value, GatewayError> { Ok(body) }
        async fn update(&self, _id: i32, body: Value) -> Result<Value, GatewayError> { Ok(body) }
        async fn delete(&self, id: i32) -> Result<Value, GatewayError> {
            self.students.lock().unwrap().remove(&id).ok_or_else(|| not_found("student"))
        }
    }

    #[async_trait]
    impl CourseClient for FakeUpstream {
        async fn list(&self) -> Result<Value, GatewayError> {
            Ok(Value::Array(self.courses.lock().unwrap().values().cloned().collect()))
        }
        async fn get(&self, id: i32) -> Result<Value, GatewayError> {
            self.courses.lock().unwrap().get(&id).cloned().ok_or_else(|| not_found("course"))
        }
        async fn create(&self, body: Value) -> Result<Value, GatewayError> { Ok(body) }
        async fn update(&self, id: i32, body: Value) -> Result<Value, GatewayError> {
            let mut courses = self.courses.lock().unwrap();
            let course = courses.get_mut(&id).ok_or_else(|| not_found("course"))?;
            if let (Some(obj), Some(patch)) = (course.as_object_mut(), body.as_object()) {
                for (k, v) in patch {
                    obj.insert(k.clone(), v.clone());
                }
            }
            Ok(course.clone())
        }
        async fn update_capacity(&self, id: i32, capacity: i32) -> Result<Value, GatewayError> {
            CourseClient::update(self, id, json!({ "capacity": capacity })).await
        }
        async fn delete(&self, id: i32) -> Result<Value, GatewayError> {
            self.courses.lock().unwrap().remove(&id).ok_or_else(|| not_found("course"))
        }
    }

    #[async_trait]
    impl EnrollmentClient for FakeUpstream {
        async fn list(&self) -> Result<Value, GatewayError> {
            self.check_up()?;
            Ok(serde_json::to_value(&*self.enrollments.lock().unwrap()).unwrap())
        }
        async fn by_student(&self, student_id: i32) -> Result<Value, GatewayError> {
            self.check_up()?;
            let rows: Vec<_> = self.enrollments.lock().unwrap().iter().filter(|k| k.student_id == student_id).copied().collect();
            Ok(serde_json::to_value(rows).unwrap())
        }
        async fn by_course(&self, course_id: i32) -> Result<Value, GatewayError> {
            self.check_up()?;
            let rows: Vec<_> = self.enrollments.lock().unwrap().iter().filter(|k| k.course_id == course_id).copied().collect();
            Ok(serde_json::to_value(rows).unwrap())
        }
        async fn create(&self, body: Value) -> Result<Value, GatewayError> {
            self.check_up()?;
            Ok(body)
        }
        async fn remove(&self, student_id: i32, course_id: i32) -> Result<Value, GatewayError> {
            self.check_up()?;
            Ok(json!({"studentId": student_id, "courseId": course_id}))
        }
        async fn mirror_capacity(&self, course_id: i32, capacity: i32) -> Result<Value, GatewayError> {
            self.check_up()?;
            self.mirrored.lock().unwrap().push((course_id, capacity));
            Ok(json!({"courseId": course_id, "capacity": capacity}))
        }
        async fn purge_student(&self, student_id: i32) -> Result<Value, GatewayError> {
            self.check_up()?;
            self.purged.lock().unwrap().push(format!("student:{student_id}"));
            Ok(json!({"removed": 0}))
        }
        async fn purge_course(&self, course_id: i32) -> Result<Value, GatewayError> {
            self.check_up()?;
            self.purged.lock().unwrap().push(format!("course:{course_id}"));
            Ok(json!({"removed": 0}))
        }
    }

    fn gateway(fake: FakeUpstream) -> (GatewayService, Arc<FakeUpstream>) {
        let fake = Arc::new(fake);
        (GatewayService::new(fake.clone(), fake.clone(), fake.clone()), fake)
    }

    #[tokio::test]
    async fn student_details_follow_enrollment_order() -> Result<(), anyhow::Error> {
        let (gw, _) = gateway(FakeUpstream::seeded());
        let details = gw.student_details(1).await?;
        assert_eq!(details.student["firstName"], "Ada");
        let ids: Vec<_> = details.courses.iter().map(|c| c["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![20, 10]);
        Ok(())
    }

    #[tokio::test]
    async fn course_details_count_the_enrollments() -> Result<(), anyhow::Error> {
        let (gw, _) = gateway(FakeUpstream::seeded());
        let details = gw.course_details(10).await?;
        assert_eq!(details.enrollment_count, 2);
        assert_eq!(details.students.len(), 2);
        let json = serde_json::to_value(&details)?;
        assert_eq!(json["enrollmentCount"], 2);
        Ok(())
    }

    #[tokio::test]
    async fn details_fail_fast_on_any_error() {
        let fake = FakeUpstream::seeded();
        fake.enrollments.lock().unwrap().push(EnrollmentKey { student_id: 1, course_id: 99 });
        let (gw, _) = gateway(fake);
        let err = gw.student_details(1).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);

        let err = gw.student_details(42).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn capacity_update_is_mirrored() -> Result<(), anyhow::Error> {
        let (gw, fake) = gateway(FakeUpstream::seeded());
        let course = gw.update_course_capacity(10, 50).await?;
        assert_eq!(course["capacity"], 50);
        assert_eq!(*fake.mirrored.lock().unwrap(), vec![(10, 50)]);
        Ok(())
    }

    #[tokio::test]
    async fn mirror_failure_still_returns_course() -> Result<(), anyhow::Error> {
        let (gw, fake) = gateway(FakeUpstream { enrollment_down: true, ..FakeUpstream::seeded() });
        let before = CAPACITY_MIRROR_FAILURES_TOTAL.get();
        let course = gw.update_course_capacity(20, 5).await?;
        assert_eq!(course["capacity"], 5);
        assert!(fake.mirrored.lock().unwrap().is_empty());
        assert!(CAPACITY_MIRROR_FAILURES_TOTAL.get() > before);
        Ok(())
    }

    #[tokio::test]
    async fn course_update_mirrors_only_capacity_changes() -> Result<(), anyhow::Error> {
        let (gw, fake) = gateway(FakeUpstream::seeded());
        gw.update_course(10, json!({"name": "renamed"})).await?;
        assert!(fake.mirrored.lock().unwrap().is_empty());
        gw.update_course(10, json!({"capacity": 12})).await?;
        assert_eq!(*fake.mirrored.lock().unwrap(), vec![(10, 12)]);
        Ok(())
    }

    #[tokio::test]
    async fn missing_enrollment_capacity_comes_from_course() -> Result<(), anyhow::Error> {
        let (gw, _) = gateway(FakeUpstream::seeded());
        let sent = gw.create_enrollment(EnrollmentRequest { student_id: 2, course_id: 20, capacity: None }).await?;
        assert_eq!(sent, json!({"studentId": 2, "courseId": 20, "capacity": 40}));

        let sent = gw.create_enrollment(EnrollmentRequest { student_id: 2, course_id: 20, capacity: Some(3) }).await?;
        assert_eq!(sent["capacity"], 3);

        let err = gw.create_enrollment(EnrollmentRequest { student_id: 2, course_id: 77, capacity: None }).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
        Ok(())
    }

    #[tokio::test]
    async fn deletes_cascade_best_effort() -> Result<(), anyhow::Error> {
        let (gw, fake) = gateway(FakeUpstream::seeded());
        gw.delete_student(2).await?;
        gw.delete_course(20).await?;
        assert_eq!(*fake.purged.lock().unwrap(), vec!["student:2".to_string(), "course:20".to_string()]);

        let (gw, _) = gateway(FakeUpstream { enrollment_down: true, ..FakeUpstream::seeded() });
        let before = CASCADE_FAILURES_TOTAL.get();
        let deleted = gw.delete_student(1).await?;
        assert_eq!(deleted["id"], 1);
        assert!(CASCADE_FAILURES_TOTAL.get() > before);
        Ok(())
    }
}
