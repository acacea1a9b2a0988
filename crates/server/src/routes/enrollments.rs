use axum::{extract::State, http::StatusCode, routing::{delete, get, post}, Json, Router};
use common::extract::{ApiJson, ApiPath};
use common::types::{CapacityUpdate, Removed};
use models::{course_enrollment_count, enrollment};
use service::enrollment_service::NewEnrollment;

use super::AppState;
use crate::errors::JsonApiError;

type Rows = Json<Vec<enrollment::Model>>;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/enrollments", get(list).post(create))
        .route("/enrollments/student/:id", get(by_student).delete(purge_student))
        .route(
            "/enrollments/course/:id",
            get(by_course).put(update_capacity).delete(purge_course),
        )
        .route("/enrollments/course/:id/count", get(counter))
        .route("/enrollments/course/:id/reconcile", post(reconcile))
        .route("/enrollments/:student_id/:course_id", delete(remove))
}

pub async fn list(State(state): State<AppState>) -> Result<Rows, JsonApiError> {
    Ok(Json(state.enrollments.list().await?))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewEnrollment>,
) -> Result<(StatusCode, Json<enrollment::Model>), JsonApiError> {
    let created = state.enrollments.create(req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn by_student(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<Rows, JsonApiError> {
    Ok(Json(state.enrollments.by_student(id).await?))
}

pub async fn by_course(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<Rows, JsonApiError> {
    Ok(Json(state.enrollments.by_course(id).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    ApiPath((student_id, course_id)): ApiPath<(i32, i32)>,
) -> Result<Json<enrollment::Model>, JsonApiError> {
    Ok(Json(state.enrollments.remove(student_id, course_id).await?))
}

/// Mirror of the course's seat limit.
pub async fn update_capacity(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(body): ApiJson<CapacityUpdate>,
) -> Result<Json<course_enrollment_count::Model>, JsonApiError> {
    Ok(Json(state.enrollments.update_capacity(id, body.capacity).await?))
}

pub async fn counter(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<course_enrollment_count::Model>, JsonApiError> {
    Ok(Json(state.enrollments.counter(id).await?))
}

pub async fn reconcile(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<course_enrollment_count::Model>, JsonApiError> {
    Ok(Json(state.enrollments.reconcile(id).await?))
}

pub async fn purge_student(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<Json<Removed>, JsonApiError> {
    let removed = state.enrollments.purge_student(id).await?;
    Ok(Json(Removed { removed }))
}

pub async fn purge_course(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<Json<Removed>, JsonApiError> {
    let removed = state.enrollments.purge_course(id).await?;
    Ok(Json(Removed { removed }))
}
