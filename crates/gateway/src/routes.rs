use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, put},
    Json, Router,
};
use common::extract::{ApiJson, ApiPath};
use common::types::{CapacityUpdate, Health};
use serde_json::Value;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::errors::GatewayError;
use crate::observability::encode_metrics;
use crate::service::{CourseDetails, EnrollmentRequest, GatewayService, StudentDetails};

type Reply = Result<Json<Value>, GatewayError>;
type Created = Result<(StatusCode, Json<Value>), GatewayError>;

pub async fn health() -> Json<Health> {
    Json(Health::ok("gateway"))
}

async fn metrics() -> (StatusCode, String) {
    encode_metrics()
}

// students

async fn list_students(State(gw): State<GatewayService>) -> Reply {
    Ok(Json(gw.students().list().await?))
}

async fn create_student(State(gw): State<GatewayService>, ApiJson(body): ApiJson<Value>) -> Created {
    Ok((StatusCode::CREATED, Json(gw.students().create(body).await?)))
}

async fn get_student(State(gw): State<GatewayService>, ApiPath(id): ApiPath<i32>) -> Reply {
    Ok(Json(gw.students().get(id).await?))
}

async fn update_student(State(gw): State<GatewayService>, ApiPath(id): ApiPath<i32>, ApiJson(body): ApiJson<Value>) -> Reply {
    Ok(Json(gw.students().update(id, body).await?))
}

async fn delete_student(State(gw): State<GatewayService>, ApiPath(id): ApiPath<i32>) -> Reply {
    Ok(Json(gw.delete_student(id).await?))
}

// courses

async fn list_courses(State(gw): State<GatewayService>) -> Reply {
    Ok(Json(gw.courses().list().await?))
}

async fn create_course(State(gw): State<GatewayService>, ApiJson(body): ApiJson<Value>) -> Created {
    Ok((StatusCode::CREATED, Json(gw.courses().create(body).await?)))
}

async fn get_course(State(gw): State<GatewayService>, ApiPath(id): ApiPath<i32>) -> Reply {
    Ok(Json(gw.courses().get(id).await?))
}

async fn update_course(State(gw): State<GatewayService>, ApiPath(id): ApiPath<i32>, ApiJson(body): ApiJson<Value>) -> Reply {
    Ok(Json(gw.update_course(id, body).await?))
}

async fn update_course_capacity(
    State(gw): State<GatewayService>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(body): ApiJson<CapacityUpdate>,
) -> Reply {
    Ok(Json(gw.update_course_capacity(id, body.capacity).await?))
}

async fn delete_course(State(gw): State<GatewayService>, ApiPath(id): ApiPath<i32>) -> Reply {
    Ok(Json(gw.delete_course(id).await?))
}

// enrollments

async fn list_enrollments(State(gw): State<GatewayService>) -> Reply {
    Ok(Json(gw.enrollments().list().await?))
}

async fn enrollments_by_student(State(gw): State<GatewayService>, ApiPath(id): ApiPath<i32>) -> Reply {
    Ok(Json(gw.enrollments().by_student(id).await?))
}

async fn enrollments_by_course(State(gw): State<GatewayService>, ApiPath(id): ApiPath<i32>) -> Reply {
    Ok(Json(gw.enrollments().by_course(id).await?))
}

async fn create_enrollment(State(gw): State<GatewayService>, ApiJson(req): ApiJson<EnrollmentRequest>) -> Created {
    Ok((StatusCode::CREATED, Json(gw.create_enrollment(req).await?)))
}

async fn remove_enrollment(
    State(gw): State<GatewayService>,
    ApiPath((student_id, course_id)): ApiPath<(i32, i32)>,
) -> Reply {
    Ok(Json(gw.enrollments().remove(student_id, course_id).await?))
}

// aggregated views

async fn student_details(
    State(gw): State<GatewayService>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<StudentDetails>, GatewayError> {
    Ok(Json(gw.student_details(id).await?))
}

async fn course_details(
    State(gw): State<GatewayService>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<CourseDetails>, GatewayError> {
    Ok(Json(gw.course_details(id).await?))
}

fn api() -> Router<GatewayService> {
    Router::new()
        .route("/students", get(list_students).post(create_student))
        .route("/students/:id", get(get_student).put(update_student).delete(delete_student))
        .route("/courses", get(list_courses).post(create_course))
        .route("/courses/:id", get(get_course).put(update_course).delete(delete_course))
        .route("/courses/:id/capacity", put(update_course_capacity))
        .route("/enrollments", get(list_enrollments).post(create_enrollment))
        .route("/enrollments/student/:id", get(enrollments_by_student))
        .route("/enrollments/course/:id", get(enrollments_by_course))
        .route("/enrollments/:student_id/:course_id", delete(remove_enrollment))
        .route("/student-details/:id", get(student_details))
        .route("/course-details/:id", get(course_details))
}

/// Gateway router: the API under `prefix`, plus unprefixed `/health` and `/metrics`.
pub fn build_router(gw: GatewayService, prefix: &str) -> Router {
    let base = Router::new().route("/health", get(health)).route("/metrics", get(metrics));
    let routed = if prefix.is_empty() { base.merge(api()) } else { base.nest(prefix, api()) };

    routed
        .with_state(gw)
        .layer(CorsLayer::very_permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
