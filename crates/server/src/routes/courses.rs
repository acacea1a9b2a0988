use axum::{extract::State, http::StatusCode, routing::{get, put}, Json, Router};
use common::extract::{ApiJson, ApiPath};
use common::types::CapacityUpdate;
use models::course::{self, CoursePatch, NewCourse};
use service::course_service;

use super::AppState;
use crate::errors::JsonApiError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list_courses).post(create_course))
        .route("/courses/:id", get(get_course).put(update_course).delete(delete_course))
        .route("/courses/:id/capacity", put(update_capacity))
}

pub async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<course::Model>>, JsonApiError> {
    Ok(Json(course_service::list_courses(&state.db).await?))
}

pub async fn create_course(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewCourse>,
) -> Result<(StatusCode, Json<course::Model>), JsonApiError> {
    let created = course_service::create_course(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_course(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<course::Model>, JsonApiError> {
    Ok(Json(course_service::get_course(&state.db, id).await?))
}

pub async fn update_course(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(patch): ApiJson<CoursePatch>,
) -> Result<Json<course::Model>, JsonApiError> {
    Ok(Json(course_service::update_course(&state.db, id, patch).await?))
}

/// Capacity only; the enrollment counter is not touched here.
pub async fn update_capacity(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(body): ApiJson<CapacityUpdate>,
) -> Result<Json<course::Model>, JsonApiError> {
    Ok(Json(course_service::update_capacity(&state.db, id, body.capacity).await?))
}

pub async fn delete_course(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<course::Model>, JsonApiError> {
    Ok(Json(course_service::delete_course(&state.db, id).await?))
}
