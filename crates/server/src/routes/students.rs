use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use common::extract::{ApiJson, ApiPath};
use models::student::{self, NewStudent, StudentPatch};
use service::student_service;

use super::AppState;
use crate::errors::JsonApiError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/students", get(list_students).post(create_student))
        .route("/students/:id", get(get_student).put(update_student).delete(delete_student))
}

pub async fn list_students(State(state): State<AppState>) -> Result<Json<Vec<student::Model>>, JsonApiError> {
    Ok(Json(student_service::list_students(&state.db).await?))
}

pub async fn create_student(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewStudent>,
) -> Result<(StatusCode, Json<student::Model>), JsonApiError> {
    let created = student_service::create_student(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_student(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<student::Model>, JsonApiError> {
    Ok(Json(student_service::get_student(&state.db, id).await?))
}

pub async fn update_student(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(patch): ApiJson<StudentPatch>,
) -> Result<Json<student::Model>, JsonApiError> {
    Ok(Json(student_service::update_student(&state.db, id, patch).await?))
}

pub async fn delete_student(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<student::Model>, JsonApiError> {
    Ok(Json(student_service::delete_student(&state.db, id).await?))
}
