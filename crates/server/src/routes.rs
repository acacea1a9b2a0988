pub mod courses;
pub mod enrollments;
pub mod students;

use axum::{routing::get, Json, Router};
use common::types::Health;
use sea_orm::DatabaseConnection;
use service::enrollment_service::EnrollmentService;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::startup::ServiceKind;

/// Shared by every handler of a service process.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub enrollments: EnrollmentService,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { enrollments: EnrollmentService::new(db.clone()), db }
    }
}

/// Router for one service: its resource routes plus `/health`.
pub fn build_router(kind: ServiceKind, state: AppState) -> Router {
    let name = kind.name();
    let resources = match kind {
        ServiceKind::Student => students::router(),
        ServiceKind::Course => courses::router(),
        ServiceKind::Enrollment => enrollments::router(),
    };

    Router::new()
        .route("/health", get(move || async move { Json(Health::ok(name)) }))
        .merge(resources)
        .with_state(state)
        .layer(CorsLayer::very_permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
