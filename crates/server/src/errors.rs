use axum::response::{IntoResponse, Response};
use common::{ErrorBody, ErrorCode};
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// Handler error rendered as `{"code", "message"}` with the code's status.
#[derive(Debug)]
pub struct JsonApiError(pub ErrorBody);

impl JsonApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self(ErrorBody::new(code, message))
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let code = e.code();
        let message = match e {
            ServiceError::Db(detail) => {
                // the client gets a generic message, the log keeps the cause
                error!(error = %detail, "database error");
                "internal error".to_string()
            }
            ServiceError::Validation(m) | ServiceError::NotFound(m) | ServiceError::Duplicate(m) => m,
            ServiceError::CapacityExceeded { course_id } => format!("course {course_id} has no available seats"),
        };
        Self::new(code, message)
    }
}

impl From<ErrorBody> for JsonApiError {
    fn from(body: ErrorBody) -> Self { Self(body) }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        self.0.into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("cannot bind {host}:{port}: {source}")]
    Bind { host: String, port: u16, source: std::io::Error },
}
