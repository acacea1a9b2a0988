use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common::{ErrorBody, ErrorCode};
use thiserror::Error;
use tracing::{debug, warn};

/// Failure of a gateway call, always rendered as an [`ErrorBody`].
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The upstream answered with a non-success status.
    #[error("{upstream} service returned {status}: {}", body.message)]
    Upstream { upstream: &'static str, status: StatusCode, body: ErrorBody },
    /// Connect failure or timeout.
    #[error("{0} service unavailable")]
    Unavailable(&'static str),
    #[error("invalid response from {upstream} service: {detail}")]
    Decode { upstream: &'static str, detail: String },
    #[error("validation error: {0}")]
    Validation(String),
}

impl GatewayError {
    pub fn code(&self) -> ErrorCode {
        match self {
            GatewayError::Upstream { body, .. } => body.code,
            GatewayError::Unavailable(_) => ErrorCode::UpstreamUnavailable,
            GatewayError::Decode { .. } => ErrorCode::Internal,
            GatewayError::Validation(_) => ErrorCode::Validation,
        }
    }

    /// Build from a non-success upstream reply; bodies that are not an
    /// [`ErrorBody`] keep the status and get a generic message.
    pub fn from_reply(upstream: &'static str, status: StatusCode, bytes: &[u8]) -> Self {
        let body = serde_json::from_slice::<ErrorBody>(bytes)
            .unwrap_or_else(|_| ErrorBody::new(ErrorCode::from_status(status), "service error"));
        GatewayError::Upstream { upstream, status, body }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let code = self.code();
        if code.is_client_error() {
            debug!(code = ?code, error = %self, "gateway call rejected");
        } else {
            warn!(code = ?code, error = %self, "gateway call failed");
        }
        match self {
            GatewayError::Upstream { status, body, .. } => (status, axum::Json(body)).into_response(),
            GatewayError::Unavailable(_) => {
                ErrorBody::new(ErrorCode::UpstreamUnavailable, "service unavailable").into_response()
            }
            GatewayError::Decode { .. } => (
                StatusCode::BAD_GATEWAY,
                axum::Json(ErrorBody::new(ErrorCode::Internal, "invalid upstream response")),
            )
                .into_response(),
            GatewayError::Validation(message) => ErrorBody::validation(message).into_response(),
        }
    }
}
