use common::ErrorCode;
use models::errors::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("duplicate: {0}")]
    Duplicate(String),
    #[error("course {course_id} is full")]
    CapacityExceeded { course_id: i32 },
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn code(&self) -> ErrorCode {
        match self {
            ServiceError::Validation(_) => ErrorCode::Validation,
            ServiceError::NotFound(_) => ErrorCode::NotFound,
            ServiceError::Duplicate(_) => ErrorCode::Duplicate,
            ServiceError::CapacityExceeded { .. } => ErrorCode::CapacityExceeded,
            ServiceError::Db(_) => ErrorCode::Internal,
        }
    }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(m) => ServiceError::Validation(m),
            ModelError::NotFound(what) => ServiceError::not_found(&what),
            ModelError::Duplicate(m) => ServiceError::Duplicate(m),
            ModelError::Db(m) => ServiceError::Db(m),
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        ModelError::from(e).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_errors_keep_their_class() {
        let e: ServiceError = ModelError::NotFound("student".into()).into();
        assert_eq!(e.code(), ErrorCode::NotFound);
        assert_eq!(e.to_string(), "not found: student not found");
        let e: ServiceError = ModelError::Duplicate("email".into()).into();
        assert_eq!(e.code(), ErrorCode::Duplicate);
        assert_eq!(ServiceError::CapacityExceeded { course_id: 3 }.code(), ErrorCode::CapacityExceeded);
    }
}
