use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("duplicate: {0}")]
    Duplicate(String),
    #[error("database error: {0}")]
    Db(String),
}

impl From<DbErr> for ModelError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => ModelError::Duplicate(detail),
            _ => ModelError::Db(e.to_string()),
        }
    }
}

/// Attach a friendlier description to a unique violation, leave others untouched.
pub(crate) fn on_duplicate(e: DbErr, what: &str) -> ModelError {
    match ModelError::from(e) {
        ModelError::Duplicate(_) => ModelError::Duplicate(what.to_string()),
        other => other,
    }
}

pub(crate) fn require(field: &str, value: &str, max_len: usize) -> Result<String, ModelError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ModelError::Validation(format!("{field} required")));
    }
    if trimmed.chars().count() > max_len {
        return Err(ModelError::Validation(format!("{field} longer than {max_len} characters")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_trims_and_bounds() {
        assert_eq!(require("name", "  Algebra ", 10).unwrap(), "Algebra");
        assert!(matches!(require("name", "   ", 10), Err(ModelError::Validation(_))));
        assert!(matches!(require("name", "abcdefghijk", 10), Err(ModelError::Validation(_))));
    }

    #[test]
    fn non_constraint_errors_stay_db_errors() {
        let err = ModelError::from(DbErr::Custom("boom".into()));
        assert!(matches!(err, ModelError::Db(_)));
    }
}
