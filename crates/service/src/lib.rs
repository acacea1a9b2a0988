//! Service layer providing the business operations behind the three HTTP
//! services.
//! - Students and courses are plain validated CRUD.
//! - Enrollments own the seat-accounting protocol; every multi-step mutation
//!   runs in one database transaction.

pub mod errors;
pub mod student_service;
pub mod course_service;
pub mod enrollment_service;
#[cfg(test)]
pub mod test_support;

pub use errors::ServiceError;
