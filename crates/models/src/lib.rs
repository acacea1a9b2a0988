pub mod errors;
pub mod db;
pub mod student;
pub mod course;
pub mod enrollment;
pub mod course_enrollment_count;

pub use errors::ModelError;
