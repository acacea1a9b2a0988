//! HTTP surface of the student, course and enrollment services.

pub mod errors;
pub mod routes;
pub mod startup;

pub use startup::{run, ServiceKind};
