//! Aggregating gateway in front of the student, course and enrollment
//! services.

pub mod bootstrap;
pub mod clients;
pub mod config;
pub mod errors;
pub mod observability;
pub mod routes;
pub mod service;

pub use bootstrap::run;
