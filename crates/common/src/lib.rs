//! Building blocks shared by the campus services and the gateway.
//!
//! - `errors`: the error taxonomy every HTTP surface speaks.
//! - `extract`: request extractors whose rejections use that taxonomy.
//! - `types`: small wire types (health).
//! - `utils::logging`: tracing subscriber setup.

pub mod errors;
pub mod extract;
pub mod types;
pub mod utils;

pub use errors::{ErrorBody, ErrorCode};
