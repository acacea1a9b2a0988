//! Extractors whose rejections render as [`ErrorBody`] with `VALIDATION`.

use axum::extract::{FromRequest, FromRequestParts};

use crate::errors::ErrorBody;

/// `axum::Json` with a structured rejection.
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(ErrorBody))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Path` with a structured rejection.
#[derive(Debug, Clone, Copy, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ErrorBody))]
pub struct ApiPath<T>(pub T);
