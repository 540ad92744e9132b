//! Request extractors.

use axum::extract::{FromRequest, FromRequestParts};

use crate::ApiError;

/// JSON body extractor whose rejections use the API error shape.
///
/// A missing or malformed field answers 400 `missing_field` before any
/// domain code runs.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Path extractor; an id that does not parse answers 400 `validation_error`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PathParam<T>(pub T);
