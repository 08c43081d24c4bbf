//! Query string extractor with JSON rejections.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// Like [`Query`], but a missing or malformed field rejects with
/// `400 INVALID_QUERY` in the standard error body.
pub struct RequiredQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for RequiredQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| RequiredQuery(value))
            .map_err(|e| AppError::from(e).into_response())
    }
}
