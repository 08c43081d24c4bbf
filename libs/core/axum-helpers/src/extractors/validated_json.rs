//! JSON extractor with validation through the validator crate.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Deserializes the body and runs `Validate` on it.
///
/// Every body rejection (no body, wrong content type, bad syntax, missing or
/// mistyped fields) is `400 JSON_EXTRACTION`. Failed validation is
/// `400 VALIDATION_ERROR` with the per-field errors under `details`.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct CreateCity {
///     #[validate(length(min = 1))]
///     name: String,
/// }
///
/// async fn create_city(ValidatedJson(payload): ValidatedJson<CreateCity>) -> String {
///     payload.name
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        data.validate()
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(ValidatedJson(data))
    }
}
