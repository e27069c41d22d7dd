use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Field-level checks run on a request body before the handler sees it.
pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

/// A `Json<T>` wrapper that rejects malformed bodies and bodies failing
/// [`Validate`] with `AppError::Validation`, so clients always receive a
/// structured JSON error.
///
/// Checks that need the database (scope, references, uniqueness) stay in the
/// handler.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        value.validate()?;
        Ok(ValidJson(value))
    }
}
