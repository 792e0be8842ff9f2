mod book;

pub use self::book::*;

use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ErrorStatus;

/// JSON body extractor that runs [`Validate`] before the handler sees the value.
pub struct Validated<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for Validated<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ErrorStatus;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| ErrorStatus::BadRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(Validated(value))
    }
}
