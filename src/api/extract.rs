//! Custom Axum extractors that reject with [`ApiError`].
//!
//! The stock `Json` and `Path` rejections answer with plain text and a
//! mix of 400/415/422; these wrappers keep every rejection in the JSON
//! error shape with status 400.

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::domain::UserId;
use crate::error::ApiError;

/// JSON body extractor mapping every rejection to
/// [`ApiError::MalformedRequest`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::MalformedRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Extracts and parses the `{id}` path segment as a [`UserId`].
#[derive(Debug, Clone, Copy)]
pub struct UserIdPath(pub UserId);

impl<S> FromRequestParts<S> for UserIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::InvalidId(rejection.body_text()))?;

        raw.parse::<UserId>()
            .map(Self)
            .map_err(|_| ApiError::InvalidId(raw))
    }
}
