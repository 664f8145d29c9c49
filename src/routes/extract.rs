//! Request extractors shared by the resource routers.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, OptionalFromRequestParts, Query, Request,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::AppError;

/// Caller identity carried verbatim in the `Authorization` header.
///
/// The value is a gamer `uid`; it is looked up, never verified.
#[derive(Debug, Clone)]
pub struct Caller(pub String);

impl Caller {
    fn from_parts(parts: &Parts) -> Result<Option<Self>, AppError> {
        let Some(value) = parts.headers.get(AUTHORIZATION) else {
            return Ok(None);
        };

        let uid = value
            .to_str()
            .map_err(|_| {
                AppError::BadRequest("Authorization header must be visible ASCII".into())
            })?
            .trim();

        if uid.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self(uid.to_owned())))
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_parts(parts)?.ok_or_else(|| {
            AppError::Unauthorized("Authentication credentials were not provided.".into())
        })
    }
}

impl<S> OptionalFromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Self::from_parts(parts)
    }
}

/// JSON body whose rejections are rendered as `{message}` errors.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Query string whose rejections are rendered as `{message}` errors.
#[derive(Debug)]
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}
