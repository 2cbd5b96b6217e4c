//! Extractors whose rejections use the error envelope.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::errors::{AppError, AppErrorWithRevision};
use crate::AppState;

/// `Json` that rejects with `VALIDATION_ERROR` for well-formed JSON of the
/// wrong shape and `BAD_REQUEST` for anything unparseable.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

/// `Path` that rejects with `BAD_REQUEST`.
#[derive(Debug)]
pub struct ApiPath<T>(pub T);

impl<T> FromRequest<AppState> for ApiJson<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = AppErrorWithRevision;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => {
                let error = match &rejection {
                    JsonRejection::JsonDataError(_) => AppError::Validation(rejection.body_text()),
                    _ => AppError::BadRequest(rejection.body_text()),
                };
                Err(with_revision(state, error).await)
            }
        }
    }
}

impl<T> FromRequestParts<AppState> for ApiPath<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = AppErrorWithRevision;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ApiPath(value)),
            Err(rejection) => {
                let error = AppError::BadRequest(rejection.body_text());
                Err(with_revision(state, error).await)
            }
        }
    }
}

async fn with_revision(state: &AppState, error: AppError) -> AppErrorWithRevision {
    tracing::debug!("Rejected request: {}", error);
    AppErrorWithRevision {
        revision_id: state.store.read(|store| store.revision_id()).await,
        error,
    }
}
