//! REST API module.
//!
//! Contains all API routes and handlers following the dashboard contract.

mod datastore;
mod extract;
mod records;
mod requests;
mod stats;

pub use datastore::*;
pub use extract::*;
pub use records::*;
pub use requests::*;
pub use stats::*;

use std::collections::HashMap;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::{AppError, AppErrorWithRevision};
use crate::export::export_csv;
use crate::models::Tabular;
use crate::views::{split_names, ListFilter, COLUMNS_PARAM};

/// Success response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub revision_id: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, revision_id: i64) -> Self {
        Self {
            success: true,
            data,
            revision_id,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppErrorWithRevision>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T, revision_id: i64) -> ApiResult<T> {
    Ok(ApiResponse::new(data, revision_id))
}

/// Create an error API response.
pub fn error<T: Serialize>(err: AppError, revision_id: i64) -> ApiResult<T> {
    Err(AppErrorWithRevision {
        error: err,
        revision_id,
    })
}

/// Wrap a store result in the matching envelope.
pub fn respond<T: Serialize>(result: Result<T, AppError>, revision_id: i64) -> ApiResult<T> {
    match result {
        Ok(data) => success(data, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// Filter `items` by the query parameters and render the chosen columns as CSV.
pub fn render_export<T: Tabular>(
    items: &[T],
    params: &HashMap<String, String>,
) -> Result<String, AppError> {
    let filter = ListFilter::from_params::<T>(params)?;
    let columns = match params.get(COLUMNS_PARAM) {
        Some(raw) => split_names::<T>(raw)?,
        None => T::FIELDS.iter().map(|c| c.to_string()).collect(),
    };
    let columns: Vec<&str> = columns.iter().map(String::as_str).collect();

    export_csv(filter.apply(items), &columns)
}

/// A CSV download response.
pub fn csv_attachment(stem: &str, body: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}.csv\"", stem),
            ),
        ],
        body,
    )
        .into_response()
}
