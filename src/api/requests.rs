//! Training and rental request endpoints.
//!
//! `{kind}` is `training` or `rental`; anything else is rejected by the path
//! extractor before a handler runs.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};

use super::{
    csv_attachment, error, render_export, respond, success, ApiJson, ApiPath, ApiResult,
};
use crate::errors::AppErrorWithRevision;
use crate::models::{NewRequest, Request, RequestKind, RequestStatusChange};
use crate::views::ListFilter;
use crate::AppState;

/// GET /api/requests/{kind} - List requests matching the query filters.
pub async fn list_requests(
    State(state): State<AppState>,
    ApiPath(kind): ApiPath<RequestKind>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Request>> {
    state
        .store
        .read(|store| {
            let revision_id = store.revision_id();
            match ListFilter::from_params::<Request>(&params) {
                Ok(filter) => {
                    let requests = filter.apply(store.requests(kind));
                    success(requests.into_iter().cloned().collect(), revision_id)
                }
                Err(e) => error(e, revision_id),
            }
        })
        .await
}

/// GET /api/requests/{kind}/{id} - Get a single request.
pub async fn get_request(
    State(state): State<AppState>,
    ApiPath((kind, id)): ApiPath<(RequestKind, String)>,
) -> ApiResult<Request> {
    state
        .store
        .read(|store| respond(store.get_request(kind, &id).cloned(), store.revision_id()))
        .await
}

/// POST /api/requests/{kind} - Submit a new request.
pub async fn submit_request(
    State(state): State<AppState>,
    ApiPath(kind): ApiPath<RequestKind>,
    ApiJson(draft): ApiJson<NewRequest>,
) -> ApiResult<Request> {
    let (result, revision_id) = state
        .store
        .write(|store| store.submit_request(kind, draft))
        .await;
    respond(result, revision_id)
}

/// PUT /api/requests/{kind}/{id}/status - Approve or reject a pending request.
pub async fn set_request_status(
    State(state): State<AppState>,
    ApiPath((kind, id)): ApiPath<(RequestKind, String)>,
    ApiJson(change): ApiJson<RequestStatusChange>,
) -> ApiResult<Request> {
    let (result, revision_id) = state
        .store
        .write(|store| store.set_request_status(kind, &id, change.status))
        .await;
    respond(result, revision_id)
}

/// DELETE /api/requests/{kind}/{id} - Delete a request.
pub async fn delete_request(
    State(state): State<AppState>,
    ApiPath((kind, id)): ApiPath<(RequestKind, String)>,
) -> ApiResult<()> {
    let (result, revision_id) = state
        .store
        .write(|store| store.delete_request(kind, &id))
        .await;
    respond(result, revision_id)
}

/// GET /api/requests/{kind}/export - Download the filtered requests as CSV.
pub async fn export_requests(
    State(state): State<AppState>,
    ApiPath(kind): ApiPath<RequestKind>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, AppErrorWithRevision> {
    let stem = format!("{}-requests", kind.as_str());
    state
        .store
        .read(|store| {
            render_export(store.requests(kind), &params)
                .map(|body| csv_attachment(&stem, body).into_response())
                .map_err(|error| AppErrorWithRevision {
                    error,
                    revision_id: store.revision_id(),
                })
        })
        .await
}
