//! CRUD endpoints shared by trainings, facilities, campuses, schools and users.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use super::{
    csv_attachment, error, render_export, respond, success, ApiJson, ApiPath, ApiResult,
};
use crate::errors::AppErrorWithRevision;
use crate::models::ResourceStatus;
use crate::store::{Activatable, Entity};
use crate::views::ListFilter;
use crate::AppState;

/// Update body: the entity's patch plus an optional version guard.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBody<P> {
    #[serde(flatten)]
    pub changes: P,
    #[serde(default)]
    pub expected_version: Option<i64>,
}

/// Body for `PUT /api/{collection}/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct ResourceStatusChange {
    pub status: ResourceStatus,
}

/// GET /api/{collection} - List records matching the query filters.
pub async fn list_records<T: Entity>(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Vec<T::View>> {
    state
        .store
        .read(|store| {
            let revision_id = store.revision_id();
            match ListFilter::from_params::<T>(&params) {
                Ok(filter) => {
                    let records = filter.apply(store.list::<T>());
                    success(records.into_iter().map(T::view).collect(), revision_id)
                }
                Err(e) => error(e, revision_id),
            }
        })
        .await
}

/// GET /api/{collection}/{id} - Get a single record.
pub async fn get_record<T: Entity>(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<T::View> {
    state
        .store
        .read(|store| respond(store.get::<T>(&id).map(T::view), store.revision_id()))
        .await
}

/// POST /api/{collection} - Create a record.
pub async fn create_record<T: Entity>(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<T::Draft>,
) -> ApiResult<T::View> {
    let (result, revision_id) = state.store.write(|store| store.create::<T>(draft)).await;
    respond(result.map(|record| record.view()), revision_id)
}

/// PUT /api/{collection}/{id} - Update a record.
pub async fn update_record<T: Entity>(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(body): ApiJson<UpdateBody<T::Patch>>,
) -> ApiResult<T::View> {
    let (result, revision_id) = state
        .store
        .write(|store| store.update::<T>(&id, body.changes, body.expected_version))
        .await;
    respond(result.map(|record| record.view()), revision_id)
}

/// DELETE /api/{collection}/{id} - Delete a record.
pub async fn delete_record<T: Entity>(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<()> {
    let (result, revision_id) = state.store.write(|store| store.delete::<T>(&id)).await;
    respond(result, revision_id)
}

/// PUT /api/{collection}/{id}/status - Activate or deactivate a resource.
pub async fn set_record_status<T: Activatable>(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(change): ApiJson<ResourceStatusChange>,
) -> ApiResult<T::View> {
    let (result, revision_id) = state
        .store
        .write(|store| store.set_resource_status::<T>(&id, change.status))
        .await;
    respond(result.map(|record| record.view()), revision_id)
}

/// GET /api/{collection}/export - Download the filtered records as CSV.
pub async fn export_records<T: Entity>(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, AppErrorWithRevision> {
    state
        .store
        .read(|store| {
            render_export(store.list::<T>(), &params)
                .map(|body| csv_attachment(T::PATH, body).into_response())
                .map_err(|error| AppErrorWithRevision {
                    error,
                    revision_id: store.revision_id(),
                })
        })
        .await
}
