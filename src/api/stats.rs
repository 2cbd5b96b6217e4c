//! Dashboard aggregate endpoint.

use axum::extract::State;

use super::{success, ApiResult};
use crate::views::{dashboard_stats, DashboardStats};
use crate::AppState;

/// GET /api/stats - Counts behind the dashboard cards.
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<DashboardStats> {
    state
        .store
        .read(|store| success(dashboard_stats(store), store.revision_id()))
        .await
}
