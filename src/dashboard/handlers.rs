use axum::{extract::State, routing::get, Json, Router};
use tracing::{debug, instrument};

use crate::{
    dashboard::{dto::DashboardSummary, services::summarize},
    error::ApiError,
    state::AppState,
};

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/dashboard/summary/", get(summary))
}

#[instrument(skip(state))]
pub async fn summary(State(state): State<AppState>) -> Result<Json<DashboardSummary>, ApiError> {
    let today = state.clock.today();
    let members = state.store.list_members(true).await?;
    let visits = state.store.visits_on(today).await?;

    let summary = summarize(today, members, visits);
    debug!(
        active = summary.active_members.count,
        grace = summary.grace_members.count,
        expired = summary.expired_members.count,
        visits = summary.today_visits.count,
        "dashboard summary"
    );
    Ok(Json(summary))
}
