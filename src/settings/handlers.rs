use axum::{extract::State, routing::get, Json, Router};
use tracing::{info, instrument};

use crate::{
    error::ApiError,
    settings::{dto::UpdateSettingsRequest, repo_types::GymSettings},
    state::AppState,
};

const MAX_GRACE_DAYS: i32 = 60;

pub fn settings_routes() -> Router<AppState> {
    Router::new().route("/config/", get(get_settings).put(update_settings))
}

/// Effective settings: without a row, check-in is off.
#[instrument(skip(state))]
pub async fn get_settings(State(state): State<AppState>) -> Result<Json<GymSettings>, ApiError> {
    let settings = state.store.load_settings().await?.unwrap_or(GymSettings {
        qr_active: false,
        ..GymSettings::default()
    });
    Ok(Json(settings))
}

#[instrument(skip(state))]
pub async fn update_settings(
    State(state): State<AppState>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<Json<GymSettings>, ApiError> {
    if !(0..=MAX_GRACE_DAYS).contains(&payload.grace_days) {
        return Err(ApiError::field(
            "grace_days",
            format!("Ensure this value is between 0 and {MAX_GRACE_DAYS}."),
        ));
    }
    let saved = state
        .store
        .save_settings(&GymSettings {
            qr_active: payload.qr_active,
            grace_days: payload.grace_days,
        })
        .await?;
    info!(qr_active = saved.qr_active, grace_days = saved.grace_days, "gym config updated");
    Ok(Json(saved))
}
