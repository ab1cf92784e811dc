use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicOwner, RefreshRequest},
        extractors::AuthUser,
        services::{authenticate, JwtKeys},
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login/", post(login))
        .route("/auth/refresh/", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/auth/me/", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let owner = authenticate(state.store.as_ref(), &payload.email, &payload.password).await?;
    let owner_id = owner.id;
    let response = JwtKeys::from_ref(&state).issue(owner)?;
    info!(owner_id = %owner_id, "owner logged in");
    Ok(Json(response))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys.verify_refresh(&payload.refresh_token).map_err(|e| {
        warn!(error = %e, "refresh rejected");
        ApiError::Unauthorized("Invalid or expired refresh token".into())
    })?;

    let owner = state
        .store
        .find_owner_by_id(claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Owner not found".into()))?;
    Ok(Json(keys.issue(owner)?))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(owner_id): AuthUser,
) -> Result<Json<PublicOwner>, ApiError> {
    let owner = state
        .store
        .find_owner_by_id(owner_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Owner not found".into()))?;
    Ok(Json(owner.into()))
}
