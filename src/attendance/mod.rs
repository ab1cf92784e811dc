pub mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

/// Kiosk-facing; no owner token required.
pub fn router() -> Router<AppState> {
    handlers::kiosk_routes()
}
