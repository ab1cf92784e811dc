use crate::state::AppState;
use axum::Router;

mod claims;
mod dto;
pub mod extractors;
pub mod handlers;
mod password;
pub mod repo;
pub mod repo_types;
pub mod services;

/// Login and refresh; open to anyone.
pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}

/// Routes that need the owner guard layered on top.
pub fn owner_router() -> Router<AppState> {
    handlers::me_routes()
}
