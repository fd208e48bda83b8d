use crate::state::AppState;
use axum::Router;

pub(crate) mod claims;
pub(crate) mod dto;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
pub mod repo_types;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}
