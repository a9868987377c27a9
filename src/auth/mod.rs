use crate::state::AppState;
use axum::Router;

mod claims;
pub mod dto;
pub mod extractors;
mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;
pub mod sweeper;

pub use extractors::{AuthUser, BearerToken};

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
