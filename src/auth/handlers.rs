use axum::{extract::State, routing::post, Router};
use tracing::instrument;

use super::{
    dto::{LoginRequest, PublicUser, RefreshRequest, RegisterRequest, TokenPair},
    services,
};
use crate::{error::AppError, extract::ValidatedJson, response::ApiResponse, state::AppState};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<ApiResponse<PublicUser>, AppError> {
    let user = services::register(&state, payload).await?;
    Ok(ApiResponse::created("User Registered.", user))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<ApiResponse<TokenPair>, AppError> {
    let pair = services::login(&state, payload).await?;
    Ok(ApiResponse::ok("Login successful", pair))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RefreshRequest>,
) -> Result<ApiResponse<TokenPair>, AppError> {
    let pair = services::refresh(&state, &payload.refresh_token).await?;
    Ok(ApiResponse::ok("Token refreshed", pair))
}
