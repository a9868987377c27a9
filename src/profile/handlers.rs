use axum::{
    extract::State,
    routing::{get, post, put},
    Router,
};
use tracing::instrument;

use super::{
    dto::{ChangePasswordRequest, UpdateProfileRequest},
    services,
};
use crate::{
    auth::{dto::PublicUser, services::user_from_token, AuthUser, BearerToken},
    error::AppError,
    extract::ValidatedJson,
    response::ApiResponse,
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile/me", get(me))
        .route("/profile/edit", put(edit))
        .route("/profile/forget-password", post(change_password))
}

#[instrument(skip_all)]
pub async fn me(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<ApiResponse<PublicUser>, AppError> {
    let user = user_from_token(&state, &token).await?;
    Ok(ApiResponse::ok("User Found", user))
}

#[instrument(skip(state, payload))]
pub async fn edit(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> Result<ApiResponse<PublicUser>, AppError> {
    let user = services::update_profile(&state, user_id, payload).await?;
    Ok(ApiResponse::ok("User updated successfully", user))
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> Result<ApiResponse<()>, AppError> {
    services::change_password(&state, user_id, payload).await?;
    Ok(ApiResponse::message(
        axum::http::StatusCode::OK,
        "Password Changed successfully",
    ))
}
