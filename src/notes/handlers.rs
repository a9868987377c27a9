use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get},
    Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{NoteRequest, NoteResponse},
    services,
};
use crate::{
    auth::AuthUser,
    error::AppError,
    extract::{AppPath, ValidatedJson},
    response::ApiResponse,
    state::AppState,
};

pub fn notes_routes() -> Router<AppState> {
    Router::new()
        .route("/notes", get(list_notes).post(add_note))
        .route("/notes/:id", delete(delete_note))
}

#[instrument(skip(state, payload))]
pub async fn add_note(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ValidatedJson(payload): ValidatedJson<NoteRequest>,
) -> Result<ApiResponse<NoteResponse>, AppError> {
    let saved = services::save_note(&state, user_id, payload).await?;
    if saved.created {
        Ok(ApiResponse::created("Note saved", saved.note.into()))
    } else {
        Ok(ApiResponse::ok("Note updated", saved.note.into()))
    }
}

#[instrument(skip(state))]
pub async fn list_notes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<ApiResponse<Vec<NoteResponse>>, AppError> {
    let notes = services::list_notes(&state, user_id)
        .await?
        .into_iter()
        .map(NoteResponse::from)
        .collect();
    Ok(ApiResponse::ok("Notes fetched successfully", notes))
}

#[instrument(skip(state))]
pub async fn delete_note(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<ApiResponse<()>, AppError> {
    services::delete_note(&state, user_id, id).await?;
    Ok(ApiResponse::message(StatusCode::OK, "Deleted Successfully"))
}
