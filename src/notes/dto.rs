use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;
use validator::Validate;

use super::repo_types::Note;
use crate::validation::validate_not_blank;

/// Create a note, or update one of the caller's notes when `id` is given.
/// Ownership always comes from the token; an `ownerId` in the body is ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct NoteRequest {
    pub id: Option<Uuid>,
    #[validate(custom(function = "validate_not_blank"))]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub color: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub color: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Note> for NoteResponse {
    fn from(n: Note) -> Self {
        Self {
            id: n.id,
            title: n.title,
            content: n.content,
            color: n.color,
            created_at: n.created_at,
        }
    }
}
