use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::{dto::NoteRequest, repo_types::Note};
use crate::{error::AppError, state::AppState};

/// Outcome of `save_note`: the stored note and whether it was newly created.
#[derive(Debug)]
pub struct SavedNote {
    pub note: Note,
    pub created: bool,
}

/// Creates a note for `owner_id`. With an `id` naming an existing note the
/// note is updated instead, provided the caller owns it.
pub async fn save_note(
    st: &AppState,
    owner_id: Uuid,
    req: NoteRequest,
) -> Result<SavedNote, AppError> {
    if let Some(id) = req.id {
        if let Some(mut existing) = st.notes.find_note(id).await? {
            if existing.owner_id != owner_id {
                warn!(%owner_id, note_id = %id, "note update by non-owner");
                return Err(AppError::Forbidden(
                    "Only the owner of the note can modify it".into(),
                ));
            }
            existing.title = req.title;
            existing.content = req.content;
            existing.color = req.color;
            st.notes.update_note(&existing).await?;
            info!(%owner_id, note_id = %id, "note updated");
            return Ok(SavedNote {
                note: existing,
                created: false,
            });
        }
    }

    let note = Note {
        id: req.id.unwrap_or_else(Uuid::new_v4),
        owner_id,
        title: req.title,
        content: req.content,
        color: req.color,
        created_at: OffsetDateTime::now_utc(),
    };
    st.notes.insert_note(&note).await?;
    info!(%owner_id, note_id = %note.id, "note created");
    Ok(SavedNote {
        note,
        created: true,
    })
}

pub async fn list_notes(st: &AppState, owner_id: Uuid) -> Result<Vec<Note>, AppError> {
    Ok(st.notes.list_by_owner(owner_id).await?)
}

pub async fn delete_note(st: &AppState, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
    let note = st
        .notes
        .find_note(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Note not found {}", id)))?;

    if note.owner_id != owner_id {
        warn!(%owner_id, note_id = %id, "note delete by non-owner");
        return Err(AppError::Forbidden(
            "Only the owner of the note can delete it".into(),
        ));
    }

    if !st.notes.delete_note(id).await? {
        return Err(AppError::NotFound(format!("Note not found {}", id)));
    }
    info!(%owner_id, note_id = %id, "note deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(title: &str) -> NoteRequest {
        NoteRequest {
            id: None,
            title: title.into(),
            content: "body".into(),
            color: 0xFF00FF,
        }
    }

    #[tokio::test]
    async fn list_returns_only_own_notes() {
        let st = AppState::fake();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        save_note(&st, alice, req("a1")).await.unwrap();
        save_note(&st, alice, req("a2")).await.unwrap();
        save_note(&st, bob, req("b1")).await.unwrap();

        let notes = list_notes(&st, alice).await.unwrap();
        assert_eq!(notes.len(), 2);
        assert!(notes.iter().all(|n| n.owner_id == alice));
    }

    #[tokio::test]
    async fn only_owner_can_delete() {
        let st = AppState::fake();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let note = save_note(&st, alice, req("mine")).await.unwrap().note;

        let err = delete_note(&st, bob, note.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(list_notes(&st, alice).await.unwrap().len(), 1);

        delete_note(&st, alice, note.id).await.unwrap();
        assert!(list_notes(&st, alice).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_unknown_note_is_not_found() {
        let st = AppState::fake();
        let err = delete_note(&st, Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn save_with_id_updates_own_note_in_place() {
        let st = AppState::fake();
        let alice = Uuid::new_v4();
        let note = save_note(&st, alice, req("draft")).await.unwrap().note;

        let updated = save_note(
            &st,
            alice,
            NoteRequest {
                id: Some(note.id),
                title: "final".into(),
                content: "done".into(),
                color: 1,
            },
        )
        .await
        .unwrap();

        assert!(!updated.created);
        assert_eq!(updated.note.id, note.id);
        assert_eq!(updated.note.created_at, note.created_at);
        let notes = list_notes(&st, alice).await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "final");
    }

    #[tokio::test]
    async fn save_with_foreign_id_is_forbidden() {
        let st = AppState::fake();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let note = save_note(&st, alice, req("mine")).await.unwrap().note;

        let err = save_note(
            &st,
            bob,
            NoteRequest {
                id: Some(note.id),
                title: "hijack".into(),
                content: String::new(),
                color: 0,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(list_notes(&st, alice).await.unwrap()[0].title, "mine");
    }

    #[tokio::test]
    async fn save_with_unknown_id_creates_note_with_that_id() {
        let st = AppState::fake();
        let alice = Uuid::new_v4();
        let id = Uuid::new_v4();
        let note = save_note(
            &st,
            alice,
            NoteRequest {
                id: Some(id),
                ..req("fresh")
            },
        )
        .await
        .unwrap();
        assert!(note.created);
        assert_eq!(note.note.id, id);
        assert_eq!(note.note.owner_id, alice);
    }
}
