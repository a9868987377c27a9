use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::Note;
use crate::db::PgRepo;

#[async_trait]
pub trait NoteRepo: Send + Sync {
    async fn find_note(&self, id: Uuid) -> anyhow::Result<Option<Note>>;
    /// Newest first.
    async fn list_by_owner(&self, owner_id: Uuid) -> anyhow::Result<Vec<Note>>;
    async fn insert_note(&self, note: &Note) -> anyhow::Result<()>;
    /// Rewrites title, content and color; owner and creation time are fixed.
    async fn update_note(&self, note: &Note) -> anyhow::Result<()>;
    async fn delete_note(&self, id: Uuid) -> anyhow::Result<bool>;
}

#[async_trait]
impl NoteRepo for PgRepo {
    async fn find_note(&self, id: Uuid) -> anyhow::Result<Option<Note>> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, owner_id, title, content, color, created_at
            FROM notes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("find note")?;
        Ok(note)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> anyhow::Result<Vec<Note>> {
        let rows = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, owner_id, title, content, color, created_at
            FROM notes
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .context("list notes by owner")?;
        Ok(rows)
    }

    async fn insert_note(&self, note: &Note) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notes (id, owner_id, title, content, color, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(note.id)
        .bind(note.owner_id)
        .bind(&note.title)
        .bind(&note.content)
        .bind(note.color)
        .bind(note.created_at)
        .execute(&self.pool)
        .await
        .context("insert note")?;
        Ok(())
    }

    async fn update_note(&self, note: &Note) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE notes
               SET title = $2, content = $3, color = $4
             WHERE id = $1
            "#,
        )
        .bind(note.id)
        .bind(&note.title)
        .bind(&note.content)
        .bind(note.color)
        .execute(&self.pool)
        .await
        .context("update note")?;
        Ok(())
    }

    async fn delete_note(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(r#"DELETE FROM notes WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("delete note")?;
        Ok(res.rows_affected() > 0)
    }
}
