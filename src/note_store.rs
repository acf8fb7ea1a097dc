//! Owner-scoped access to the `notes` table.
//!
//! Every query carries the requesting user's id in its `WHERE` clause, so a note
//! that belongs to somebody else looks exactly like one that does not exist.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    error::{Result, ValidationError},
    model::{Note, NoteId, UserId},
};

#[derive(Debug, Clone)]
pub struct NoteStore {
    db: SqlitePool,
}

fn checked_fields<'a>(title: &'a str, content: &'a str) -> Result<(&'a str, &'a str)> {
    let (title, content) = (title.trim(), content.trim());
    if title.is_empty() || content.is_empty() {
        return Err(ValidationError::EmptyNote.into());
    }
    Ok((title, content))
}

impl NoteStore {
    pub fn new(db: SqlitePool) -> Self {
        NoteStore { db }
    }

    pub async fn create(&self, owner_id: UserId, title: &str, content: &str) -> Result<NoteId> {
        let (title, content) = checked_fields(title, content)?;

        let mut tx = self.db.begin().await?;
        let note_id = sqlx::query_scalar::<_, NoteId>(
            "INSERT INTO notes (title, content, user_id, created_at) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(title)
        .bind(content)
        .bind(owner_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(note_id)
    }

    /// Newest first.
    pub async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(
            "SELECT id, title, content, user_id, created_at FROM notes \
             WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;
        Ok(notes)
    }

    pub async fn get_by_id_for_owner(&self, note_id: NoteId, owner_id: UserId) -> Result<Option<Note>> {
        let note = sqlx::query_as::<_, Note>(
            "SELECT id, title, content, user_id, created_at FROM notes \
             WHERE id = ? AND user_id = ?",
        )
        .bind(note_id)
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(note)
    }

    /// Returns `false` without touching anything if the owner has no such note.
    pub async fn update(
        &self,
        note_id: NoteId,
        owner_id: UserId,
        title: &str,
        content: &str,
    ) -> Result<bool> {
        let (title, content) = checked_fields(title, content)?;

        let mut tx = self.db.begin().await?;
        let result = sqlx::query(
            "UPDATE notes SET title = ?, content = ? WHERE id = ? AND user_id = ?",
        )
        .bind(title)
        .bind(content)
        .bind(note_id)
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, note_id: NoteId, owner_id: UserId) -> Result<bool> {
        let mut tx = self.db.begin().await?;
        let result = sqlx::query("DELETE FROM notes WHERE id = ? AND user_id = ?")
            .bind(note_id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}
