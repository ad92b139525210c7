//! Database storage types and functions

use chrono::DateTime;
use chrono::Utc;
use sqlx::migrate::Migrator;

use crate::notes::Note;
use crate::notes::NoteState;

/// Migrator to run migrations on startup
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// `SQLx` version of note
#[derive(sqlx::FromRow)]
pub struct SqlxNote {
    /// Note ID
    pub id: i64,

    /// Title
    pub title: String,

    /// Content, `NULL` for rows written without content
    pub content: Option<String>,

    /// Creation date
    pub created_at: DateTime<Utc>,

    /// Last updated at
    pub updated_at: DateTime<Utc>,

    /// In the recycle bin?
    pub is_deleted: bool,
}

impl Note {
    /// Create note from `SQLx` version
    pub fn from_sqlx_note(note: SqlxNote) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content.unwrap_or_default(),
            created_at: note.created_at,
            updated_at: note.updated_at,
            state: NoteState::from_is_deleted(note.is_deleted),
        }
    }

    /// Maybe create note from `SQLx` version
    pub fn from_sqlx_note_optional(note: Option<SqlxNote>) -> Option<Self> {
        note.map(Self::from_sqlx_note)
    }

    /// Create multiple notes from `SQLx` version
    pub fn from_sqlx_note_multiple(mut notes: Vec<SqlxNote>) -> Vec<Self> {
        notes
            .drain(..)
            .map(Self::from_sqlx_note)
            .collect::<Vec<Self>>()
    }
}
