//! All things related to the storage of notes
//!
//! The `notes` table is only ever touched through [`Database`]

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::sqlite::SqliteJournalMode;
use sqlx::sqlite::SqlitePoolOptions;
use thiserror::Error;

pub use Config as DatabaseConfig;
pub use form_types::*;

use crate::notes::Note;
use types::MIGRATOR;
use types::SqlxNote;

mod form_types;
mod types;

/// Storage errors
#[derive(Debug, Error)]
pub enum Error {
    /// The note does not exist, in any state
    #[error("Note {0} not found")]
    NotFound(i64),

    /// A connection error with the storage
    #[error("Connection error: {0}")]
    Connection(String),

    /// The schema could not be brought up to date
    #[error("Migration error: {0}")]
    Migration(String),
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Database configuration
pub enum Config {
    /// Connect to the given database URL, the file is created when missing
    Url(String),

    /// Use existing connection
    ExistingConnection(SqlitePool),
}

/// `SQLite` storage
#[derive(Clone)]
pub struct Database {
    /// Pool of connections
    connection_pool: SqlitePool,
}

impl Database {
    /// Create a new `SQLite` storage
    ///
    /// Migrations will be run
    pub async fn from_config(config: Config) -> Result<Self> {
        match config {
            Config::Url(database_url) => Self::new(&database_url).await,
            Config::ExistingConnection(pool) => Self::new_with_pool(pool).await,
        }
    }

    /// Create `SQLite` storage from a database URL
    async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(connection_error)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let connection_pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options)
            .await
            .map_err(connection_error)?;

        Self::new_with_pool(connection_pool).await
    }

    /// Create `SQLite` storage with existing pool
    async fn new_with_pool(connection_pool: SqlitePool) -> Result<Self> {
        MIGRATOR
            .run(&connection_pool)
            .await
            .map_err(|err| Error::Migration(err.to_string()))?;

        Ok(Self { connection_pool })
    }
}

impl Database {
    /// Find all active notes, most recently touched first
    pub async fn find_all_active_notes(&self) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, SqlxNote>(
            r"
            SELECT *
            FROM notes
            WHERE is_deleted = 0
            ORDER BY updated_at DESC, id DESC",
        )
        .fetch_all(&self.connection_pool)
        .await
        .map(Note::from_sqlx_note_multiple)
        .map_err(connection_error)?;

        Ok(notes)
    }

    /// Find all notes in the recycle bin, most recently touched first
    pub async fn find_all_deleted_notes(&self) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, SqlxNote>(
            r"
            SELECT *
            FROM notes
            WHERE is_deleted = 1
            ORDER BY updated_at DESC, id DESC",
        )
        .fetch_all(&self.connection_pool)
        .await
        .map(Note::from_sqlx_note_multiple)
        .map_err(connection_error)?;

        Ok(notes)
    }

    /// Find a single note by its ID
    ///
    /// DOES NOT respect the soft-delete, deleted notes are returned as well
    pub async fn find_single_note_by_id(&self, id: i64) -> Result<Note> {
        sqlx::query_as::<_, SqlxNote>(
            r"
            SELECT *
            FROM notes
            WHERE id = ?1
            LIMIT 1",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
        .map(Note::from_sqlx_note_optional)
        .map_err(connection_error)?
        .ok_or(Error::NotFound(id))
    }

    /// Create a note
    ///
    /// Both timestamps get the same value, see [`Database::update_note`] for how it is picked
    pub async fn create_note(&self, values: &CreateNoteValues<'_>) -> Result<Note> {
        let note = sqlx::query_as::<_, SqlxNote>(
            r"
            INSERT INTO notes (title, content, created_at, updated_at)
            SELECT ?1, ?2, touched_at, touched_at
            FROM (
                SELECT MAX(
                    strftime('%Y-%m-%dT%H:%M:%fZ', 'now'),
                    COALESCE(
                        (SELECT strftime('%Y-%m-%dT%H:%M:%fZ', MAX(updated_at), '+0.001 seconds') FROM notes),
                        ''
                    )
                ) AS touched_at
            )
            RETURNING *",
        )
        .bind(values.title)
        .bind(values.content.unwrap_or_default())
        .fetch_one(&self.connection_pool)
        .await
        .map(Note::from_sqlx_note)
        .map_err(connection_error)?;

        tracing::debug!("Created note {}", note.id);

        Ok(note)
    }

    /// Update the title and content of a note
    ///
    /// Works on deleted notes as well, they stay in the recycle bin
    ///
    /// Every write stamps `updated_at` with the current time, or 1ms after the latest
    /// `updated_at` in the table when that is later. Touches are strictly ordered that way, even
    /// within the same millisecond
    pub async fn update_note(&self, id: i64, values: &UpdateNoteValues<'_>) -> Result<Note> {
        let note = sqlx::query_as::<_, SqlxNote>(
            r"
            UPDATE notes
            SET
                title = ?1,
                content = ?2,
                updated_at = MAX(
                    strftime('%Y-%m-%dT%H:%M:%fZ', 'now'),
                    (SELECT strftime('%Y-%m-%dT%H:%M:%fZ', MAX(updated_at), '+0.001 seconds') FROM notes)
                )
            WHERE id = ?3
            RETURNING *",
        )
        .bind(values.title)
        .bind(values.content.unwrap_or_default())
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
        .map(Note::from_sqlx_note_optional)
        .map_err(connection_error)?
        .ok_or(Error::NotFound(id))?;

        tracing::debug!("Updated note {id}");

        Ok(note)
    }

    /// Soft-delete a note, moving it to the recycle bin
    ///
    /// A missing note is not an error
    pub async fn soft_delete_note(&self, id: i64) -> Result<()> {
        self.set_is_deleted(id, true).await
    }

    /// Restore a note from the recycle bin
    ///
    /// A missing note is not an error
    pub async fn restore_note(&self, id: i64) -> Result<()> {
        self.set_is_deleted(id, false).await
    }

    /// Permanently delete a note, its ID will not be used again
    ///
    /// A missing note is not an error
    pub async fn permanently_delete_note(&self, id: i64) -> Result<()> {
        let result = sqlx::query(
            r"
            DELETE FROM notes
            WHERE id = ?1",
        )
        .bind(id)
        .execute(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        if result.rows_affected() == 0 {
            tracing::debug!("Note {id} does not exist, nothing to permanently delete");
        } else {
            tracing::debug!("Permanently deleted note {id}");
        }

        Ok(())
    }

    /// Move a note in or out of the recycle bin
    async fn set_is_deleted(&self, id: i64, is_deleted: bool) -> Result<()> {
        let result = sqlx::query(
            r"
            UPDATE notes
            SET
                is_deleted = ?1,
                updated_at = MAX(
                    strftime('%Y-%m-%dT%H:%M:%fZ', 'now'),
                    (SELECT strftime('%Y-%m-%dT%H:%M:%fZ', MAX(updated_at), '+0.001 seconds') FROM notes)
                )
            WHERE id = ?2",
        )
        .bind(is_deleted)
        .bind(id)
        .execute(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        if result.rows_affected() == 0 {
            tracing::debug!("Note {id} does not exist, nothing to change");
        } else {
            tracing::debug!("Set note {id} is_deleted={is_deleted}");
        }

        Ok(())
    }
}

/// Convert `SQLx` to storage connection error
fn connection_error<E>(err: E) -> Error
where
    E: std::error::Error,
{
    Error::Connection(err.to_string())
}
