use axum::Extension;
use chrono::DateTime;
use chrono::SecondsFormat;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde::Serializer;

use crate::database::CreateNoteValues;
use crate::database::Database;
use crate::database::UpdateNoteValues;
use crate::notes::Note;

use super::Error;
use super::Form;
use super::PathParameters;
use super::Success;
use super::parse_title;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
}

impl NoteResponse {
    pub fn from_note(note: Note) -> Self {
        Self {
            is_deleted: note.is_deleted(),
            id: note.id,
            title: note.title,
            content: note.content,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }

    fn from_note_multiple(mut notes: Vec<Note>) -> Vec<Self> {
        notes.drain(..).map(Self::from_note).collect::<Vec<Self>>()
    }
}

/// Timestamps go out as `YYYY-MM-DDTHH:MM:SS.sssZ`, the same way they are stored
fn serialize_timestamp<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}

pub async fn list(
    Extension(database): Extension<Database>,
) -> Result<Success<Vec<NoteResponse>>, Error> {
    let notes = database
        .find_all_active_notes()
        .await
        .map_err(Error::from_database)?;

    Ok(Success::ok(NoteResponse::from_note_multiple(notes)))
}

pub async fn list_deleted(
    Extension(database): Extension<Database>,
) -> Result<Success<Vec<NoteResponse>>, Error> {
    let notes = database
        .find_all_deleted_notes()
        .await
        .map_err(Error::from_database)?;

    Ok(Success::ok(NoteResponse::from_note_multiple(notes)))
}

pub async fn single(
    Extension(database): Extension<Database>,
    PathParameters(note_id): PathParameters<i64>,
) -> Result<Success<NoteResponse>, Error> {
    database
        .find_single_note_by_id(note_id)
        .await
        .map(|note| Success::ok(NoteResponse::from_note(note)))
        .map_err(Error::from_database)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteForm {
    title: String,
    content: Option<String>,
}

pub async fn create(
    Extension(database): Extension<Database>,
    Form(form): Form<NoteForm>,
) -> Result<Success<NoteResponse>, Error> {
    let title = parse_title(&form.title)?;

    let values = CreateNoteValues {
        title: &title,
        content: form.content.as_deref(),
    };

    let note = database
        .create_note(&values)
        .await
        .map_err(Error::from_database)?;

    Ok(Success::created(NoteResponse::from_note(note)))
}

pub async fn update(
    Extension(database): Extension<Database>,
    PathParameters(note_id): PathParameters<i64>,
    Form(form): Form<NoteForm>,
) -> Result<Success<NoteResponse>, Error> {
    let title = parse_title(&form.title)?;

    let values = UpdateNoteValues {
        title: &title,
        content: form.content.as_deref(),
    };

    let note = database
        .update_note(note_id, &values)
        .await
        .map_err(Error::from_database)?;

    Ok(Success::ok(NoteResponse::from_note(note)))
}

pub async fn delete(
    Extension(database): Extension<Database>,
    PathParameters(note_id): PathParameters<i64>,
) -> Result<Success<&'static str>, Error> {
    database
        .soft_delete_note(note_id)
        .await
        .map_err(Error::from_database)?;

    Ok(Success::<&'static str>::no_content())
}

pub async fn restore(
    Extension(database): Extension<Database>,
    PathParameters(note_id): PathParameters<i64>,
) -> Result<Success<&'static str>, Error> {
    database
        .restore_note(note_id)
        .await
        .map_err(Error::from_database)?;

    Ok(Success::<&'static str>::no_content())
}

pub async fn delete_permanently(
    Extension(database): Extension<Database>,
    PathParameters(note_id): PathParameters<i64>,
) -> Result<Success<&'static str>, Error> {
    database
        .permanently_delete_note(note_id)
        .await
        .map_err(Error::from_database)?;

    Ok(Success::<&'static str>::no_content())
}
