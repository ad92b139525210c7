use std::path::PathBuf;

use axum::Extension;
use chrono::Local;
use serde::Deserialize;

use crate::database::CreateNoteValues;
use crate::database::Database;
use crate::git_tracker::WorkNoteOptions;
use crate::git_tracker::generate_work_note;

use super::Error;
use super::Form;
use super::Success;
use super::default_true;
use super::notes::NoteResponse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkNoteForm {
    repo_path: Option<PathBuf>,
    author: Option<String>,
    #[serde(default = "default_true")]
    include_diffs: bool,
    #[serde(default = "default_true")]
    include_stats: bool,
    #[serde(default = "default_true")]
    skip_new_file_diffs: bool,
}

/// Generate today's work note of a repository and store it as a note
pub async fn create(
    Extension(database): Extension<Database>,
    Form(form): Form<WorkNoteForm>,
) -> Result<Success<NoteResponse>, Error> {
    let repo_path = form.repo_path.unwrap_or_else(|| PathBuf::from("."));

    let options = WorkNoteOptions {
        author: form.author.filter(|author| !author.trim().is_empty()),
        include_diffs: form.include_diffs,
        include_stats: form.include_stats,
        skip_new_file_diffs: form.skip_new_file_diffs,
    };

    let work_note = generate_work_note(&repo_path, &options, Local::now().date_naive())
        .await
        .map_err(Error::from_git)?;

    let values = CreateNoteValues {
        title: &work_note.title,
        content: Some(&work_note.content),
    };

    let note = database
        .create_note(&values)
        .await
        .map_err(Error::from_database)?;

    tracing::info!("Saved work note {} for {repo_path:?}", note.id);

    Ok(Success::created(NoteResponse::from_note(note)))
}
