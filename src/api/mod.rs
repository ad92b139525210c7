//! All API endpoint setup

use axum::Router;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;

pub use request::Form;
pub use request::PathParameters;
pub use request::QueryParameters;
pub use request::default_true;
pub use request::parse_title;
pub use response::Error;
pub use response::Success;

mod git;
mod notes;
mod request;
mod response;
mod summaries;
mod work_notes;

/// Get the Axum router for all API routes
pub fn router() -> Router {
    let notes = Router::new()
        .route("/", get(notes::list))
        .route("/", post(notes::create))
        .route("/deleted", get(notes::list_deleted))
        .route("/{note}", get(notes::single))
        .route("/{note}", put(notes::update))
        .route("/{note}", delete(notes::delete))
        .route("/{note}/restore", put(notes::restore))
        .route("/{note}/permanent", delete(notes::delete_permanently));

    Router::new()
        .nest("/notes", notes)
        .route("/llm/summarize", post(summaries::summarize))
        .route("/git/commits", get(git::todays_commits))
        .route("/git/commits/{revision}", get(git::commit_details))
        .route("/git/status", get(git::status))
        .route("/git/work-notes", post(work_notes::create))
}
