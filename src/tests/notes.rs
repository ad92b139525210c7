use axum::http::StatusCode;

use crate::tests::helper;

#[tokio::test]
async fn test_notes() {
    let mut app = helper::setup_test_app().await;

    // verify empty note list
    let (status_code, notes) = helper::list_notes(&mut app).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(Some(Vec::<helper::Note>::new()), notes);

    // create note, title is trimmed
    let (status_code, note, _) =
        helper::maybe_create_note(&mut app, "  Groceries ", Some("Milk, eggs")).await;
    assert_eq!(StatusCode::CREATED, status_code);
    assert!(note.is_some());
    let note = note.unwrap();
    assert_eq!("Groceries".to_string(), note.title);
    assert_eq!("Milk, eggs".to_string(), note.content);
    assert_eq!(note.created_at, note.updated_at);
    assert!(!note.is_deleted);

    // verify note
    let (status_code, found, _) = helper::single_note(&mut app, note.id).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(Some(&note), found.as_ref());

    // fetch notes, note is included
    let (status_code, notes) = helper::list_notes(&mut app).await;
    assert_eq!(StatusCode::OK, status_code);
    assert!(notes.unwrap().iter().any(|note_| note_.id == note.id));

    // update note
    let (status_code, updated, _) =
        helper::maybe_update_note(&mut app, note.id, "Groceries", Some("Milk, eggs, bread")).await;
    assert_eq!(StatusCode::OK, status_code);
    assert!(updated.is_some());
    let updated = updated.unwrap();
    assert_eq!(note.id, updated.id);
    assert_eq!("Milk, eggs, bread".to_string(), updated.content);
    assert_eq!(note.created_at, updated.created_at);
    assert!(updated.updated_at > note.updated_at);

    // verify note
    let (status_code, found, _) = helper::single_note(&mut app, note.id).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(Some(updated), found);
}

#[tokio::test]
async fn test_create_note_without_content() {
    let mut app = helper::setup_test_app().await;

    let (status_code, note, _) = helper::maybe_create_note(&mut app, "Just a title", None).await;
    assert_eq!(StatusCode::CREATED, status_code);
    assert_eq!(String::new(), note.unwrap().content);
}

#[tokio::test]
async fn test_create_note_with_empty_title() {
    let mut app = helper::setup_test_app().await;

    for title in ["", "   "] {
        let (status_code, note, error) = helper::maybe_create_note(&mut app, title, None).await;
        assert_eq!(StatusCode::BAD_REQUEST, status_code);
        assert_eq!(None, note);
        assert_eq!(Some("Title can not be empty".to_string()), error);
    }

    let (_, notes) = helper::list_notes(&mut app).await;
    assert_eq!(Some(Vec::<helper::Note>::new()), notes);
}

#[tokio::test]
async fn test_update_note_with_empty_title() {
    let mut app = helper::setup_test_app().await;

    let note = helper::create_note(&mut app, "Keep me", "As I am").await;

    let (status_code, _, error) = helper::maybe_update_note(&mut app, note.id, " ", None).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(Some("Title can not be empty".to_string()), error);

    let (_, found, _) = helper::single_note(&mut app, note.id).await;
    assert_eq!(Some(note), found);
}

#[tokio::test]
async fn test_missing_note() {
    let mut app = helper::setup_test_app().await;

    let (status_code, note, error) = helper::single_note(&mut app, 42).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!(None, note);
    assert_eq!(Some("Note not found".to_string()), error);

    let (status_code, note, error) = helper::maybe_update_note(&mut app, 42, "Ghost", None).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!(None, note);
    assert_eq!(Some("Note not found".to_string()), error);
}

#[tokio::test]
async fn test_invalid_note_id() {
    let mut app = helper::setup_test_app().await;

    let (status_code, note, error) = helper::single_note_with_str(&mut app, "some-id").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(None, note);
    assert_eq!(Some("Invalid path parameter".to_string()), error);
}

#[tokio::test]
async fn test_notes_are_ordered_by_last_update() {
    let mut app = helper::setup_test_app().await;

    let first = helper::create_note(&mut app, "First", "").await;
    let second = helper::create_note(&mut app, "Second", "").await;

    let (_, notes) = helper::list_notes(&mut app).await;
    let ids = notes.unwrap().iter().map(|note| note.id).collect::<Vec<_>>();
    assert_eq!(vec![second.id, first.id], ids);

    let (status_code, _, _) =
        helper::maybe_update_note(&mut app, first.id, "First", Some("Edited")).await;
    assert_eq!(StatusCode::OK, status_code);

    let (_, notes) = helper::list_notes(&mut app).await;
    let ids = notes.unwrap().iter().map(|note| note.id).collect::<Vec<_>>();
    assert_eq!(vec![first.id, second.id], ids);
}

#[tokio::test]
async fn test_note_timestamps_are_iso_8601() {
    let mut app = helper::setup_test_app().await;

    let note = helper::create_note(&mut app, "When", "Now").await;

    // 2025-01-01T12:00:00.000Z
    assert_eq!(24, note.created_at.len());
    assert!(note.created_at.ends_with('Z'));
    assert!(chrono::DateTime::parse_from_rfc3339(&note.created_at).is_ok());
}
