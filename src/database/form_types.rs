//! Form types

/// Values to create a Note
pub struct CreateNoteValues<'a> {
    /// Title of the note
    ///
    /// Must be validated by the caller, storage only requires it to be present
    pub title: &'a str,

    /// Content of the note, stored as an empty string when absent
    pub content: Option<&'a str>,
}

/// Values to update a Note
///
/// Both fields are overwritten, a missing content clears it
pub struct UpdateNoteValues<'a> {
    /// New title of the note
    pub title: &'a str,

    /// New content of the note
    pub content: Option<&'a str>,
}
