use chrono::DateTime;
use chrono::Utc;

/// Lifecycle state of a note
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteState {
    /// Visible in the regular note list
    Active,

    /// In the recycle bin, can be restored or permanently deleted
    Deleted,
}

impl NoteState {
    /// Create the state from the stored `is_deleted` flag
    pub fn from_is_deleted(is_deleted: bool) -> Self {
        if is_deleted {
            Self::Deleted
        } else {
            Self::Active
        }
    }

    /// Is the note in the recycle bin?
    pub fn is_deleted(self) -> bool {
        matches!(self, Self::Deleted)
    }
}

#[derive(Clone, Debug)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub state: NoteState,
}

impl Note {
    /// Is the note in the recycle bin?
    pub fn is_deleted(&self) -> bool {
        self.state.is_deleted()
    }
}
