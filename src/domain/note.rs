//! Note struct representing a plain-text note backed by a `<name>.txt` file.

use crate::domain::NoteMetadata;
use chrono::{DateTime, Utc};
use std::fmt;

/// A note as held in memory by the application.
///
/// The note's identity is the value itself: lifecycle operations that rename
/// a note (rename, archive, restore) mutate `name` in place rather than
/// producing a new `Note`.
///
/// # Fields
/// - `name`: File name without the `.txt` extension
/// - `content`: Full text body
/// - `last_write_time`: From the backing file, or creation time for new notes
/// - `metadata`: Attached by the note service after loading
/// - `dirty`: Set when in-memory content diverges from the file
///
/// # Examples
///
/// ```
/// use notebox::domain::Note;
/// use chrono::Utc;
///
/// let mut note = Note::new("Groceries", "", Utc::now());
/// assert!(!note.is_dirty());
///
/// note.set_content("eggs\nmilk");
/// assert!(note.is_dirty());
/// assert_eq!(note.content(), "eggs\nmilk");
/// ```
#[derive(Clone, PartialEq)]
pub struct Note {
    name: String,
    content: String,
    last_write_time: DateTime<Utc>,
    metadata: Option<NoteMetadata>,
    dirty: bool,
}

impl Note {
    /// Creates a clean note without metadata.
    pub fn new(
        name: impl Into<String>,
        content: impl Into<String>,
        last_write_time: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            last_write_time,
            metadata: None,
            dirty: false,
        }
    }

    /// Returns the note's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the note's text body.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns when the backing file was last written.
    pub fn last_write_time(&self) -> DateTime<Utc> {
        self.last_write_time
    }

    /// Returns the attached metadata, if any.
    pub fn metadata(&self) -> Option<&NoteMetadata> {
        self.metadata.as_ref()
    }

    /// Returns true if the content has changed since it was last persisted.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns true if the attached metadata carries an archive timestamp.
    pub fn is_archived(&self) -> bool {
        self.metadata.as_ref().is_some_and(NoteMetadata::is_archived)
    }

    /// Replaces the text body and marks the note dirty.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.dirty = true;
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub(crate) fn set_metadata(&mut self, metadata: NoteMetadata) {
        self.metadata = Some(metadata);
    }

    pub(crate) fn metadata_mut(&mut self) -> Option<&mut NoteMetadata> {
        self.metadata.as_mut()
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub(crate) fn touch(&mut self, at: DateTime<Utc>) {
        self.last_write_time = at;
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Debug for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Note")
            .field("name", &self.name)
            .field("content_len", &self.content.len())
            .field("last_write_time", &self.last_write_time)
            .field("metadata", &self.metadata)
            .field("dirty", &self.dirty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NoteDefaults;

    fn test_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn new_note_is_clean_and_unattached() {
        let note = Note::new("Ideas", "body", test_time());
        assert_eq!(note.name(), "Ideas");
        assert_eq!(note.content(), "body");
        assert_eq!(note.last_write_time(), test_time());
        assert!(note.metadata().is_none());
        assert!(!note.is_dirty());
    }

    #[test]
    fn set_content_marks_dirty() {
        let mut note = Note::new("Ideas", "", test_time());
        note.set_content("changed");
        assert!(note.is_dirty());

        note.mark_clean();
        assert!(!note.is_dirty());
        assert_eq!(note.content(), "changed");
    }

    #[test]
    fn is_archived_follows_metadata() {
        let mut note = Note::new("Ideas", "", test_time());
        assert!(!note.is_archived());

        let mut metadata = NoteMetadata::from_defaults(&NoteDefaults::default());
        note.set_metadata(metadata.clone());
        assert!(!note.is_archived());

        metadata.archived = Some(test_time());
        note.set_metadata(metadata);
        assert!(note.is_archived());
    }

    #[test]
    fn display_shows_name() {
        let note = Note::new("Ideas", "", test_time());
        assert_eq!(note.to_string(), "Ideas");
    }
}
