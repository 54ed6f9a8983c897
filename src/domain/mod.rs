//! Core types: Note, NoteMetadata, name validation

mod metadata;
mod note;
mod validation;

pub use metadata::{
    ARCHIVE_PREFIX, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, NoteDefaults, NoteMetadata,
    archive_key, is_archive_key,
};
pub use note::Note;
pub use validation::{FORBIDDEN_NAME_CHARS, ValidationError, validate_note_name};
