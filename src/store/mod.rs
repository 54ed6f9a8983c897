//! Note repositories: traits and the file-system implementation

mod file_store;
mod repository;

pub use file_store::{ARCHIVE_DIR_NAME, FileNoteStore, QUICK_NOTE_NAME};
pub use repository::{NoteRelocation, NoteRepository, StoreError, StoreResult};
