//! Repository traits for note files and the store error type.

use crate::domain::Note;
use crate::infra::FsError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by note repositories.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An underlying file operation failed.
    #[error(transparent)]
    Fs(#[from] FsError),

    /// Bulk relocation found files already present at the destination.
    ///
    /// Raised during pre-validation; no file has been moved.
    #[error("cannot move notes: {} file(s) already exist at the destination", .conflicts.len())]
    MoveConflict { conflicts: Vec<PathBuf> },
}

/// Result type for repository operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Lifecycle operations on note files.
///
/// Implementations translate note names into storage locations under an
/// active root and an archive area. They never touch note metadata and never
/// validate names; both are the caller's responsibility.
pub trait NoteRepository {
    /// Creates an empty active note.
    fn create(&mut self, name: &str) -> StoreResult<()>;

    /// Creates an active quick note with the next available
    /// `Quick note[ N]` name and returns that name.
    fn create_quick(&mut self, content: &str) -> StoreResult<String>;

    /// Renames an active note without overwriting another note.
    fn update(&mut self, old_name: &str, new_name: &str) -> StoreResult<()>;

    /// Deletes an active note.
    fn delete(&mut self, name: &str) -> StoreResult<()>;

    /// Deletes an archived note.
    fn delete_archived(&mut self, name: &str) -> StoreResult<()>;

    /// Overwrites the content of an existing active note.
    fn save(&mut self, name: &str, content: &str) -> StoreResult<()>;

    /// Returns true if an active note with this exact name exists.
    fn exists(&self, name: &str) -> bool;

    /// Returns the names of all active notes.
    fn active_names(&self) -> StoreResult<Vec<String>>;

    /// Reads one active note from storage.
    fn read(&self, name: &str) -> StoreResult<Note>;

    /// Moves an active note into the archive and returns its archived name.
    fn archive(&mut self, name: &str) -> StoreResult<String>;

    /// Moves an archived note back and returns its active name.
    fn restore(&mut self, name: &str) -> StoreResult<String>;

    /// Returns all active notes with content, followed by lightweight
    /// entries for archived notes named with the archive prefix.
    fn get_all(&self) -> StoreResult<Vec<Note>>;

    /// Returns all archived notes with content.
    fn get_all_archived(&self) -> StoreResult<Vec<Note>>;
}

/// Bulk relocation of the whole note collection.
///
/// Not every repository can be relocated; the note service only offers
/// `move_all` when its repository implements this trait.
pub trait NoteRelocation {
    /// Returns the current root location.
    fn root(&self) -> &Path;

    /// Moves every active and archived note into `new_root`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::MoveConflict` without moving anything if any
    /// destination file already exists.
    fn move_all(&mut self, new_root: &Path) -> StoreResult<()>;
}
