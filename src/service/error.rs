use crate::domain::ValidationError;
use crate::infra::MetadataError;
use crate::store::StoreError;
use thiserror::Error;

/// Errors surfaced by note service operations.
///
/// `Validation` is always raised before either store is touched. `Store` and
/// `Metadata` may be raised after an earlier step already changed the file
/// system; no rollback is attempted.
#[derive(Debug, Error)]
pub enum NoteError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// The operation only applies to active notes.
    #[error("note '{name}' is archived")]
    Archived { name: String },
}

impl NoteError {
    /// Returns true if the operation was rejected by name validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, NoteError::Validation(_))
    }

    /// Returns true if an active-only operation was given an archived note.
    pub fn is_archived(&self) -> bool {
        matches!(self, NoteError::Archived { .. })
    }

    /// Returns true if a bulk move was refused because of destination collisions.
    pub fn is_move_conflict(&self) -> bool {
        matches!(self, NoteError::Store(StoreError::MoveConflict { .. }))
    }
}

/// Result type for note service operations.
pub type NoteResult<T> = Result<T, NoteError>;
