//! Note lifecycle service: orchestration, events, errors

mod error;
mod events;
mod note_service;

pub use error::{NoteError, NoteResult};
pub use events::{NoteEvent, NoteEventKind, Notifier, SubscriptionId};
pub use note_service::NoteService;
