//! Lifecycle notifications emitted by the note service.

use crate::domain::Note;
use std::fmt;

/// Kind of lifecycle event, used to subscribe to a single event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteEventKind {
    Created,
    Updated,
    Archived,
    Deleted,
    Restored,
}

/// A completed lifecycle transition.
///
/// Each event carries a snapshot of the affected note taken after the store
/// mutation and metadata persist completed.
#[derive(Debug, Clone, PartialEq)]
pub enum NoteEvent {
    Created { note: Note },
    Updated { note: Note, original_name: String },
    Archived { note: Note },
    Deleted { note: Note },
    Restored { note: Note },
}

impl NoteEvent {
    /// Returns the kind of this event.
    pub fn kind(&self) -> NoteEventKind {
        match self {
            NoteEvent::Created { .. } => NoteEventKind::Created,
            NoteEvent::Updated { .. } => NoteEventKind::Updated,
            NoteEvent::Archived { .. } => NoteEventKind::Archived,
            NoteEvent::Deleted { .. } => NoteEventKind::Deleted,
            NoteEvent::Restored { .. } => NoteEventKind::Restored,
        }
    }

    /// Returns the affected note.
    pub fn note(&self) -> &Note {
        match self {
            NoteEvent::Created { note }
            | NoteEvent::Updated { note, .. }
            | NoteEvent::Archived { note }
            | NoteEvent::Deleted { note }
            | NoteEvent::Restored { note } => note,
        }
    }
}

impl fmt::Display for NoteEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteEvent::Created { note } => write!(f, "created '{}'", note.name()),
            NoteEvent::Updated {
                note,
                original_name,
            } => write!(f, "renamed '{}' to '{}'", original_name, note.name()),
            NoteEvent::Archived { note } => write!(f, "archived '{}'", note.name()),
            NoteEvent::Deleted { note } => write!(f, "deleted '{}'", note.name()),
            NoteEvent::Restored { note } => write!(f, "restored '{}'", note.name()),
        }
    }
}

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

type Handler = Box<dyn FnMut(&NoteEvent)>;

struct Subscriber {
    id: SubscriptionId,
    kind: Option<NoteEventKind>,
    handler: Handler,
}

/// Synchronous, ordered fan-out of note events to subscribers.
///
/// Handlers run on the caller's thread in subscription order.
#[derive(Default)]
pub struct Notifier {
    next_id: usize,
    subscribers: Vec<Subscriber>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to one kind of event.
    pub fn subscribe<F>(&mut self, kind: NoteEventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&NoteEvent) + 'static,
    {
        self.push(Some(kind), Box::new(handler))
    }

    /// Subscribes to every event.
    pub fn subscribe_all<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&NoteEvent) + 'static,
    {
        self.push(None, Box::new(handler))
    }

    /// Removes a subscription. Returns false if it was already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    /// Delivers an event to every matching subscriber.
    pub fn emit(&mut self, event: &NoteEvent) {
        let kind = event.kind();
        for subscriber in &mut self.subscribers {
            if subscriber.kind.is_none_or(|k| k == kind) {
                (subscriber.handler)(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    fn push(&mut self, kind: Option<NoteEventKind>, handler: Handler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber { id, kind, handler });
        id
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
