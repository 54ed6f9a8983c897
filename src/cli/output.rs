//! Output format types for CLI commands.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;

use crate::domain::{Note, NoteDefaults, NoteMetadata};

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for programmatic consumption
    Json,
}

/// Wrapper for serializable command output.
#[derive(Debug, Serialize)]
pub struct Output<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> Output<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// A single note in listing output.
#[derive(Debug, Serialize)]
pub struct NoteListing {
    pub name: String,
    pub modified: DateTime<Utc>,
    pub font_family: String,
    pub font_size: u32,
    pub quick_note: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<DateTime<Utc>>,
}

impl From<&Note> for NoteListing {
    fn from(note: &Note) -> Self {
        let metadata = note
            .metadata()
            .cloned()
            .unwrap_or_else(|| NoteMetadata::from_defaults(&NoteDefaults::default()));
        Self {
            name: note.name().to_string(),
            modified: note.last_write_time(),
            font_family: metadata.font_family,
            font_size: metadata.font_size,
            quick_note: metadata.quick_note,
            archived: metadata.archived,
        }
    }
}
