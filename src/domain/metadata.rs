//! Per-note metadata that lives outside the note's text file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prefix that distinguishes metadata keys of archived notes.
///
/// An archived note named `Ideas` is stored under the key `archive/Ideas`,
/// so it never collides with an active note of the same name.
pub const ARCHIVE_PREFIX: &str = "archive/";

/// Font family given to notes that have no explicit font.
pub const DEFAULT_FONT_FAMILY: &str = "Consolas";

/// Font size given to notes that have no explicit size.
pub const DEFAULT_FONT_SIZE: u32 = 12;

/// Returns the metadata key of an archived note.
pub fn archive_key(name: &str) -> String {
    format!("{ARCHIVE_PREFIX}{name}")
}

/// Returns true if `key` refers to an archived note.
pub fn is_archive_key(key: &str) -> bool {
    key.starts_with(ARCHIVE_PREFIX)
}

/// Values applied to metadata entries that are created implicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDefaults {
    pub font_family: String,
    pub font_size: u32,
}

impl Default for NoteDefaults {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

/// Attributes of a note that are not stored in its text file.
///
/// `archived` is the only signal of archived state: it is present exactly
/// when the note lives in the archive directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteMetadata {
    pub font_family: String,
    pub font_size: u32,
    #[serde(default)]
    pub quick_note: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<DateTime<Utc>>,
}

impl NoteMetadata {
    /// Creates metadata for an active note using the given defaults.
    pub fn from_defaults(defaults: &NoteDefaults) -> Self {
        Self {
            font_family: defaults.font_family.clone(),
            font_size: defaults.font_size,
            quick_note: false,
            archived: None,
        }
    }

    /// Returns true if the note is archived.
    pub fn is_archived(&self) -> bool {
        self.archived.is_some()
    }
}
