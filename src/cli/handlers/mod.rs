//! Command handlers for the CLI.

mod fonts;
mod lifecycle;
mod notes;
mod prefs;


use anyhow::{Context, Result, bail};
use std::io::{IsTerminal, Read};
use std::path::PathBuf;

use crate::cli::config::MetadataLocation;
use crate::domain::{Note, NoteDefaults};
use crate::infra::MetadataStore;
use crate::service::{NoteEvent, NoteService};
use crate::store::FileNoteStore;

// Re-export public items
pub use fonts::handle_font;
pub use lifecycle::{handle_archive, handle_relocate, handle_restore, handle_rm};
pub use notes::{handle_list, handle_new, handle_quick, handle_rename, handle_show, handle_write};
pub use prefs::handle_prefs;

// ===========================================
// Shared Utilities
// ===========================================

/// Resolved locations and defaults shared by the note commands.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub notes_dir: PathBuf,
    pub metadata: MetadataLocation,
    pub preferences_path: PathBuf,
    pub defaults: NoteDefaults,
}

impl Workspace {
    /// Returns the metadata file of the current notes directory.
    pub fn metadata_path(&self) -> PathBuf {
        self.metadata.path_for(&self.notes_dir)
    }

    /// Opens a note service over this workspace.
    ///
    /// Lifecycle events are echoed to stdout as confirmation lines.
    pub fn open_service(&self) -> Result<NoteService<FileNoteStore>> {
        let mut service = self.open_quiet_service()?;
        service.subscribe_all(|event| println!("{}", confirmation(event)));
        Ok(service)
    }

    /// Opens a note service that prints nothing on lifecycle events.
    pub(crate) fn open_quiet_service(&self) -> Result<NoteService<FileNoteStore>> {
        let metadata_path = self.metadata_path();
        let metadata = MetadataStore::open(&metadata_path, self.defaults.clone())
            .with_context(|| format!("failed to open metadata at {}", metadata_path.display()))?;
        Ok(NoteService::new(
            FileNoteStore::new(&self.notes_dir),
            metadata,
        ))
    }
}

/// Formats an event as a capitalized confirmation line.
pub(crate) fn confirmation(event: &NoteEvent) -> String {
    let text = event.to_string();
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => text,
    }
}

/// Looks up an active or archived note by exact name.
pub(crate) fn find_note(
    service: &mut NoteService<FileNoteStore>,
    name: &str,
    archived: bool,
) -> Result<Note> {
    if archived {
        match service.find_archived(name)? {
            Some(note) => Ok(note),
            None => bail!("no archived note named '{name}'"),
        }
    } else {
        service
            .read(name)
            .with_context(|| format!("no note named '{name}'"))
    }
}

/// Returns the text argument, or all of stdin when it was omitted.
pub(crate) fn text_or_stdin(text: Option<&str>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text.to_string());
    }

    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        bail!("no text given (pass it as an argument or pipe it on stdin)");
    }

    let mut buffer = String::new();
    stdin
        .lock()
        .read_to_string(&mut buffer)
        .context("failed to read text from stdin")?;
    Ok(buffer)
}

/// Truncates a string to a maximum display width, adding ellipsis if needed.
pub(crate) fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
