//! Note lifecycle orchestration over a repository and the metadata store.

use crate::domain::{Note, NoteMetadata, archive_key, is_archive_key, validate_note_name};
use crate::infra::MetadataStore;
use crate::service::{
    NoteError, NoteEvent, NoteEventKind, NoteResult, Notifier, SubscriptionId,
};
use crate::store::{NoteRelocation, NoteRepository};
use chrono::Utc;
use log::{debug, info};
use std::cmp::Reverse;
use std::path::Path;

/// Coordinates note files and note metadata.
///
/// Every mutating operation follows the same sequence: validate, change the
/// file through the repository, update the metadata mapping, persist the
/// metadata, then notify subscribers. A failure stops the sequence where it
/// happened; earlier steps are not undone.
///
/// The service is meant to be driven from a single thread. Operations must
/// not be invoked re-entrantly from a subscriber.
#[derive(Debug)]
pub struct NoteService<R> {
    repository: R,
    metadata: MetadataStore,
    notifier: Notifier,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repository: R, metadata: MetadataStore) -> Self {
        Self {
            repository,
            metadata,
            notifier: Notifier::new(),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn metadata(&self) -> &MetadataStore {
        &self.metadata
    }

    // ===========================================
    // Notifications
    // ===========================================

    /// Subscribes to one kind of lifecycle event.
    pub fn subscribe<F>(&mut self, kind: NoteEventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&NoteEvent) + 'static,
    {
        self.notifier.subscribe(kind, handler)
    }

    /// Subscribes to every lifecycle event.
    pub fn subscribe_all<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&NoteEvent) + 'static,
    {
        self.notifier.subscribe_all(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    // ===========================================
    // Loading
    // ===========================================

    /// Loads all active notes, ordered by last write time ascending.
    ///
    /// Reconciles the metadata store with every note on disk (active and
    /// archived) and persists it if reconciliation changed anything.
    pub fn load(&mut self) -> NoteResult<Vec<Note>> {
        let all = self.repository.get_all()?;

        if self.metadata.initialize(all.iter().map(Note::name)) {
            self.metadata.save()?;
        }

        let mut notes: Vec<Note> = all
            .into_iter()
            .filter(|n| !is_archive_key(n.name()))
            .collect();
        for note in &mut notes {
            note.set_metadata(self.metadata.get_or_default(note.name()));
        }
        notes.sort_by_key(Note::last_write_time);

        debug!("loaded {} active note(s)", notes.len());
        Ok(notes)
    }

    /// Loads all archived notes, most recently archived first.
    ///
    /// Archived notes without metadata get defaults stamped with the file's
    /// last write time; the metadata store is persisted if that happens.
    pub fn load_archived(&mut self) -> NoteResult<Vec<Note>> {
        let mut notes = self.repository.get_all_archived()?;
        let mut changed = false;

        for note in &mut notes {
            let key = archive_key(note.name());
            let mut metadata = self.metadata.get_or_default(&key);
            if metadata.archived.is_none() || !self.metadata.contains(&key) {
                metadata.archived = metadata.archived.or(Some(note.last_write_time()));
                self.metadata.add(key, metadata.clone());
                changed = true;
            }
            note.set_metadata(metadata);
        }

        if changed {
            self.metadata.save()?;
        }

        notes.sort_by_key(|n| Reverse(n.metadata().and_then(|m| m.archived)));
        debug!("loaded {} archived note(s)", notes.len());
        Ok(notes)
    }

    /// Reads one active note from storage with its metadata attached.
    pub fn read(&self, name: &str) -> NoteResult<Note> {
        let mut note = self.repository.read(name)?;
        note.set_metadata(self.metadata.get_or_default(name));
        Ok(note)
    }

    /// Reads one archived note without touching the metadata file.
    ///
    /// Untracked archived notes get defaults stamped with the file's last
    /// write time, as [`load_archived`](Self::load_archived) would give them,
    /// but nothing is persisted.
    pub fn read_archived(&self, name: &str) -> NoteResult<Option<Note>> {
        let notes = self.repository.get_all_archived()?;
        let Some(mut note) = notes.into_iter().find(|n| n.name() == name) else {
            return Ok(None);
        };

        let mut metadata = self.metadata.get_or_default(&archive_key(name));
        metadata.archived = metadata.archived.or(Some(note.last_write_time()));
        note.set_metadata(metadata);
        Ok(Some(note))
    }

    /// Finds an archived note by its name inside the archive.
    ///
    /// Returns `None` if no archived note has that name.
    pub fn find_archived(&mut self, name: &str) -> NoteResult<Option<Note>> {
        let notes = self.load_archived()?;
        Ok(notes.into_iter().find(|n| n.name() == name))
    }

    // ===========================================
    // Naming
    // ===========================================

    /// Validates a proposed name against the active notes.
    ///
    /// `current` is the name of the note being renamed, if any. Returns the
    /// trimmed name.
    pub fn validate_name(&self, name: &str, current: Option<&str>) -> NoteResult<String> {
        let existing = self.repository.active_names()?;
        let name = validate_note_name(name, existing.iter().map(String::as_str), current)?;
        Ok(name)
    }

    // ===========================================
    // Lifecycle
    // ===========================================

    /// Creates an empty active note.
    pub fn create(&mut self, name: &str) -> NoteResult<Note> {
        let name = self.validate_name(name, None)?;

        self.repository.create(&name)?;

        let metadata = NoteMetadata::from_defaults(self.metadata.defaults());
        self.metadata.add(name.clone(), metadata.clone());
        self.metadata.save()?;

        let mut note = Note::new(name, "", Utc::now());
        note.set_metadata(metadata);

        info!("created note '{}'", note.name());
        self.notifier.emit(&NoteEvent::Created { note: note.clone() });
        Ok(note)
    }

    /// Creates an active quick note with an automatically chosen name.
    pub fn create_quick(&mut self, content: &str) -> NoteResult<Note> {
        let name = self.repository.create_quick(content)?;

        let mut metadata = NoteMetadata::from_defaults(self.metadata.defaults());
        metadata.quick_note = true;
        self.metadata.add(name.clone(), metadata.clone());
        self.metadata.save()?;

        let mut note = Note::new(name, content, Utc::now());
        note.set_metadata(metadata);

        info!("created quick note '{}'", note.name());
        self.notifier.emit(&NoteEvent::Created { note: note.clone() });
        Ok(note)
    }

    /// Renames an active note in place.
    ///
    /// Renaming to the identical name is a no-op and emits nothing. Archived
    /// notes cannot be renamed.
    pub fn update(&mut self, note: &mut Note, new_name: &str) -> NoteResult<()> {
        ensure_active(note)?;
        let original = note.name().to_string();
        let new_name = self.validate_name(new_name, Some(&original))?;
        if new_name == original {
            return Ok(());
        }

        self.repository.update(&original, &new_name)?;

        let metadata = self.take_metadata(&original, note);
        self.metadata.add(new_name.clone(), metadata.clone());
        self.metadata.save()?;

        note.set_name(new_name);
        note.set_metadata(metadata);

        info!("renamed note '{}' to '{}'", original, note.name());
        self.notifier.emit(&NoteEvent::Updated {
            note: note.clone(),
            original_name: original,
        });
        Ok(())
    }

    /// Moves an active note into the archive.
    ///
    /// The in-memory content is saved first so the archived file reflects the
    /// latest edits. The note may be renamed if the archive already holds a
    /// note with the same name. Archiving an archived note does nothing.
    pub fn archive(&mut self, note: &mut Note) -> NoteResult<()> {
        if note.is_archived() {
            debug!("'{}' is already archived", note.name());
            return Ok(());
        }
        let original = note.name().to_string();

        self.repository.save(&original, note.content())?;
        note.mark_clean();
        let archived_name = self.repository.archive(&original)?;

        let mut metadata = self.take_metadata(&original, note);
        metadata.archived = Some(Utc::now());
        self.metadata.add(archive_key(&archived_name), metadata.clone());
        self.metadata.save()?;

        note.set_name(archived_name);
        note.set_metadata(metadata);

        info!("archived note '{}'", note.name());
        self.notifier.emit(&NoteEvent::Archived { note: note.clone() });
        Ok(())
    }

    /// Moves an archived note back to the active notes.
    ///
    /// The note may be renamed if an active note with the same name exists.
    /// Restoring an active note does nothing.
    pub fn restore(&mut self, note: &mut Note) -> NoteResult<()> {
        if !note.is_archived() {
            debug!("'{}' is not archived", note.name());
            return Ok(());
        }
        let original = note.name().to_string();

        let restored_name = self.repository.restore(&original)?;

        let mut metadata = self.take_metadata(&archive_key(&original), note);
        metadata.archived = None;
        self.metadata.add(restored_name.clone(), metadata.clone());
        self.metadata.save()?;

        note.set_name(restored_name);
        note.set_metadata(metadata);

        info!("restored note '{}'", note.name());
        self.notifier.emit(&NoteEvent::Restored { note: note.clone() });
        Ok(())
    }

    /// Permanently deletes a note, active or archived.
    pub fn delete(&mut self, note: Note) -> NoteResult<()> {
        if note.is_archived() {
            self.repository.delete_archived(note.name())?;
            self.metadata.remove(&archive_key(note.name()));
        } else {
            self.repository.delete(note.name())?;
            self.metadata.remove(note.name());
        }
        self.metadata.save()?;

        info!("deleted note '{}'", note.name());
        self.notifier.emit(&NoteEvent::Deleted { note });
        Ok(())
    }

    // ===========================================
    // Saving
    // ===========================================

    /// Persists one active note's content.
    ///
    /// Archived notes are rejected; their file lives in the archive and the
    /// active note of the same name must not be overwritten.
    pub fn save(&mut self, note: &mut Note) -> NoteResult<()> {
        ensure_active(note)?;
        self.repository.save(note.name(), note.content())?;
        note.mark_clean();
        note.touch(Utc::now());
        Ok(())
    }

    /// Persists the content of every active note in the collection.
    pub fn save_all(&mut self, notes: &mut [Note]) -> NoteResult<()> {
        for note in notes.iter_mut().filter(|n| !n.is_archived()) {
            self.save(note)?;
        }
        Ok(())
    }

    /// Persists dirty notes' content and every note's metadata.
    ///
    /// The metadata store is written once, after all notes are processed.
    pub fn save_all_with_metadata(&mut self, notes: &mut [Note]) -> NoteResult<()> {
        for note in notes.iter_mut() {
            if note.is_dirty() && !note.is_archived() {
                self.save(note)?;
            }
            if let Some(metadata) = note.metadata() {
                self.metadata.add_or_update(metadata_key(note), metadata.clone());
            }
        }
        self.metadata.save()?;
        Ok(())
    }

    // ===========================================
    // Fonts
    // ===========================================

    /// Returns the font family shared by every note.
    ///
    /// Returns the default family when there are no notes and `None` when
    /// notes use different families.
    pub fn font_that_all_notes_use(&self) -> Option<String> {
        if self.metadata.is_empty() {
            return Some(self.metadata.defaults().font_family.clone());
        }
        let fonts = self.metadata.distinct_fonts();
        match fonts.len() {
            1 => fonts.into_iter().next().map(str::to_string),
            _ => None,
        }
    }

    /// Returns the font size shared by every note.
    ///
    /// Same rules as [`font_that_all_notes_use`](Self::font_that_all_notes_use).
    pub fn font_size_that_all_notes_use(&self) -> Option<u32> {
        if self.metadata.is_empty() {
            return Some(self.metadata.defaults().font_size);
        }
        let sizes = self.metadata.distinct_font_sizes();
        match sizes.len() {
            1 => sizes.into_iter().next(),
            _ => None,
        }
    }

    /// Sets the font family of every note, including the in-memory copies.
    pub fn set_font_for_all(&mut self, font_family: &str, notes: &mut [Note]) -> NoteResult<()> {
        self.metadata.set_font_for_all(font_family);
        self.metadata.save()?;
        for metadata in notes.iter_mut().filter_map(Note::metadata_mut) {
            metadata.font_family = font_family.to_string();
        }
        info!("font family set to '{font_family}' for all notes");
        Ok(())
    }

    /// Sets the font size of every note, including the in-memory copies.
    pub fn set_font_size_for_all(&mut self, font_size: u32, notes: &mut [Note]) -> NoteResult<()> {
        self.metadata.set_font_size_for_all(font_size);
        self.metadata.save()?;
        for metadata in notes.iter_mut().filter_map(Note::metadata_mut) {
            metadata.font_size = font_size;
        }
        info!("font size set to {font_size} for all notes");
        Ok(())
    }

    /// Changes the font of a single note and persists it.
    pub fn set_note_font(
        &mut self,
        note: &mut Note,
        font_family: Option<&str>,
        font_size: Option<u32>,
    ) -> NoteResult<()> {
        let key = metadata_key(note);
        let mut metadata = note
            .metadata()
            .cloned()
            .unwrap_or_else(|| self.metadata.get_or_default(&key));
        if let Some(family) = font_family {
            metadata.font_family = family.to_string();
        }
        if let Some(size) = font_size {
            metadata.font_size = size;
        }

        self.metadata.add_or_update(key, metadata.clone());
        self.metadata.save()?;
        note.set_metadata(metadata);
        Ok(())
    }

    /// Removes the entry stored under `key`, falling back to the note's own
    /// metadata and then to defaults.
    fn take_metadata(&mut self, key: &str, note: &Note) -> NoteMetadata {
        self.metadata
            .remove(key)
            .or_else(|| note.metadata().cloned())
            .unwrap_or_else(|| NoteMetadata::from_defaults(self.metadata.defaults()))
    }
}

impl<R: NoteRepository + NoteRelocation> NoteService<R> {
    /// Returns the directory currently holding the notes.
    pub fn notes_dir(&self) -> &Path {
        self.repository.root()
    }

    /// Relocates every note to `new_directory`.
    ///
    /// Metadata is keyed by name, not path, and is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error for which [`is_move_conflict`](crate::service::NoteError::is_move_conflict)
    /// is true if any destination already exists; nothing is moved then.
    pub fn move_all(&mut self, new_directory: &Path) -> NoteResult<()> {
        self.repository.move_all(new_directory)?;
        Ok(())
    }
}

fn ensure_active(note: &Note) -> NoteResult<()> {
    if note.is_archived() {
        return Err(NoteError::Archived {
            name: note.name().to_string(),
        });
    }
    Ok(())
}

/// Returns the metadata key under which a note's metadata is stored.
fn metadata_key(note: &Note) -> String {
    if note.is_archived() {
        archive_key(note.name())
    } else {
        note.name().to_string()
    }
}
