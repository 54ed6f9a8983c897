//! Note repository backed by a directory of `<name>.txt` files.

use crate::domain::{Note, archive_key};
use crate::infra::{
    FsError, create_new, ensure_dir, last_write_time, move_file, next_available_name, note_name,
    note_path, read_text, remove_file, rename_no_clobber, scan_note_files, write_atomic,
};
use crate::store::{NoteRelocation, NoteRepository, StoreError, StoreResult};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Name of the subdirectory holding archived notes.
pub const ARCHIVE_DIR_NAME: &str = "archive";

/// Base name for notes created with [`NoteRepository::create_quick`].
pub const QUICK_NOTE_NAME: &str = "Quick note";

/// File-system note repository.
///
/// Layout:
/// - `{root}/<name>.txt` - active notes
/// - `{root}/archive/<name>.txt` - archived notes
///
/// The root directory is created lazily by the first write; reading from a
/// missing root yields no notes.
#[derive(Debug, Clone)]
pub struct FileNoteStore {
    root: PathBuf,
}

impl FileNoteStore {
    /// Creates a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the archive directory.
    pub fn archive_dir(&self) -> PathBuf {
        self.root.join(ARCHIVE_DIR_NAME)
    }

    fn active_path(&self, name: &str) -> PathBuf {
        note_path(&self.root, name)
    }

    fn archived_path(&self, name: &str) -> PathBuf {
        note_path(&self.archive_dir(), name)
    }

    /// Moves `name` from `from_dir` into `to_dir`, picking a free name there.
    fn transfer(&self, name: &str, from_dir: &Path, to_dir: &Path) -> StoreResult<String> {
        let source = note_path(from_dir, name);
        if !source.is_file() {
            return Err(FsError::NotFound { path: source }.into());
        }

        ensure_dir(to_dir)?;
        let target = next_available_name(to_dir, name);
        move_file(&source, &note_path(to_dir, &target))?;
        Ok(target)
    }
}

/// Loads a note file with its content and last write time.
fn load_note(path: &Path) -> StoreResult<Note> {
    let name = note_name(path).ok_or_else(|| FsError::NotFound { path: path.into() })?;
    let content = read_text(path)?;
    let modified = last_write_time(path)?;
    Ok(Note::new(name, content, modified))
}

impl NoteRepository for FileNoteStore {
    fn create(&mut self, name: &str) -> StoreResult<()> {
        ensure_dir(&self.root)?;
        let path = self.active_path(name);
        create_new(&path, "")?;
        debug!("created {}", path.display());
        Ok(())
    }

    fn create_quick(&mut self, content: &str) -> StoreResult<String> {
        ensure_dir(&self.root)?;
        let name = next_available_name(&self.root, QUICK_NOTE_NAME);
        create_new(&self.active_path(&name), content)?;
        debug!("created quick note '{name}'");
        Ok(name)
    }

    fn update(&mut self, old_name: &str, new_name: &str) -> StoreResult<()> {
        rename_no_clobber(&self.active_path(old_name), &self.active_path(new_name))?;
        Ok(())
    }

    fn delete(&mut self, name: &str) -> StoreResult<()> {
        remove_file(&self.active_path(name))?;
        Ok(())
    }

    fn delete_archived(&mut self, name: &str) -> StoreResult<()> {
        remove_file(&self.archived_path(name))?;
        Ok(())
    }

    fn save(&mut self, name: &str, content: &str) -> StoreResult<()> {
        let path = self.active_path(name);
        if !path.is_file() {
            return Err(FsError::NotFound { path }.into());
        }
        write_atomic(&path, content)?;
        Ok(())
    }

    fn exists(&self, name: &str) -> bool {
        self.active_path(name).is_file()
    }

    fn active_names(&self) -> StoreResult<Vec<String>> {
        Ok(scan_note_files(&self.root)
            .iter()
            .filter_map(|p| note_name(p))
            .collect())
    }

    fn read(&self, name: &str) -> StoreResult<Note> {
        load_note(&self.active_path(name))
    }

    fn archive(&mut self, name: &str) -> StoreResult<String> {
        let archived = self.transfer(name, &self.root, &self.archive_dir())?;
        if archived != name {
            info!("archive already had '{name}', archived as '{archived}'");
        }
        Ok(archived)
    }

    fn restore(&mut self, name: &str) -> StoreResult<String> {
        let restored = self.transfer(name, &self.archive_dir(), &self.root)?;
        if restored != name {
            info!("'{name}' already active, restored as '{restored}'");
        }
        Ok(restored)
    }

    fn get_all(&self) -> StoreResult<Vec<Note>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut notes = scan_note_files(&self.root)
            .iter()
            .map(|p| load_note(p))
            .collect::<StoreResult<Vec<_>>>()?;

        for path in scan_note_files(&self.archive_dir()) {
            if let Some(name) = note_name(&path) {
                notes.push(Note::new(archive_key(&name), "", last_write_time(&path)?));
            }
        }

        Ok(notes)
    }

    fn get_all_archived(&self) -> StoreResult<Vec<Note>> {
        scan_note_files(&self.archive_dir())
            .iter()
            .map(|p| load_note(p))
            .collect()
    }
}

impl NoteRelocation for FileNoteStore {
    fn root(&self) -> &Path {
        &self.root
    }

    fn move_all(&mut self, new_root: &Path) -> StoreResult<()> {
        if is_same_dir(&self.root, new_root) {
            debug!("move_all target is the current root, nothing to do");
            return Ok(());
        }

        let old_archive = self.archive_dir();
        let new_archive = new_root.join(ARCHIVE_DIR_NAME);
        let active = scan_note_files(&self.root);
        let archived = scan_note_files(&old_archive);

        let planned: Vec<(PathBuf, PathBuf)> = active
            .into_iter()
            .map(|p| relocation(p, new_root))
            .chain(archived.into_iter().map(|p| relocation(p, &new_archive)))
            .collect();

        let conflicts: Vec<PathBuf> = planned
            .iter()
            .filter(|(_, to)| to.exists())
            .map(|(_, to)| to.clone())
            .collect();
        if !conflicts.is_empty() {
            warn!(
                "refusing to move notes to {}: {} conflicting file(s)",
                new_root.display(),
                conflicts.len()
            );
            return Err(StoreError::MoveConflict { conflicts });
        }

        ensure_dir(new_root)?;
        if planned.iter().any(|(_, to)| to.starts_with(&new_archive)) {
            ensure_dir(&new_archive)?;
        }
        for (from, to) in &planned {
            move_file(from, to)?;
        }

        if old_archive.is_dir()
            && let Err(e) = std::fs::remove_dir(&old_archive)
        {
            warn!("could not remove old archive {}: {e}", old_archive.display());
        }

        info!(
            "moved {} note(s) from {} to {}",
            planned.len(),
            self.root.display(),
            new_root.display()
        );
        self.root = new_root.to_path_buf();
        Ok(())
    }
}

fn relocation(from: PathBuf, to_dir: &Path) -> (PathBuf, PathBuf) {
    let to = match from.file_name() {
        Some(file_name) => to_dir.join(file_name),
        None => to_dir.to_path_buf(),
    };
    (from, to)
}

fn is_same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
