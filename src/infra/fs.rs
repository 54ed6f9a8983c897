//! File I/O primitives for note files with atomic writes.

use chrono::{DateTime, Utc};
use log::debug;
use std::fs::{self, OpenOptions};
use std::io::{self, Write as IoWrite};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// Extension of note files, without the leading dot.
pub const NOTE_EXTENSION: &str = "txt";

/// Errors during file system operations on notes.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("note file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("note file already exists: {path}")]
    AlreadyExists { path: PathBuf },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("atomic write failed for {path}: {source}")]
    AtomicWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid encoding in {path}: {encoding}")]
    InvalidEncoding { path: PathBuf, encoding: String },
}

impl FsError {
    /// Creates an appropriate FsError from an io::Error.
    pub(crate) fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => FsError::NotFound { path: path.into() },
            io::ErrorKind::AlreadyExists => FsError::AlreadyExists { path: path.into() },
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied { path: path.into() },
            _ => FsError::Io {
                path: path.into(),
                source: error,
            },
        }
    }
}

/// Returns the path of the note file `name` inside `dir`.
pub fn note_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.{NOTE_EXTENSION}"))
}

/// Returns the note name (file stem) of a note file path.
pub fn note_name(path: &Path) -> Option<String> {
    path.file_stem().and_then(|s| s.to_str()).map(str::to_string)
}

/// Reads a note file as UTF-8 text.
///
/// A UTF-8 byte order mark is stripped.
///
/// # Errors
///
/// Returns `FsError::NotFound` if the file doesn't exist.
/// Returns `FsError::PermissionDenied` if access is denied.
/// Returns `FsError::InvalidEncoding` if the file is UTF-16 or not valid UTF-8.
pub fn read_text(path: &Path) -> Result<String, FsError> {
    let bytes = fs::read(path).map_err(|e| FsError::from_io(path, e))?;
    decode_text(bytes, path)
}

fn decode_text(bytes: Vec<u8>, path: &Path) -> Result<String, FsError> {
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Err(FsError::InvalidEncoding {
            path: path.into(),
            encoding: "UTF-16 LE detected (byte order mark FF FE); convert to UTF-8".into(),
        });
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(FsError::InvalidEncoding {
            path: path.into(),
            encoding: "UTF-16 BE detected (byte order mark FE FF); convert to UTF-8".into(),
        });
    }

    let content = String::from_utf8(bytes).map_err(|e| FsError::InvalidEncoding {
        path: path.into(),
        encoding: format!("invalid UTF-8 at byte {}", e.utf8_error().valid_up_to()),
    })?;

    match content.strip_prefix('\u{FEFF}') {
        Some(stripped) => Ok(stripped.to_string()),
        None => Ok(content),
    }
}

/// Writes bytes to a file path atomically.
///
/// Uses a temporary file in the same directory and an atomic rename, so a
/// reader never observes a partially written file.
///
/// # Errors
///
/// Returns `FsError::NotFound` if the parent directory doesn't exist.
/// Returns `FsError::AtomicWrite` if the atomic rename fails.
pub fn write_atomic(path: &Path, content: impl AsRef<[u8]>) -> Result<(), FsError> {
    let parent = path
        .parent()
        .ok_or_else(|| FsError::NotFound { path: path.into() })?;

    if !parent.is_dir() {
        return Err(FsError::NotFound {
            path: parent.into(),
        });
    }

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| FsError::from_io(parent, e))?;

    temp.write_all(content.as_ref())
        .map_err(|e| FsError::Io {
            path: path.into(),
            source: e,
        })?;

    temp.persist(path).map_err(|e| FsError::AtomicWrite {
        path: path.into(),
        source: e.error,
    })?;

    Ok(())
}

/// Creates a new file with the given content, failing if it already exists.
pub fn create_new(path: &Path, content: &str) -> Result<(), FsError> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| FsError::from_io(path, e))?;

    file.write_all(content.as_bytes())
        .map_err(|e| FsError::from_io(path, e))
}

/// Returns the last modification time of a file.
pub fn last_write_time(path: &Path) -> Result<DateTime<Utc>, FsError> {
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| FsError::from_io(path, e))?;
    Ok(DateTime::<Utc>::from(modified))
}

/// Creates a directory and its parents if missing.
pub fn ensure_dir(dir: &Path) -> Result<(), FsError> {
    fs::create_dir_all(dir).map_err(|e| FsError::from_io(dir, e))
}

/// Lists note files (`*.txt`) directly inside a directory.
///
/// Subdirectories are not descended into and hidden files are skipped.
/// Returns an empty list if the directory doesn't exist. Paths are sorted.
pub fn scan_note_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| !is_hidden(e))
        .filter(has_note_extension)
        .map(DirEntry::into_path)
        .collect();
    paths.sort();
    paths
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|s| s.starts_with('.'))
}

fn has_note_extension(entry: &DirEntry) -> bool {
    entry
        .path()
        .extension()
        .is_some_and(|e| e == NOTE_EXTENSION)
}

/// Picks the first name not yet used by a note file in `dir`.
///
/// Tries `base` itself, then `base 1`, `base 2`, and so on.
///
/// # Examples
///
/// ```
/// use notebox::infra::next_available_name;
///
/// let dir = tempfile::tempdir().unwrap();
/// assert_eq!(next_available_name(dir.path(), "Quick note"), "Quick note");
///
/// std::fs::write(dir.path().join("Quick note.txt"), "").unwrap();
/// assert_eq!(next_available_name(dir.path(), "Quick note"), "Quick note 1");
/// ```
pub fn next_available_name(dir: &Path, base: &str) -> String {
    if !note_path(dir, base).exists() {
        return base.to_string();
    }

    (1u32..)
        .map(|n| format!("{base} {n}"))
        .find(|candidate| !note_path(dir, candidate).exists())
        .unwrap_or_else(|| base.to_string())
}

/// Renames a file without replacing an existing destination.
///
/// A rename that only changes the case of the file name is allowed even on
/// case-insensitive file systems, where the destination appears to exist.
///
/// # Errors
///
/// Returns `FsError::NotFound` if `from` doesn't exist.
/// Returns `FsError::AlreadyExists` if `to` exists and is a different file.
pub fn rename_no_clobber(from: &Path, to: &Path) -> Result<(), FsError> {
    if !from.exists() {
        return Err(FsError::NotFound { path: from.into() });
    }
    if to.exists() && !is_case_variant(from, to) {
        return Err(FsError::AlreadyExists { path: to.into() });
    }

    debug!("rename {} -> {}", from.display(), to.display());
    fs::rename(from, to).map_err(|e| FsError::from_io(from, e))
}

fn is_case_variant(a: &Path, b: &Path) -> bool {
    let lower = |p: &Path| p.file_name().map(|n| n.to_string_lossy().to_lowercase());
    a.parent() == b.parent() && lower(a) == lower(b)
}

/// Moves a file, falling back to copy and delete across file systems.
///
/// The destination is overwritten if present; callers check for collisions.
pub fn move_file(from: &Path, to: &Path) -> Result<(), FsError> {
    debug!("move {} -> {}", from.display(), to.display());
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(from, to).map_err(|e| FsError::from_io(to, e))?;
            fs::remove_file(from).map_err(|e| FsError::from_io(from, e))
        }
        Err(e) => Err(FsError::from_io(from, e)),
    }
}

/// Deletes a note file.
pub fn remove_file(path: &Path) -> Result<(), FsError> {
    debug!("delete {}", path.display());
    fs::remove_file(path).map_err(|e| FsError::from_io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    // ===========================================
    // FsError
    // ===========================================

    #[test]
    fn fs_error_not_found_displays_path() {
        let error = FsError::NotFound {
            path: PathBuf::from("/some/path.txt"),
        };
        assert!(error.to_string().contains("/some/path.txt"));
    }

    #[test]
    fn fs_error_from_io_maps_not_found() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error = FsError::from_io(Path::new("/test/path.txt"), io_error);
        assert!(matches!(error, FsError::NotFound { .. }));
    }

    #[test]
    fn fs_error_from_io_maps_already_exists() {
        let io_error = io::Error::new(io::ErrorKind::AlreadyExists, "exists");
        let error = FsError::from_io(Path::new("/test/path.txt"), io_error);
        assert!(matches!(error, FsError::AlreadyExists { .. }));
    }

    #[test]
    fn fs_error_from_io_maps_other_to_io() {
        let io_error = io::Error::new(io::ErrorKind::Other, "some other error");
        let error = FsError::from_io(Path::new("/test/path.txt"), io_error);
        assert!(matches!(error, FsError::Io { .. }));
    }

    // ===========================================
    // Paths and names
    // ===========================================

    #[test]
    fn note_path_appends_extension() {
        assert_eq!(
            note_path(Path::new("/notes"), "Ideas"),
            PathBuf::from("/notes/Ideas.txt")
        );
    }

    #[test]
    fn note_name_strips_extension() {
        assert_eq!(
            note_name(Path::new("/notes/v1.2 plan.txt")),
            Some("v1.2 plan".to_string())
        );
    }

    // ===========================================
    // read_text / write_atomic
    // ===========================================

    #[test]
    fn write_then_read_round_trips_unicode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("unicode.txt");

        write_atomic(&path, "emoji 🎉 and αβγ\r\nsecond line").unwrap();

        assert_eq!(read_text(&path).unwrap(), "emoji 🎉 and αβγ\r\nsecond line");
    }

    #[test]
    fn write_atomic_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("note.txt");

        write_atomic(&path, "first").unwrap();
        write_atomic(&path, "second").unwrap();

        assert_eq!(read_text(&path).unwrap(), "second");
    }

    #[test]
    fn write_atomic_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("note.txt");

        write_atomic(&path, "content").unwrap();

        let files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .collect();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name(), "note.txt");
    }

    #[test]
    fn write_atomic_requires_parent_directory() {
        let result = write_atomic(Path::new("/nonexistent/dir/note.txt"), "x");
        assert!(matches!(result, Err(FsError::NotFound { .. })));
    }

    #[test]
    fn read_text_strips_utf8_bom() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bom.txt");
        fs::write(&path, "\u{FEFF}hello").unwrap();

        assert_eq!(read_text(&path).unwrap(), "hello");
    }

    #[test]
    fn read_text_rejects_utf16() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("utf16.txt");
        fs::write(&path, [0xFF, 0xFE, b'h', 0x00]).unwrap();

        assert!(matches!(
            read_text(&path),
            Err(FsError::InvalidEncoding { .. })
        ));
    }

    #[test]
    fn read_text_missing_file_is_not_found() {
        let result = read_text(Path::new("/nonexistent/note.txt"));
        assert!(matches!(result, Err(FsError::NotFound { .. })));
    }

    #[test]
    fn create_new_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("note.txt");

        create_new(&path, "original").unwrap();
        let result = create_new(&path, "replacement");

        assert!(matches!(result, Err(FsError::AlreadyExists { .. })));
        assert_eq!(read_text(&path).unwrap(), "original");
    }

    // ===========================================
    // scan_note_files
    // ===========================================

    #[test]
    fn scan_missing_directory_is_empty() {
        assert!(scan_note_files(Path::new("/nonexistent/notes")).is_empty());
    }

    #[test]
    fn scan_finds_only_top_level_txt_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();
        fs::write(dir.path().join("readme.md"), "").unwrap();
        fs::write(dir.path().join(".hidden.txt"), "").unwrap();
        fs::create_dir(dir.path().join("archive")).unwrap();
        fs::write(dir.path().join("archive").join("old.txt"), "").unwrap();

        let names: Vec<_> = scan_note_files(dir.path())
            .iter()
            .filter_map(|p| note_name(p))
            .collect();

        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }

    // ===========================================
    // next_available_name
    // ===========================================

    #[test]
    fn next_available_name_uses_lowest_free_suffix() {
        let dir = TempDir::new().unwrap();
        fs::write(note_path(dir.path(), "Quick note"), "").unwrap();
        fs::write(note_path(dir.path(), "Quick note 1"), "").unwrap();
        fs::write(note_path(dir.path(), "Quick note 3"), "").unwrap();

        assert_eq!(next_available_name(dir.path(), "Quick note"), "Quick note 2");
    }

    // ===========================================
    // rename_no_clobber / move_file
    // ===========================================

    #[test]
    fn rename_no_clobber_refuses_existing_destination() {
        let dir = TempDir::new().unwrap();
        let from = note_path(dir.path(), "a");
        let to = note_path(dir.path(), "b");
        fs::write(&from, "a").unwrap();
        fs::write(&to, "b").unwrap();

        let result = rename_no_clobber(&from, &to);

        assert!(matches!(result, Err(FsError::AlreadyExists { .. })));
        assert_eq!(read_text(&from).unwrap(), "a");
        assert_eq!(read_text(&to).unwrap(), "b");
    }

    #[test]
    fn rename_no_clobber_missing_source_is_not_found() {
        let dir = TempDir::new().unwrap();
        let result = rename_no_clobber(&note_path(dir.path(), "a"), &note_path(dir.path(), "b"));
        assert!(matches!(result, Err(FsError::NotFound { .. })));
    }

    #[test]
    fn rename_no_clobber_allows_case_change() {
        let dir = TempDir::new().unwrap();
        let from = note_path(dir.path(), "ideas");
        let to = note_path(dir.path(), "Ideas");
        fs::write(&from, "x").unwrap();

        rename_no_clobber(&from, &to).unwrap();

        assert_eq!(read_text(&to).unwrap(), "x");
    }

    #[test]
    fn move_file_relocates_content() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let from = note_path(src.path(), "n");
        let to = note_path(dst.path(), "n");
        fs::write(&from, "moved").unwrap();

        move_file(&from, &to).unwrap();

        assert!(!from.exists());
        assert_eq!(read_text(&to).unwrap(), "moved");
    }
}
