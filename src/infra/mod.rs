//! File I/O, metadata persistence, preferences

mod fs;
mod metadata;
mod preferences;

pub use fs::{
    FsError, NOTE_EXTENSION, create_new, ensure_dir, last_write_time, move_file,
    next_available_name, note_name, note_path, read_text, remove_file, rename_no_clobber,
    scan_note_files, write_atomic,
};
pub use metadata::{MetadataError, MetadataStore};
pub use preferences::{Preferences, PreferencesError, WindowGeometry};
