//! Isolated test environment with temp directories.

// Allow dead code since not every test binary uses every helper
#![allow(dead_code)]

use super::NoteboxCommand;
use notebox::cli::config::Config;
use notebox::infra::Preferences;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated test environment with a notes directory and a state directory.
///
/// Creates a temp directory that is automatically cleaned up on drop. The
/// notes directory is created lazily by the first command that writes a note.
pub struct TestEnv {
    /// The temporary directory (kept for lifetime management)
    temp_dir: TempDir,
    notes_dir: PathBuf,
    state_dir: PathBuf,
}

impl TestEnv {
    /// Creates a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let notes_dir = temp_dir.path().join("notes");
        let state_dir = temp_dir.path().join("state");
        Self {
            temp_dir,
            notes_dir,
            state_dir,
        }
    }

    /// Returns the root of the temp directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Returns the path to the notes directory.
    pub fn notes_dir(&self) -> &Path {
        &self.notes_dir
    }

    /// Returns the path to the state directory.
    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Returns the path of an active note file.
    pub fn note_path(&self, name: &str) -> PathBuf {
        self.notes_dir.join(format!("{name}.txt"))
    }

    /// Returns the path of an archived note file.
    pub fn archived_path(&self, name: &str) -> PathBuf {
        self.notes_dir.join("archive").join(format!("{name}.txt"))
    }

    /// Returns the path of the metadata file for the notes directory.
    pub fn metadata_path(&self) -> PathBuf {
        self.metadata_path_for(&self.notes_dir)
    }

    /// Returns the path of the metadata file for any notes directory.
    pub fn metadata_path_for(&self, notes_dir: &Path) -> PathBuf {
        Config::default()
            .metadata_location(&self.state_dir)
            .path_for(notes_dir)
    }

    /// Returns the path of the preferences file.
    pub fn preferences_path(&self) -> PathBuf {
        self.state_dir.join("preferences.dat")
    }

    /// Writes an active note file directly, bypassing the CLI.
    pub fn add_note(&self, name: &str, content: &str) -> PathBuf {
        let path = self.note_path(name);
        write_file(&path, content);
        path
    }

    /// Writes an archived note file directly, bypassing the CLI.
    pub fn add_archived_note(&self, name: &str, content: &str) -> PathBuf {
        let path = self.archived_path(name);
        write_file(&path, content);
        path
    }

    /// Reads an active note file.
    pub fn read_note(&self, name: &str) -> String {
        std::fs::read_to_string(self.note_path(name)).expect("Failed to read note")
    }

    /// Parses the metadata file of the notes directory.
    pub fn metadata(&self) -> Value {
        self.metadata_for(&self.notes_dir)
    }

    /// Parses the metadata file of any notes directory.
    pub fn metadata_for(&self, notes_dir: &Path) -> Value {
        let contents = std::fs::read_to_string(self.metadata_path_for(notes_dir))
            .expect("Failed to read metadata");
        serde_json::from_str(&contents).expect("Metadata is not valid JSON")
    }

    /// Loads the preferences file through the library.
    pub fn preferences(&self) -> Preferences {
        Preferences::load(&self.preferences_path()).expect("Failed to load preferences")
    }

    /// Writes `config.toml` into the state directory.
    pub fn write_config(&self, contents: &str) {
        write_file(&self.state_dir.join("config.toml"), contents);
    }

    /// Creates a command configured for this test environment.
    pub fn cmd(&self) -> NoteboxCommand {
        NoteboxCommand::new()
            .state_dir(&self.state_dir)
            .dir(&self.notes_dir)
    }

    /// Creates a command that works on another notes directory.
    pub fn cmd_in(&self, notes_dir: &Path) -> NoteboxCommand {
        NoteboxCommand::new().state_dir(&self.state_dir).dir(notes_dir)
    }

    /// Creates a command that relies on the saved notes directory.
    pub fn cmd_without_dir(&self) -> NoteboxCommand {
        NoteboxCommand::new().state_dir(&self.state_dir)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create directory");
    }
    std::fs::write(path, content).expect("Failed to write file");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_paths_live_under_temp_dir() {
        let env = TestEnv::new();
        assert!(env.notes_dir().starts_with(env.root()));
        assert!(env.state_dir().starts_with(env.root()));
        assert!(env.note_path("A").ends_with("notes/A.txt"));
        assert!(env.archived_path("A").ends_with("notes/archive/A.txt"));
    }

    #[test]
    fn test_env_metadata_is_per_notes_dir() {
        let env = TestEnv::new();
        let other = env.root().join("other");
        assert!(env.metadata_path().starts_with(env.state_dir()));
        assert_ne!(env.metadata_path(), env.metadata_path_for(&other));
    }

    #[test]
    fn test_env_cleanup_on_drop() {
        let path = {
            let env = TestEnv::new();
            env.root().to_path_buf()
        };
        assert!(!path.exists(), "temp directory should be cleaned up on drop");
    }

    #[test]
    fn test_env_add_note_creates_file() {
        let env = TestEnv::new();
        let path = env.add_note("Hello", "world");
        assert!(path.is_file());
        assert_eq!(env.read_note("Hello"), "world");
    }

    #[test]
    fn test_env_provides_command() {
        let env = TestEnv::new();
        let cmd = env.cmd();
        let args = cmd.get_args();
        assert_eq!(args[0], "--state-dir");
        assert_eq!(args[1], env.state_dir().to_string_lossy());
        assert_eq!(args[2], "--dir");
        assert_eq!(args[3], env.notes_dir().to_string_lossy());
    }
}
