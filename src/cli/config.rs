//! Configuration file support.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::NoteDefaults;
use crate::infra::Preferences;

const APP_DIR: &str = "notebox";
const CONFIG_FILE: &str = "config.toml";
const PREFERENCES_FILE: &str = "preferences.dat";
const METADATA_DIR: &str = "metadata";

/// Application configuration loaded from config file.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Location of the binary preferences file
    pub preferences_file: Option<PathBuf>,

    /// Location of the note metadata file, shared by every notes directory
    pub metadata_file: Option<PathBuf>,

    /// Font family given to new notes
    pub font_family: Option<String>,

    /// Font size given to new notes
    pub font_size: Option<u32>,
}

impl Config {
    /// Load configuration for the given state directory override.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load(state_dir: Option<&Path>) -> Result<Self> {
        let config_path = Self::config_path(state_dir);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read config file: {}", config_path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", config_path.display()))
    }

    /// Returns the path to the config file.
    ///
    /// Default: `~/.config/notebox/config.toml`, or `<state-dir>/config.toml`
    /// when a state directory is given.
    pub fn config_path(state_dir: Option<&Path>) -> PathBuf {
        match state_dir {
            Some(dir) => dir.join(CONFIG_FILE),
            None => dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
                .join(CONFIG_FILE),
        }
    }

    /// Returns the directory holding preferences and metadata.
    ///
    /// Default: `~/.local/share/notebox`
    pub fn state_dir(state_dir: Option<&Path>) -> PathBuf {
        state_dir.map(Path::to_path_buf).unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
        })
    }

    /// Resolve the preferences file path.
    pub fn preferences_path(&self, state_dir: &Path) -> PathBuf {
        self.preferences_file
            .clone()
            .unwrap_or_else(|| state_dir.join(PREFERENCES_FILE))
    }

    /// Resolve where note metadata is kept.
    ///
    /// A configured `metadata_file` is used for every notes directory.
    /// Otherwise each notes directory gets its own file under
    /// `<state-dir>/metadata/`.
    pub fn metadata_location(&self, state_dir: &Path) -> MetadataLocation {
        match &self.metadata_file {
            Some(file) => MetadataLocation::Fixed(file.clone()),
            None => MetadataLocation::PerNotesDir(state_dir.join(METADATA_DIR)),
        }
    }

    /// Metadata defaults for new notes, filled from the built-in values.
    pub fn defaults(&self) -> NoteDefaults {
        let builtin = NoteDefaults::default();
        NoteDefaults {
            font_family: self.font_family.clone().unwrap_or(builtin.font_family),
            font_size: self.font_size.unwrap_or(builtin.font_size),
        }
    }

    /// Resolve the notes directory, with CLI argument taking precedence.
    ///
    /// Precedence order:
    /// 1. CLI `--dir` argument
    /// 2. Saved `notes_directory` preference
    pub fn notes_dir(cli_dir: Option<&PathBuf>, preferences: &Preferences) -> Result<PathBuf> {
        if let Some(dir) = cli_dir {
            return Ok(dir.clone());
        }
        match preferences.notes_dir() {
            Some(dir) => Ok(dir),
            None => bail!(
                "notes directory not configured (pass --dir or run `notebox prefs --notes-dir DIR`)"
            ),
        }
    }
}

/// Where the metadata file for a notes directory lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataLocation {
    /// One file for all notes directories
    Fixed(PathBuf),
    /// One file per notes directory inside this directory
    PerNotesDir(PathBuf),
}

impl MetadataLocation {
    /// Returns the metadata file used for `notes_dir`.
    pub fn path_for(&self, notes_dir: &Path) -> PathBuf {
        match self {
            MetadataLocation::Fixed(file) => file.clone(),
            MetadataLocation::PerNotesDir(dir) => dir.join(metadata_file_name(notes_dir)),
        }
    }
}

/// Encodes the absolute notes directory into a file name.
///
/// Bytes outside `[A-Za-z0-9.-]` are percent-encoded, so distinct
/// directories never share a name. The directory need not exist yet.
fn metadata_file_name(notes_dir: &Path) -> String {
    let absolute = std::path::absolute(notes_dir).unwrap_or_else(|_| notes_dir.to_path_buf());
    let normalized: PathBuf = absolute.components().collect();

    let mut name = String::new();
    for byte in normalized.to_string_lossy().bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'.' || byte == b'-' {
            name.push(char::from(byte));
        } else {
            name.push_str(&format!("%{byte:02X}"));
        }
    }
    name.push_str(".json");
    name
}
