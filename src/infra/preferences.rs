//! Application preferences stored as a fixed-layout binary record.
//!
//! Layout, little-endian, no version field:
//!
//! | field               | encoding                                    |
//! |---------------------|---------------------------------------------|
//! | notes directory     | 7-bit encoded byte length + UTF-8 bytes     |
//! | autosave interval   | `u16` seconds                               |
//! | window width        | `i32`                                       |
//! | window height       | `i32`                                       |
//! | window position X   | `i32`                                       |
//! | window position Y   | `i32`                                       |

use log::debug;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::infra::fs::{FsError, ensure_dir, write_atomic};

/// Errors reading or writing the preferences file.
#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("failed to read preferences file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write preferences file: {0}")]
    Write(#[from] FsError),

    #[error("preferences file is truncated while reading {field}")]
    Truncated { field: &'static str },

    #[error("preferences file contains an invalid notes directory string")]
    InvalidUtf8,

    #[error("preferences string length prefix is malformed")]
    BadLength,
}

/// Saved window placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowGeometry {
    pub width: i32,
    pub height: i32,
    pub position_x: i32,
    pub position_y: i32,
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            position_x: 100,
            position_y: 100,
        }
    }
}

/// The single global settings record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preferences {
    /// Root of the notes directory; empty means not configured yet.
    pub notes_directory: String,
    /// Autosave interval in seconds.
    pub auto_save_interval: u16,
    pub window: WindowGeometry,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            notes_directory: String::new(),
            auto_save_interval: 30,
            window: WindowGeometry::default(),
        }
    }
}

impl Preferences {
    /// Returns the configured notes directory, if any.
    pub fn notes_dir(&self) -> Option<PathBuf> {
        if self.notes_directory.trim().is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.notes_directory))
        }
    }

    /// Loads preferences from `path`, or defaults if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, PreferencesError> {
        if !path.exists() {
            debug!("no preferences at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let bytes = std::fs::read(path).map_err(|source| PreferencesError::Io {
            path: path.into(),
            source,
        })?;
        Self::decode(&bytes)
    }

    /// Writes preferences to `path`, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<(), PreferencesError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            ensure_dir(parent)?;
        }

        write_atomic(path, self.encode())?;
        debug!("saved preferences to {}", path.display());
        Ok(())
    }

    /// Serializes the record in field order.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.notes_directory.len() + 24);
        write_string(&mut out, &self.notes_directory);
        out.extend_from_slice(&self.auto_save_interval.to_le_bytes());
        out.extend_from_slice(&self.window.width.to_le_bytes());
        out.extend_from_slice(&self.window.height.to_le_bytes());
        out.extend_from_slice(&self.window.position_x.to_le_bytes());
        out.extend_from_slice(&self.window.position_y.to_le_bytes());
        out
    }

    /// Parses a record; fields are read in exactly the order they were written.
    pub fn decode(bytes: &[u8]) -> Result<Self, PreferencesError> {
        let mut reader = Reader { bytes, pos: 0 };

        let notes_directory = reader.string()?;
        let auto_save_interval = u16::from_le_bytes(reader.array("autosave interval")?);
        let window = WindowGeometry {
            width: i32::from_le_bytes(reader.array("window width")?),
            height: i32::from_le_bytes(reader.array("window height")?),
            position_x: i32::from_le_bytes(reader.array("window position x")?),
            position_y: i32::from_le_bytes(reader.array("window position y")?),
        };

        Ok(Self {
            notes_directory,
            auto_save_interval,
            window,
        })
    }
}

/// Appends a string with a 7-bit encoded length prefix.
fn write_string(out: &mut Vec<u8>, s: &str) {
    let mut len = s.len();
    loop {
        let byte = (len & 0x7F) as u8;
        len >>= 7;
        if len == 0 {
            out.push(byte);
            break;
        }
        out.push(byte | 0x80);
    }
    out.extend_from_slice(s.as_bytes());
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn take(&mut self, n: usize, field: &'static str) -> Result<&[u8], PreferencesError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(PreferencesError::Truncated { field })?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], PreferencesError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N, field)?);
        Ok(buf)
    }

    fn string(&mut self) -> Result<String, PreferencesError> {
        let mut len: usize = 0;
        let mut shift = 0;
        loop {
            if shift > 28 {
                return Err(PreferencesError::BadLength);
            }
            let [byte] = self.array::<1>("notes directory length")?;
            len |= usize::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
        }

        let raw = self.take(len, "notes directory")?;
        String::from_utf8(raw.to_vec()).map_err(|_| PreferencesError::InvalidUtf8)
    }
}
