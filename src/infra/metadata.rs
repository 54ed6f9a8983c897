//! Persistent name → metadata mapping stored as a single JSON file.

use crate::domain::{NoteDefaults, NoteMetadata};
use crate::infra::fs::{FsError, write_atomic};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by the metadata store.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// No entry exists for the requested key.
    #[error("no metadata for note '{key}'")]
    NotFound { key: String },

    #[error("failed to read metadata file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse metadata file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write metadata file: {0}")]
    Write(#[from] FsError),
}

/// On-disk layout of the metadata file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct MetadataFile {
    #[serde(default)]
    notes: BTreeMap<String, NoteMetadata>,
}

/// Keyed mapping from note name to [`NoteMetadata`].
///
/// Active notes are keyed by their plain name, archived notes by
/// `archive/<name>`. The whole mapping is loaded on [`open`](Self::open) and
/// written on [`save`](Self::save); mutators only touch memory.
///
/// [`get`](Self::get) on an absent key returns [`MetadataError::NotFound`];
/// [`get_or_default`](Self::get_or_default) substitutes the configured
/// defaults instead.
#[derive(Debug)]
pub struct MetadataStore {
    path: PathBuf,
    defaults: NoteDefaults,
    entries: BTreeMap<String, NoteMetadata>,
}

impl MetadataStore {
    /// Loads the mapping stored at `path`.
    ///
    /// Returns an empty store if the file doesn't exist yet.
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::Io` if the file cannot be read and
    /// `MetadataError::Parse` if it isn't valid metadata JSON.
    pub fn open(path: impl Into<PathBuf>, defaults: NoteDefaults) -> Result<Self, MetadataError> {
        let path = path.into();

        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|source| MetadataError::Io {
                path: path.clone(),
                source,
            })?;
            let file: MetadataFile =
                serde_json::from_str(&contents).map_err(|source| MetadataError::Parse {
                    path: path.clone(),
                    source,
                })?;
            file.notes
        } else {
            BTreeMap::new()
        };

        debug!("loaded {} metadata entries from {}", entries.len(), path.display());
        Ok(Self {
            path,
            defaults,
            entries,
        })
    }

    /// Returns the file backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the defaults used for implicitly created entries.
    pub fn defaults(&self) -> &NoteDefaults {
        &self.defaults
    }

    /// Reconciles the mapping with the full set of known note keys.
    ///
    /// Keys without an entry receive default metadata. Entries whose key is
    /// not in `names` are purged. Returns true if anything changed.
    pub fn initialize<'a, I>(&mut self, names: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let known: HashSet<&str> = names.into_iter().collect();
        let mut changed = false;

        let stale: Vec<String> = self
            .entries
            .keys()
            .filter(|k| !known.contains(k.as_str()))
            .cloned()
            .collect();
        for key in stale {
            warn!("purging metadata for missing note '{key}'");
            self.entries.remove(&key);
            changed = true;
        }

        for name in known {
            if !self.entries.contains_key(name) {
                debug!("adding default metadata for '{name}'");
                self.entries
                    .insert(name.to_string(), NoteMetadata::from_defaults(&self.defaults));
                changed = true;
            }
        }

        changed
    }

    /// Inserts an entry, replacing any existing one.
    pub fn add(&mut self, key: impl Into<String>, metadata: NoteMetadata) {
        self.entries.insert(key.into(), metadata);
    }

    /// Alias of [`add`](Self::add) for call sites that update in place.
    pub fn add_or_update(&mut self, key: impl Into<String>, metadata: NoteMetadata) {
        self.add(key, metadata);
    }

    /// Copies every entry of `other` into this store, replacing entries that
    /// share a key.
    pub fn merge_from(&mut self, other: &MetadataStore) {
        for (key, metadata) in &other.entries {
            self.entries.insert(key.clone(), metadata.clone());
        }
    }

    /// Removes an entry. Removing an absent key is not an error.
    pub fn remove(&mut self, key: &str) -> Option<NoteMetadata> {
        self.entries.remove(key)
    }

    /// Returns the entry for `key`.
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::NotFound` if no entry exists.
    pub fn get(&self, key: &str) -> Result<&NoteMetadata, MetadataError> {
        self.entries.get(key).ok_or_else(|| MetadataError::NotFound {
            key: key.to_string(),
        })
    }

    /// Returns a copy of the entry for `key`, or default metadata.
    pub fn get_or_default(&self, key: &str) -> NoteMetadata {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| NoteMetadata::from_defaults(&self.defaults))
    }

    /// Returns true if an entry exists for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns all keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the distinct font families across all entries.
    pub fn distinct_fonts(&self) -> BTreeSet<&str> {
        self.entries
            .values()
            .map(|m| m.font_family.as_str())
            .collect()
    }

    /// Returns the distinct font sizes across all entries.
    pub fn distinct_font_sizes(&self) -> BTreeSet<u32> {
        self.entries.values().map(|m| m.font_size).collect()
    }

    /// Sets the font family of every entry.
    pub fn set_font_for_all(&mut self, font_family: &str) {
        for metadata in self.entries.values_mut() {
            metadata.font_family = font_family.to_string();
        }
    }

    /// Sets the font size of every entry.
    pub fn set_font_size_for_all(&mut self, font_size: u32) {
        for metadata in self.entries.values_mut() {
            metadata.font_size = font_size;
        }
    }

    /// Writes the whole mapping to disk, replacing the previous file.
    ///
    /// The parent directory is created if needed.
    pub fn save(&self) -> Result<(), MetadataError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            crate::infra::fs::ensure_dir(parent)?;
        }

        let file = MetadataFile {
            notes: self.entries.clone(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|source| MetadataError::Parse {
            path: self.path.clone(),
            source,
        })?;

        write_atomic(&self.path, &json)?;
        debug!("saved {} metadata entries to {}", self.entries.len(), self.path.display());
        Ok(())
    }
}
