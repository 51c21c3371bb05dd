//! Saved searches.
//!
//! Searches are stored by title as packed operation settings. The store file
//! is postcard encoded and zstd compressed, and replaced atomically on save.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::operation::SearchReplaceOperation;

/// Store file format version - increment when changing the format.
pub const SAVED_SEARCHES_VERSION: u32 = 1;

const ZSTD_LEVEL: i32 = 6;

#[derive(Serialize, Deserialize)]
struct SavedSearchFile {
    version: u32,
    entries: Vec<SavedEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SavedEntry {
    title: String,
    packed: Vec<u8>,
}

/// Title-keyed collection of saved search operations backed by one file.
#[derive(Debug)]
pub struct SavedSearchStore {
    path: PathBuf,
    entries: BTreeMap<String, Vec<u8>>,
}

impl SavedSearchStore {
    /// Opens the store at `path`.
    ///
    /// A missing file gives an empty store. So does a file that cannot be
    /// read back; it is logged and overwritten on the next save.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path).unwrap_or_default();
        log::debug!(
            "opened saved searches {} ({} entries)",
            path.display(),
            entries.len()
        );
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Saves `op` under its title, replacing any search with that title.
    pub fn insert(&mut self, op: &SearchReplaceOperation) -> Result<()> {
        let packed = op.get_packed_settings()?;
        self.entries.insert(op.title().to_string(), packed);
        Ok(())
    }

    /// Rebuilds the saved search called `title`.
    pub fn get(&self, title: &str) -> Result<Option<SearchReplaceOperation>> {
        let Some(packed) = self.entries.get(title) else {
            return Ok(None);
        };
        let mut op = SearchReplaceOperation::new();
        op.set_packed_settings(packed)?;
        op.set_title(Some(title.to_string()));
        Ok(Some(op))
    }

    pub fn remove(&mut self, title: &str) -> bool {
        self.entries.remove(title).is_some()
    }

    /// Titles in ascending order.
    pub fn titles(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Writes the store to its file (temp file + rename).
    pub fn save(&self) -> Result<()> {
        let storage = SavedSearchFile {
            version: SAVED_SEARCHES_VERSION,
            entries: self
                .entries
                .iter()
                .map(|(title, packed)| SavedEntry {
                    title: title.clone(),
                    packed: packed.clone(),
                })
                .collect(),
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.path.with_extension("tmp");
        {
            let output = File::create(&tmp_path)?;
            let encoder = zstd::Encoder::new(output, ZSTD_LEVEL)?;
            let mut output = BufWriter::new(encoder.auto_finish());
            postcard::to_io(&storage, &mut output).map_err(|error| {
                SearchError::Serialization(format!(
                    "failed to encode saved searches with postcard: {error}"
                ))
            })?;
        }

        fs::rename(&tmp_path, &self.path)?;

        log::debug!(
            "wrote saved searches to {} ({} entries)",
            self.path.display(),
            storage.entries.len()
        );
        Ok(())
    }
}

fn load_entries(path: &Path) -> Option<BTreeMap<String, Vec<u8>>> {
    let input = match File::open(path) {
        Ok(file) => file,
        Err(error) if error.kind() == ErrorKind::NotFound => return None,
        Err(error) => {
            log::warn!("saved searches read failed for {}: {}", path.display(), error);
            return None;
        }
    };

    let mut bytes = Vec::new();
    let decompressed = zstd::Decoder::new(input).and_then(|mut decoder| decoder.read_to_end(&mut bytes));
    if let Err(error) = decompressed {
        log::warn!(
            "saved searches decompress failed for {}: {}",
            path.display(),
            error
        );
        return None;
    }

    let storage: SavedSearchFile = match postcard::from_bytes(&bytes) {
        Ok(storage) => storage,
        Err(error) => {
            log::warn!("saved searches decode failed for {}: {}", path.display(), error);
            return None;
        }
    };

    if storage.version != SAVED_SEARCHES_VERSION {
        log::warn!(
            "saved searches version mismatch for {}: {} != {}",
            path.display(),
            storage.version,
            SAVED_SEARCHES_VERSION
        );
        return None;
    }

    Some(
        storage
            .entries
            .into_iter()
            .map(|entry| (entry.title, entry.packed))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::SearchSettings;
    use crate::types::WildcardMode;
    use tempfile::TempDir;

    fn operation(search: &str, title: Option<&str>) -> SearchReplaceOperation {
        SearchReplaceOperation::with_settings(SearchSettings {
            search: search.to_string(),
            whole_word: true,
            wildcard: WildcardMode::None,
            title: title.map(str::to_string),
            ..SearchSettings::default()
        })
    }

    #[test]
    fn missing_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let store = SavedSearchStore::open(dir.path().join("searches.bin.zst"));
        assert!(store.is_empty());
    }

    #[test]
    fn save_and_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("searches.bin.zst");

        let mut store = SavedSearchStore::open(&path);
        store.insert(&operation("needle", Some("Needles"))).unwrap();
        store.insert(&operation("apple", None)).unwrap();
        store.save().unwrap();
        assert!(!path.with_extension("tmp").exists());

        let reopened = SavedSearchStore::open(&path);
        assert_eq!(reopened.titles(), vec!["Needles", "apple"]);

        let op = reopened.get("Needles").unwrap().unwrap();
        assert_eq!(op.title(), "Needles");
        assert_eq!(op.settings().search, "needle");
        assert!(op.settings().whole_word);
        assert_eq!(op.settings().wildcard, WildcardMode::None);
        assert!(reopened.get("missing").unwrap().is_none());
    }

    #[test]
    fn insert_replaces_same_title() {
        let dir = TempDir::new().unwrap();
        let mut store = SavedSearchStore::open(dir.path().join("searches.bin.zst"));
        store.insert(&operation("first", Some("Shared"))).unwrap();
        store.insert(&operation("second", Some("Shared"))).unwrap();

        assert_eq!(store.len(), 1);
        let op = store.get("Shared").unwrap().unwrap();
        assert_eq!(op.settings().search, "second");

        assert!(store.remove("Shared"));
        assert!(!store.remove("Shared"));
        assert!(store.is_empty());
    }

    #[test]
    fn corrupt_file_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("searches.bin.zst");
        fs::write(&path, b"not a saved search file").unwrap();

        let mut store = SavedSearchStore::open(&path);
        assert!(store.is_empty());

        store.insert(&operation("fresh", None)).unwrap();
        store.save().unwrap();
        assert_eq!(SavedSearchStore::open(&path).titles(), vec!["fresh"]);
    }
}
