use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::core::{
    errors::Result,
    utils::{ensure_dir, write_atomic, PathResolver},
};

use super::KeyValueStore;

const DOCUMENT_EXTENSION: &str = "json";

/// Filesystem-backed store writing one JSON document per key.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    /// Opens (and creates if needed) the store rooted at `root/data`, or the
    /// default application directory when `root` is `None`.
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let base = PathResolver::resolve_base(root);
        Self::at(PathResolver::data_dir_in(&base))
    }

    /// Opens the store directly in `data_dir`.
    pub fn at(data_dir: PathBuf) -> Result<Self> {
        ensure_dir(&data_dir)?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn document_path(&self, key: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", canonical_key(key), DOCUMENT_EXTENSION))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.document_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.document_path(key);
        write_atomic(&path, value)?;
        tracing::trace!(path = %path.display(), bytes = value.len(), "wrote document");
        Ok(())
    }
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "store".into()
    } else {
        sanitized
    }
}
