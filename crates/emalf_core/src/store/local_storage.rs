//! File-backed key/value storage with browser local-storage semantics.
//!
//! The whole document is a JSON object mapping keys to string values. Every
//! write rewrites the document through a sibling temp file and a rename.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub type LocalStorageResult<T> = Result<T, LocalStorageError>;

#[derive(Debug)]
pub enum LocalStorageError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Display for LocalStorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "local storage I/O failed at `{}`: {source}", path.display())
            }
            Self::Corrupt { path, source } => {
                write!(f, "local storage at `{}` is not valid JSON: {source}", path.display())
            }
        }
    }
}

impl Error for LocalStorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Corrupt { source, .. } => Some(source),
        }
    }
}

/// Key/value document persisted at one file path.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    /// Binds storage to `path`. The file is created on first write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the value stored under `key`, if any.
    pub fn get_item(&self, key: &str) -> LocalStorageResult<Option<String>> {
        Ok(self.read_document()?.remove(key))
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set_item(&self, key: &str, value: impl Into<String>) -> LocalStorageResult<()> {
        let mut document = self.read_document()?;
        document.insert(key.to_string(), value.into());
        self.write_document(&document)
    }

    pub fn remove_item(&self, key: &str) -> LocalStorageResult<()> {
        let mut document = self.read_document()?;
        if document.remove(key).is_some() {
            self.write_document(&document)?;
        }
        Ok(())
    }

    fn read_document(&self) -> LocalStorageResult<BTreeMap<String, String>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => return Err(self.io_error(source)),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&raw).map_err(|source| self.corrupt(source))
    }

    fn write_document(&self, document: &BTreeMap<String, String>) -> LocalStorageResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let encoded =
            serde_json::to_string_pretty(document).map_err(|source| self.corrupt(source))?;
        let staging = self.path.with_extension("tmp");
        std::fs::write(&staging, encoded).map_err(|source| self.io_error(source))?;
        std::fs::rename(&staging, &self.path).map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: std::io::Error) -> LocalStorageError {
        LocalStorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn corrupt(&self, source: serde_json::Error) -> LocalStorageError {
        LocalStorageError::Corrupt {
            path: self.path.clone(),
            source,
        }
    }
}
