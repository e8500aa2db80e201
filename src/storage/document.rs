//! Whole-file JSON documents
//!
//! Every persisted structure in Fluxo (accounts, the session, each
//! transaction collection) is one JSON document that is read in full and
//! replaced in full. A replacement is staged in a sibling temp file and
//! renamed over the old one, so readers see either the old or the new
//! document.

use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;

use crate::error::{FluxoError, FluxoResult};

/// A typed JSON document at a fixed path
pub struct JsonDocument<T> {
    path: PathBuf,
    _content: PhantomData<fn() -> T>,
}

impl<T> JsonDocument<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _content: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document; `None` when it has never been written
    ///
    /// A file that exists but does not decode is an error, never `None`,
    /// so a damaged document is not mistaken for an empty one.
    pub fn load(&self) -> FluxoResult<Option<T>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(FluxoError::Storage(format!(
                    "Cannot read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| FluxoError::Storage(format!("{} is damaged: {}", self.path.display(), e)))
    }

    /// Replace the document
    pub fn store(&self, value: &T) -> FluxoResult<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let dir_error = |e: std::io::Error| {
            FluxoError::Storage(format!("Cannot write in {}: {}", dir.display(), e))
        };
        fs::create_dir_all(dir).map_err(dir_error)?;
        let staged = NamedTempFile::new_in(dir).map_err(dir_error)?;

        {
            let mut writer = BufWriter::new(staged.as_file());
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer
                .flush()
                .map_err(|e| FluxoError::Storage(format!("Cannot write staged document: {}", e)))?;
        }
        staged
            .as_file()
            .sync_all()
            .map_err(|e| FluxoError::Storage(format!("Cannot sync staged document: {}", e)))?;

        // Dropping the staged file on error removes it
        staged.persist(&self.path).map_err(|e| {
            FluxoError::Storage(format!("Cannot replace {}: {}", self.path.display(), e.error))
        })?;
        Ok(())
    }

    /// Delete the document; returns whether there was one
    pub fn discard(&self) -> FluxoResult<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(FluxoError::Storage(format!(
                "Cannot remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

impl<T> JsonDocument<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Read the document, treating a missing file as the empty value
    pub fn load_or_default(&self) -> FluxoResult<T> {
        Ok(self.load()?.unwrap_or_default())
    }
}
