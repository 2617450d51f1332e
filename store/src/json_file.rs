//! Single-document JSON file store.

use crate::ReservationStore;
use packstation_core::{Reservation, ReservationError, Result, Status};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// The persisted document layout: `{ "reservations": [...] }`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    reservations: Vec<Reservation>,
}

/// Reservation store backed by a single JSON document on disk.
///
/// Loads the whole document at startup and rewrites it on every mutation.
/// An absent or unparsable document initializes an empty collection rather
/// than failing the process; write failures surface as
/// [`ReservationError::Persistence`].
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    document: Document,
}

impl JsonFileStore {
    /// Opens the store at `path`, creating parent directories as needed.
    ///
    /// Never fails: an unreadable or corrupt document is logged and
    /// replaced with an empty collection on the next write.
    #[must_use]
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if let Err(error) = fs::create_dir_all(parent) {
                tracing::warn!(path = %parent.display(), %error, "could not create data directory");
            }
        }
        let document = Self::read_document(&path);
        tracing::info!(
            path = %path.display(),
            reservations = document.reservations.len(),
            "reservation store loaded"
        );
        Self { path, document }
    }

    fn read_document(path: &Path) -> Document {
        let raw = match fs::read(path) {
            Ok(raw) => raw,
            Err(error) => {
                if error.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), %error, "could not read document, starting empty");
                }
                return Document::default();
            }
        };
        match serde_json::from_slice(&raw) {
            Ok(document) => document,
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "unparsable document, starting empty");
                Document::default()
            }
        }
    }

    /// Whole-document rewrite: serialize everything, write a sibling temp
    /// file, rename over the old document so readers never observe a
    /// half-written file.
    fn persist(&self) -> Result<()> {
        let json = serde_json::to_vec_pretty(&self.document)
            .map_err(|e| ReservationError::persistence(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &json).map_err(|e| ReservationError::persistence(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| ReservationError::persistence(e.to_string()))?;
        Ok(())
    }

    /// Path of the persisted document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReservationStore for JsonFileStore {
    fn find(&self, key: &str) -> Option<Reservation> {
        self.document
            .reservations
            .iter()
            .find(|r| r.matches_key(key))
            .cloned()
    }

    fn upsert(&mut self, reservation: Reservation) -> Result<()> {
        match self
            .document
            .reservations
            .iter_mut()
            .find(|r| r.id == reservation.id)
        {
            Some(existing) => *existing = reservation,
            None => self.document.reservations.push(reservation),
        }
        self.persist()
    }

    fn list(&self, status: Option<Status>) -> Vec<Reservation> {
        self.document
            .reservations
            .iter()
            .filter(|r| status.is_none_or(|s| r.status == s))
            .cloned()
            .collect()
    }
}
