//! Local blob store for proof uploads.
//!
//! Files land in one flat directory under generated names; the reference
//! recorded on the reservation is the `/uploads/...` path the router serves
//! read-only. No size/type validation beyond the multipart cap and no
//! cleanup policy.

use packstation_core::Result;
use packstation_core::ReservationError;
use packstation_core::environment::BlobStore;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Blob store writing to a local directory.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    dir: PathBuf,
}

impl LocalBlobStore {
    /// Creates a blob store rooted at `dir` (created lazily on first write).
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl BlobStore for LocalBlobStore {
    fn store(&self, filename_hint: &str, bytes: &[u8]) -> Result<String> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| ReservationError::persistence(e.to_string()))?;

        let extension = Path::new(filename_hint)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        let name = format!("{}.{extension}", Uuid::new_v4());

        fs::write(self.dir.join(&name), bytes)
            .map_err(|e| ReservationError::persistence(e.to_string()))?;
        tracing::debug!(file = %name, size = bytes.len(), "stored proof upload");
        Ok(format!("/uploads/{name}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;

    #[test]
    fn stores_bytes_and_returns_reference() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = LocalBlobStore::new(dir.path());
        let reference = blobs.store("door.jpg", b"jpeg bytes").unwrap();
        assert!(reference.starts_with("/uploads/"));
        assert!(reference.ends_with(".jpg"));

        let name = reference.strip_prefix("/uploads/").unwrap();
        let stored = fs::read(dir.path().join(name)).unwrap();
        assert_eq!(stored, b"jpeg bytes");
    }

    #[test]
    fn hint_without_extension_falls_back_to_bin() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = LocalBlobStore::new(dir.path());
        let reference = blobs.store("proof", b"x").unwrap();
        assert!(reference.ends_with(".bin"));
    }
}
