use crate::domain::Location;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// Reads and writes the complete location collection at a single path.
pub trait PersistenceGateway {
    fn read_all(&self, path: &Path) -> Result<Vec<Location>, PersistenceError>;

    /// Replaces the file at `path` with `locations`. Readers observe either the previous or the new
    /// collection, never a partial write.
    fn write_all(&self, path: &Path, locations: &[Location]) -> Result<(), PersistenceError>;
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("unable to access '{}': {}", path.display(), source)]
    Io { source: io::Error, path: PathBuf },
    #[error("unable to decode '{}': {}", path.display(), source)]
    Decode { source: serde_json::Error, path: PathBuf },
    #[error("location '{id}' has a non-finite coordinate ({latitude}, {longitude})")]
    InvalidCoordinate { id: Uuid, latitude: f64, longitude: f64 },
    #[error("unable to encode locations: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("unable to replace '{}': {}", path.display(), source)]
    Persist { source: io::Error, path: PathBuf },
}
