//! On-disk snapshot of the embedding cache.
//!
//! One rkyv file holding every key → vector pair. Written to a temp file in the same directory,
//! synced, then renamed over the previous snapshot.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use rkyv::rancor::Error as RkyvError;
use rkyv::util::AlignedVec;
use rkyv::{Archive, Deserialize, Serialize, from_bytes, to_bytes};
use tempfile::NamedTempFile;

use super::error::{CacheError, CacheResult};

/// Format version; snapshots with a different version are discarded on load.
pub const SNAPSHOT_VERSION: u32 = 1;

/// One cached vector.
#[derive(Archive, Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct SnapshotEntry {
    /// BLAKE3 content hash of `(namespace, text)`.
    pub key: [u8; 32],
    pub vector: Vec<f32>,
}

/// Full cache contents as persisted.
///
/// # Example
/// ```rust
/// use semgate::cache::{CacheSnapshot, SnapshotEntry};
///
/// let snapshot = CacheSnapshot::new(3, vec![SnapshotEntry { key: [7; 32], vector: vec![0.1, 0.2, 0.3] }]);
/// assert_eq!(snapshot.entries.len(), 1);
/// ```
#[derive(Archive, Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct CacheSnapshot {
    pub version: u32,
    /// Dimension every vector in this snapshot has.
    pub dimension: u32,
    pub entries: Vec<SnapshotEntry>,
}

impl CacheSnapshot {
    pub fn new(dimension: usize, entries: Vec<SnapshotEntry>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            dimension: dimension as u32,
            entries,
        }
    }

    /// Encodes the snapshot.
    pub fn to_bytes(&self) -> CacheResult<Vec<u8>> {
        let bytes =
            to_bytes::<RkyvError>(self).map_err(|e| CacheError::Serialization(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    /// Decodes a snapshot from arbitrary (possibly unaligned) bytes.
    pub fn from_slice(bytes: &[u8]) -> CacheResult<Self> {
        let mut aligned = AlignedVec::<16>::with_capacity(bytes.len());
        aligned.extend_from_slice(bytes);
        from_bytes::<CacheSnapshot, RkyvError>(&aligned)
            .map_err(|e| CacheError::Serialization(e.to_string()))
    }

    /// Atomically replaces the file at `path` with this snapshot.
    pub fn write_to(&self, path: &Path) -> CacheResult<()> {
        let bytes = self.to_bytes()?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(&bytes)?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| CacheError::Persist {
            path: path.to_path_buf(),
            source: e.error,
        })?;

        Ok(())
    }

    /// Reads the snapshot at `path`. A missing file is `Ok(None)`.
    pub fn read_from(path: &Path) -> CacheResult<Option<Self>> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Self::from_slice(&bytes).map(Some)
    }
}
