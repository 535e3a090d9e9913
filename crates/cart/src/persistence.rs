//! Durable round-trip of the cart collection.
//!
//! The storage layer is strictly downstream of the in-memory store: it is
//! written after every mutation and read exactly once at session startup.
//! A failed write never rolls back in-memory state, and a missing or
//! corrupt record loads as an empty collection. The only observable trace
//! of a storage failure is a log entry.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::PersistenceError;
use crate::line_item::LineItem;

/// Version of the persisted cart record. Unknown versions load as empty,
/// the same tolerance applied to corrupt data.
const RECORD_VERSION: u32 = 1;

/// The persisted on-disk shape: a versioned envelope around the ordered
/// line-item list.
#[derive(Debug, Serialize, Deserialize)]
struct CartRecord {
    version: u32,
    items: Vec<LineItem>,
}

/// Durable storage for the cart collection.
///
/// `load` is infallible by design: any failure to produce a previously
/// saved collection degrades to empty. `save` reports its error so the
/// caller can log it, but callers must not treat a failed save as a failed
/// mutation.
pub trait CartStorage: Send {
    /// Read the persisted collection, or an empty one if there is nothing
    /// readable.
    fn load(&self) -> Vec<LineItem>;

    /// Persist the full collection. Last write wins.
    fn save(&mut self, items: &[LineItem]) -> Result<(), PersistenceError>;
}

/// Single-file JSON storage at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStorage for JsonFileStorage {
    fn load(&self) -> Vec<LineItem> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "cart file unreadable, starting empty");
                return Vec::new();
            }
        };
        match serde_json::from_slice::<CartRecord>(&bytes) {
            Ok(record) if record.version == RECORD_VERSION => record.items,
            Ok(record) => {
                warn!(
                    path = %self.path.display(),
                    version = record.version,
                    "unknown cart record version, starting empty"
                );
                Vec::new()
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "cart file corrupt, starting empty");
                Vec::new()
            }
        }
    }

    fn save(&mut self, items: &[LineItem]) -> Result<(), PersistenceError> {
        let record = CartRecord {
            version: RECORD_VERSION,
            items: items.to_vec(),
        };
        let bytes = serde_json::to_vec(&record)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}

/// In-memory storage for tests and sessions that do not persist.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Vec<LineItem>,
}

impl MemoryStorage {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Seed the storage with a pre-existing collection.
    #[must_use]
    pub const fn with_items(items: Vec<LineItem>) -> Self {
        Self { items }
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self) -> Vec<LineItem> {
        self.items.clone()
    }

    fn save(&mut self, items: &[LineItem]) -> Result<(), PersistenceError> {
        self.items = items.to_vec();
        Ok(())
    }
}
