//! Session-scoped persistence for the cart.
//!
//! [`SessionStorage`] is the raw key/value slot store (the equivalent of a
//! browser's session storage). [`CartSessionStore`] owns the JSON encoding of
//! the cart in one named slot and never fails outward: reads degrade to an
//! empty cart and writes are best-effort.

use crate::types::CartLine;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Default slot name for the cart payload
pub const DEFAULT_CART_KEY: &str = "cart";

/// Whether `key` is usable as a slot name by every backend
///
/// Slot names are non-empty and limited to ASCII letters, digits, `-` and `_`.
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Errors raised by session storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying filesystem operation failed
    #[error("Storage I/O failed: {0}")]
    Io(#[from] io::Error),

    /// Writing the value would exceed the backend's byte quota
    #[error("Storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded {
        /// Total bytes the store would hold after the write
        needed: usize,
        /// Configured limit
        quota: usize,
    },

    /// Slot names are restricted to ASCII letters, digits, `-` and `_`
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Payload could not be encoded
    #[error("Failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),

    /// A lock guarding in-memory storage was poisoned
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Named string slots scoped to one session
pub trait SessionStorage: fmt::Debug + Send + Sync {
    /// Read a slot
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read. A missing slot is
    /// `Ok(None)`, not an error.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a slot, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write (quota, I/O).
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a slot; deleting a missing slot succeeds
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process session storage
///
/// Clones share the same slots. An optional byte quota (sum of key and value
/// lengths) makes writes fail the way a full browser store does.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStorage {
    slots: Arc<Mutex<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl MemorySessionStorage {
    /// Creates an empty, unlimited store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that rejects writes beyond `quota` bytes
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            slots: Arc::default(),
            quota: Some(quota),
        }
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let slots = self.slots.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(slots.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().map_err(|_| StorageError::Poisoned)?;

        if let Some(quota) = self.quota {
            let others: usize = slots
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }

        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().map_err(|_| StorageError::Poisoned)?;
        slots.remove(key);
        Ok(())
    }
}

/// Session storage backed by a directory, one `<key>.json` file per slot
///
/// Writes go to a temporary file that is then renamed over the slot, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    dir: PathBuf,
}

impl FileSessionStorage {
    /// Opens (and creates if needed) a session directory
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The session directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        if !is_valid_key(key) {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SessionStorage for FileSessionStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(path) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

/// The cart's view of session storage
///
/// Holds the only encoding of the cart that outlives the process. It has no
/// mutation authority of its own: it writes only when the reducer's persist
/// effect asks it to.
#[derive(Debug, Clone)]
pub struct CartSessionStore {
    storage: Arc<dyn SessionStorage>,
    key: String,
}

impl CartSessionStore {
    /// Wraps `storage`, using `key` as the cart slot
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Wraps `storage` using [`DEFAULT_CART_KEY`]
    #[must_use]
    pub fn with_default_key(storage: Arc<dyn SessionStorage>) -> Self {
        Self::new(storage, DEFAULT_CART_KEY)
    }

    /// The slot this store reads and writes
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the persisted cart
    ///
    /// Returns an empty list when the slot is missing, unreadable, or does
    /// not hold a well-formed cart. Never fails.
    #[must_use]
    pub fn load(&self) -> Vec<CartLine> {
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(error) => {
                tracing::warn!(key = %self.key, %error, "Failed to read cart from session storage");
                return Vec::new();
            },
        };

        match decode(&raw) {
            Ok(items) => {
                tracing::debug!(key = %self.key, lines = items.len(), "Loaded cart from session storage");
                items
            },
            Err(reason) => {
                tracing::warn!(key = %self.key, %reason, "Discarding malformed cart payload");
                Vec::new()
            },
        }
    }

    /// Persist `items`, replacing the previous snapshot
    ///
    /// Best-effort: a failed write is logged and otherwise ignored.
    pub fn save(&self, items: &[CartLine]) {
        match self.try_save(items) {
            Ok(()) => {
                tracing::debug!(key = %self.key, lines = items.len(), "Saved cart to session storage");
            },
            Err(error) => {
                tracing::warn!(key = %self.key, %error, "Failed to save cart to session storage");
            },
        }
    }

    /// Persist `items`, reporting failures
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the backend rejects the write.
    pub fn try_save(&self, items: &[CartLine]) -> Result<(), StorageError> {
        let payload = serde_json::to_string(items)?;
        self.storage.set_item(&self.key, &payload)
    }
}

/// Parse a payload and check the cart invariants
fn decode(raw: &str) -> Result<Vec<CartLine>, String> {
    let items: Vec<CartLine> = serde_json::from_str(raw).map_err(|e| e.to_string())?;

    let mut seen = HashSet::with_capacity(items.len());
    for line in &items {
        if line.count == 0 {
            return Err(format!("line {} has count 0", line.id));
        }
        if !line.price.is_finite() || line.price < 0.0 {
            return Err(format!("line {} has invalid price {}", line.id, line.price));
        }
        if !seen.insert(&line.id) {
            return Err(format!("duplicate line {}", line.id));
        }
    }

    Ok(items)
}
