//! Configuration for the cart.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::catalog::DEFAULT_PAGE_SIZE;
use crate::session::{
    CartSessionStore, DEFAULT_CART_KEY, FileSessionStorage, MemorySessionStorage, SessionStorage,
    StorageError, is_valid_key,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

/// Cart configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Session slot holding the cart (`STOREFRONT_CART_KEY`, default `cart`);
    /// ASCII letters, digits, `-` and `_` only
    pub cart_key: String,
    /// Directory for file-backed session storage (`STOREFRONT_SESSION_DIR`);
    /// unset means in-memory storage
    pub session_dir: Option<PathBuf>,
    /// Products per catalog page (`STOREFRONT_PAGE_SIZE`, default 6)
    pub page_size: usize,
    /// Byte limit for in-memory storage (`STOREFRONT_STORAGE_QUOTA`)
    pub storage_quota: Option<usize>,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            cart_key: DEFAULT_CART_KEY.to_string(),
            session_dir: None,
            page_size: DEFAULT_PAGE_SIZE,
            storage_quota: None,
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Unparseable values, and cart keys no backend can store, fall back to
    /// their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            cart_key: lookup("STOREFRONT_CART_KEY")
                .filter(|key| {
                    let valid = is_valid_key(key);
                    if !valid {
                        tracing::warn!(key = %key, "Ignoring invalid STOREFRONT_CART_KEY");
                    }
                    valid
                })
                .unwrap_or(defaults.cart_key),
            session_dir: lookup("STOREFRONT_SESSION_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            page_size: lookup("STOREFRONT_PAGE_SIZE")
                .and_then(|s| s.parse::<usize>().ok())
                .filter(|&size| size > 0)
                .unwrap_or(defaults.page_size),
            storage_quota: lookup("STOREFRONT_STORAGE_QUOTA").and_then(|s| s.parse().ok()),
        }
    }

    /// Open the session storage backend this configuration names
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the session directory cannot be created.
    pub fn open_storage(&self) -> Result<Arc<dyn SessionStorage>, StorageError> {
        match (&self.session_dir, self.storage_quota) {
            (Some(dir), _) => {
                tracing::info!(dir = %dir.display(), "Using file session storage");
                Ok(Arc::new(FileSessionStorage::open(dir.clone())?))
            },
            (None, Some(quota)) => {
                tracing::info!(quota, "Using in-memory session storage with quota");
                Ok(Arc::new(MemorySessionStorage::with_quota(quota)))
            },
            (None, None) => {
                tracing::info!("Using in-memory session storage");
                Ok(Arc::new(MemorySessionStorage::new()))
            },
        }
    }

    /// Open the configured backend wrapped as the cart's session store
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] if `cart_key` is not a valid slot
    /// name, or any error from [`CartConfig::open_storage`].
    pub fn open_session(&self) -> Result<CartSessionStore, StorageError> {
        if !is_valid_key(&self.cart_key) {
            return Err(StorageError::InvalidKey(self.cart_key.clone()));
        }
        Ok(CartSessionStore::new(self.open_storage()?, self.cart_key.clone()))
    }
}
