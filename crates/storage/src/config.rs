// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The Config Facade: typed reads/writes against the external key-value
//! configuration store using hierarchical, slash-separated key paths.
//!
//! The real store is an external collaborator (§6 of the deployment
//! pipeline's configuration key layout); this crate owns only the facade
//! contract and a JSON-file-backed implementation suitable for a
//! single-device daemon process.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("key not found: {0}")]
    NotFound(String),

    #[error("i/o error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("malformed config store: {0}")]
    Corrupt(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// A callback invoked when a key under a subscribed prefix changes.
pub type Subscriber = Box<dyn Fn(&str, Option<&Value>) + Send + Sync>;

/// Typed reads/writes/deletes against the hierarchical config store, plus a
/// change-subscription mechanism the dependency resolver and executor use to
/// react to deployment-state writes.
pub trait ConfigFacade: Send + Sync {
    fn read(&self, key: &str) -> ConfigResult<Option<Value>>;
    fn write(&self, key: &str, value: Value) -> ConfigResult<()>;
    fn delete(&self, key: &str) -> ConfigResult<()>;

    /// Delete `key` itself and every key nested under it (`<key>/...`), as
    /// stale cleanup does to a removed component's whole `services.<name>`
    /// subtree.
    fn delete_prefix(&self, key: &str) -> ConfigResult<()>;

    /// Register a subscriber invoked (with the full key and new value, or
    /// `None` on delete) whenever a write or delete touches a key prefixed
    /// by `prefix`.
    fn subscribe(&self, prefix: &str, subscriber: Subscriber);

    fn read_string(&self, key: &str) -> ConfigResult<Option<String>> {
        Ok(self.read(key)?.and_then(|v| v.as_str().map(str::to_string)))
    }
}

/// Typed read/write helpers layered over [`ConfigFacade`].
///
/// These are generic methods, which would make `ConfigFacade` itself
/// object-unsafe (blocking `Arc<dyn ConfigFacade>`) if declared directly on
/// it, so they live in a separate blanket-implemented extension trait
/// instead — the same split `byteorder::ReadBytesExt` uses over `dyn Read`.
pub trait ConfigFacadeExt: ConfigFacade {
    fn read_typed<T: serde::de::DeserializeOwned>(&self, key: &str) -> ConfigResult<Option<T>> {
        match self.read(key)? {
            Some(v) => serde_json::from_value(v)
                .map(Some)
                .map_err(|e| ConfigError::Corrupt(format!("{key}: {e}"))),
            None => Ok(None),
        }
    }

    fn write_typed<T: serde::Serialize>(&self, key: &str, value: &T) -> ConfigResult<()> {
        let v = serde_json::to_value(value).map_err(|e| ConfigError::Corrupt(e.to_string()))?;
        self.write(key, v)
    }
}

impl<C: ConfigFacade + ?Sized> ConfigFacadeExt for C {}

/// A JSON-file-backed [`ConfigFacade`].
///
/// The whole tree is held in memory under a single lock and flushed to disk
/// on every write/delete via a write-to-temp-then-rename sequence, so a
/// crash mid-write never leaves a torn file on disk.
pub struct JsonConfigStore {
    path: PathBuf,
    tree: RwLock<BTreeMap<String, Value>>,
    subscribers: RwLock<Vec<(String, Subscriber)>>,
}

impl JsonConfigStore {
    /// Open (or create) the config store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        let path = path.into();
        let tree = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| ConfigError::Corrupt(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(ConfigError::Io { path: path.clone(), source: e }),
        };
        Ok(Self { path, tree: RwLock::new(tree), subscribers: RwLock::new(Vec::new()) })
    }

    fn flush(&self, tree: &BTreeMap<String, Value>) -> ConfigResult<()> {
        let tmp_path = tmp_path_for(&self.path);
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io { path: parent.to_path_buf(), source: e })?;
        }
        let bytes = serde_json::to_vec_pretty(tree).map_err(|e| ConfigError::Corrupt(e.to_string()))?;
        fs::write(&tmp_path, &bytes).map_err(|e| ConfigError::Io { path: tmp_path.clone(), source: e })?;
        fs::rename(&tmp_path, &self.path).map_err(|e| ConfigError::Io { path: self.path.clone(), source: e })?;
        Ok(())
    }

    fn notify(&self, key: &str, value: Option<&Value>) {
        for (prefix, subscriber) in self.subscribers.read().iter() {
            if key.starts_with(prefix.as_str()) {
                subscriber(key, value);
            }
        }
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

impl ConfigFacade for JsonConfigStore {
    fn read(&self, key: &str) -> ConfigResult<Option<Value>> {
        debug!(key, "config read");
        Ok(self.tree.read().get(key).cloned())
    }

    fn write(&self, key: &str, value: Value) -> ConfigResult<()> {
        let mut tree = self.tree.write();
        tree.insert(key.to_string(), value.clone());
        self.flush(&tree)?;
        drop(tree);
        self.notify(key, Some(&value));
        Ok(())
    }

    fn delete(&self, key: &str) -> ConfigResult<()> {
        let mut tree = self.tree.write();
        tree.remove(key);
        self.flush(&tree)?;
        drop(tree);
        self.notify(key, None);
        Ok(())
    }

    fn delete_prefix(&self, key: &str) -> ConfigResult<()> {
        let nested = format!("{key}/");
        let mut tree = self.tree.write();
        tree.retain(|k, _| k != key && !k.starts_with(&nested));
        self.flush(&tree)?;
        drop(tree);
        self.notify(key, None);
        Ok(())
    }

    fn subscribe(&self, prefix: &str, subscriber: Subscriber) {
        self.subscribers.write().push((prefix.to_string(), subscriber));
    }
}

/// A shared handle to a [`ConfigFacade`], convenient for passing into the
/// several subsystems (resolver, bootstrap manager, stale cleanup) that all
/// need read/write access to the same store.
pub type SharedConfig = Arc<dyn ConfigFacade>;

pub(crate) fn warn_on_corrupt(key: &str, err: &ConfigError) {
    warn!(key, error = %err, "ignoring malformed persisted value");
}

impl From<ConfigError> for ecd_core::CoreError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotFound(key) => ecd_core::CoreError::not_found(key),
            other => ecd_core::CoreError::failure(other.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
