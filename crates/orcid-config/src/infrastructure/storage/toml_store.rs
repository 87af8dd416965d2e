//! File-backed host configuration store.
//!
//! All values live in one TOML document.  Application-scope values sit under
//! `[app.<app_id>]`, user-scope values under `[user.<user_id>.<app_id>]`:
//!
//! ```toml
//! [app.orcid]
//! configured = "1"
//! orcidAppID = "APP-0123456789"
//!
//! [user.alice.orcid]
//! user_orcid = "0000-0002-1825-0097"
//! ```
//!
//! The file is the only copy of the data.  Every read parses it afresh, and
//! every write re-reads it, applies the change, writes a sibling temp file and
//! renames that over the original, so several stores (or processes) pointed
//! at one path see each other's writes and a reader never observes a
//! half-written file.  Writes from separate processes are not locked against
//! each other; the last rename wins for a key changed by both.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::config_service::{HostConfigStore, StoreError};

type KeyValues = BTreeMap<String, String>;

/// On-disk layout of the store file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct StoreDocument {
    /// app id → key → value
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    app: BTreeMap<String, KeyValues>,
    /// user id → app id → key → value
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    user: BTreeMap<String, BTreeMap<String, KeyValues>>,
}

/// A [`HostConfigStore`] persisted to a TOML file.
pub struct TomlConfigStore {
    path: PathBuf,
    /// Serialises read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl TomlConfigStore {
    /// Opens the store at `path`, treating a missing file as an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] for file-system errors other than "not
    /// found", and [`StoreError::Format`] if the TOML is malformed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self {
            path: path.into(),
            lock: Mutex::new(()),
        };
        store.load()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, StoreError> {
        self.lock.lock().map_err(|_| StoreError::Poisoned)
    }

    fn load(&self) -> Result<StoreDocument, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => toml::from_str(&content).map_err(|e| StoreError::Format {
                path: self.path.clone(),
                source: Box::new(e),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("store file {} not found; reading as empty", self.path.display());
                Ok(StoreDocument::default())
            }
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Re-reads the file, applies `change`, and writes the result back if
    /// anything changed.  Returns whatever `change` returned.
    fn update<R>(&self, change: impl FnOnce(&mut StoreDocument) -> R) -> Result<R, StoreError> {
        let _guard = self.lock()?;
        let current = self.load()?;
        let mut next = current.clone();
        let result = change(&mut next);
        if next != current {
            self.persist(&next)?;
        }
        Ok(result)
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store.toml".to_string());
        self.path.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
    }

    fn persist(&self, document: &StoreDocument) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| StoreError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let content = toml::to_string_pretty(document).map_err(|e| StoreError::Format {
            path: self.path.clone(),
            source: Box::new(e),
        })?;

        let tmp = self.temp_path();
        std::fs::write(&tmp, content).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        if let Err(source) = std::fs::rename(&tmp, &self.path) {
            std::fs::remove_file(&tmp).ok();
            return Err(StoreError::Io {
                path: self.path.clone(),
                source,
            });
        }
        debug!("store file {} written", self.path.display());
        Ok(())
    }
}

impl HostConfigStore for TomlConfigStore {
    fn get_app_value(
        &self,
        app_id: &str,
        key: &str,
        default: Option<&str>,
    ) -> Result<Option<String>, StoreError> {
        let _guard = self.lock()?;
        let document = self.load()?;
        let stored = document.app.get(app_id).and_then(|kv| kv.get(key)).cloned();
        Ok(stored.or_else(|| default.map(str::to_owned)))
    }

    fn set_app_value(&self, app_id: &str, key: &str, value: &str) -> Result<(), StoreError> {
        debug!("toml store: set app {app_id}/{key}");
        self.update(|doc| {
            doc.app
                .entry(app_id.to_string())
                .or_default()
                .insert(key.to_string(), value.to_string());
        })
    }

    fn delete_app_value(&self, app_id: &str, key: &str) -> Result<bool, StoreError> {
        debug!("toml store: delete app {app_id}/{key}");
        self.update(|doc| {
            let Some(kv) = doc.app.get_mut(app_id) else {
                return false;
            };
            let removed = kv.remove(key).is_some();
            if kv.is_empty() {
                doc.app.remove(app_id);
            }
            removed
        })
    }

    fn get_user_value(
        &self,
        user_id: &str,
        app_id: &str,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        let _guard = self.lock()?;
        let document = self.load()?;
        Ok(document
            .user
            .get(user_id)
            .and_then(|apps| apps.get(app_id))
            .and_then(|kv| kv.get(key))
            .cloned())
    }

    fn set_user_value(
        &self,
        user_id: &str,
        app_id: &str,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        debug!("toml store: set user {user_id} {app_id}/{key}");
        self.update(|doc| {
            doc.user
                .entry(user_id.to_string())
                .or_default()
                .entry(app_id.to_string())
                .or_default()
                .insert(key.to_string(), value.to_string());
        })
    }
}
