//! In-memory host configuration store.
//!
//! Holds every value in a `HashMap` keyed by `(app_id, Scope, key)`.  Nothing
//! is persisted.  Used by unit and integration tests, and by the CLI when no
//! store file is configured.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use orcid_core::Scope;
use tracing::debug;

use crate::application::config_service::{HostConfigStore, StoreError};

type Slot = (String, Scope, String);

/// A [`HostConfigStore`] backed by a mutex-guarded `HashMap`.
#[derive(Default)]
pub struct MemoryConfigStore {
    values: Mutex<HashMap<Slot, String>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates an application-scope value.
    pub fn with_app_value(mut self, app_id: &str, key: &str, value: &str) -> Self {
        self.values_mut()
            .insert(slot(app_id, Scope::App, key), value.to_string());
        self
    }

    /// Pre-populates a user-scope value.
    pub fn with_user_value(mut self, user_id: &str, app_id: &str, key: &str, value: &str) -> Self {
        self.values_mut()
            .insert(slot(app_id, Scope::user(user_id), key), value.to_string());
        self
    }

    /// Number of stored values across all applications and scopes.
    ///
    /// Counts what is in the map even after a writer panicked.
    pub fn len(&self) -> usize {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Exclusive access needs no lock; a poisoned map is still seeded.
    fn values_mut(&mut self) -> &mut HashMap<Slot, String> {
        self.values.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Slot, String>>, StoreError> {
        self.values.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn slot(app_id: &str, scope: Scope, key: &str) -> Slot {
    (app_id.to_string(), scope, key.to_string())
}

impl HostConfigStore for MemoryConfigStore {
    fn get_app_value(
        &self,
        app_id: &str,
        key: &str,
        default: Option<&str>,
    ) -> Result<Option<String>, StoreError> {
        let values = self.lock()?;
        let stored = values.get(&slot(app_id, Scope::App, key)).cloned();
        debug!("memory store: get app {app_id}/{key} (hit: {})", stored.is_some());
        Ok(stored.or_else(|| default.map(str::to_owned)))
    }

    fn set_app_value(&self, app_id: &str, key: &str, value: &str) -> Result<(), StoreError> {
        debug!("memory store: set app {app_id}/{key}");
        self.lock()?
            .insert(slot(app_id, Scope::App, key), value.to_string());
        Ok(())
    }

    fn delete_app_value(&self, app_id: &str, key: &str) -> Result<bool, StoreError> {
        let removed = self.lock()?.remove(&slot(app_id, Scope::App, key)).is_some();
        debug!("memory store: delete app {app_id}/{key} (removed: {removed})");
        Ok(removed)
    }

    fn get_user_value(
        &self,
        user_id: &str,
        app_id: &str,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        debug!("memory store: get user {user_id} {app_id}/{key}");
        Ok(self
            .lock()?
            .get(&slot(app_id, Scope::user(user_id), key))
            .cloned())
    }

    fn set_user_value(
        &self,
        user_id: &str,
        app_id: &str,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        debug!("memory store: set user {user_id} {app_id}/{key}");
        self.lock()?
            .insert(slot(app_id, Scope::user(user_id), key), value.to_string());
        Ok(())
    }
}
