//! ConfigService: the plugin's view of the host configuration store.
//!
//! Every operation is a single delegated call.  The service resolves *where*
//! a value lives (application scope, the bound user, or an explicitly named
//! user) and, for application-scope reads only, which default applies.  It
//! then hands the call to the [`HostConfigStore`] and returns whatever the
//! store returns, errors included.
//!
//! ```text
//! get_app_value(key)            ──► store.get_app_value(app, key, default_for(key))
//! set_app_value(key, v)         ──► store.set_app_value(app, key, v)
//! delete_app_value(key)         ──► store.delete_app_value(app, key)
//! get_user_value(key)           ──► store.get_user_value(bound_user, app, key)
//! set_user_value(key, v)        ──► store.set_user_value(bound_user, app, key, v)
//! get_value_for_user(user, key) ──► store.get_user_value(user, app, key)
//! get_cloud_version(complete)   ──► versions.version()
//! ```
//!
//! # Absent versus empty
//!
//! Reads return `Option<String>`.  `None` means the key was never written and
//! has no default; `Some("")` means it was written as (or defaults to) the
//! empty string.  Callers rely on telling these apart.

use std::path::PathBuf;
use std::sync::Arc;

use orcid_core::{default_for, CloudVersion, HostVersion, VersionError};
use thiserror::Error;

/// Error type reported by host configuration stores.
///
/// Variants name the kind of failure, not the backend that produced it, so
/// any store (file, database, host API) can report through the same type.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing store at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Persisted content could not be decoded, or values could not be encoded.
    #[error("malformed store content at {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A previous writer panicked while holding the store lock.
    #[error("store lock poisoned")]
    Poisoned,

    /// Failure reported by a host backend that has no finer-grained variant,
    /// e.g. an unavailable database or a permission check.
    #[error("host store error: {0}")]
    Backend(String),
}

/// The host application's key/value configuration API.
///
/// Values are addressed by application id plus key, and optionally a user
/// id.  Implementations decide persistence and concurrency; the accessor
/// adds neither.
pub trait HostConfigStore: Send + Sync {
    /// Returns the application-scope value for `key`, or `default` when the
    /// key has never been written.
    fn get_app_value(
        &self,
        app_id: &str,
        key: &str,
        default: Option<&str>,
    ) -> Result<Option<String>, StoreError>;

    /// Writes an application-scope value, replacing any previous one.
    fn set_app_value(&self, app_id: &str, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes an application-scope value.  Returns `true` if a value existed.
    fn delete_app_value(&self, app_id: &str, key: &str) -> Result<bool, StoreError>;

    /// Returns the value for `key` stored for `user_id`.
    fn get_user_value(
        &self,
        user_id: &str,
        app_id: &str,
        key: &str,
    ) -> Result<Option<String>, StoreError>;

    /// Writes a value for `user_id`, replacing any previous one.
    fn set_user_value(
        &self,
        user_id: &str,
        app_id: &str,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError>;
}

/// Reports the running host application's version.
#[cfg_attr(test, mockall::automock)]
pub trait VersionProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns [`VersionError`] if the host cannot describe its version.
    fn version(&self) -> Result<HostVersion, VersionError>;
}

impl<T: HostConfigStore + ?Sized> HostConfigStore for Arc<T> {
    fn get_app_value(
        &self,
        app_id: &str,
        key: &str,
        default: Option<&str>,
    ) -> Result<Option<String>, StoreError> {
        (**self).get_app_value(app_id, key, default)
    }

    fn set_app_value(&self, app_id: &str, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_app_value(app_id, key, value)
    }

    fn delete_app_value(&self, app_id: &str, key: &str) -> Result<bool, StoreError> {
        (**self).delete_app_value(app_id, key)
    }

    fn get_user_value(
        &self,
        user_id: &str,
        app_id: &str,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        (**self).get_user_value(user_id, app_id, key)
    }

    fn set_user_value(
        &self,
        user_id: &str,
        app_id: &str,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        (**self).set_user_value(user_id, app_id, key, value)
    }
}

impl<T: VersionProvider + ?Sized> VersionProvider for Arc<T> {
    fn version(&self) -> Result<HostVersion, VersionError> {
        (**self).version()
    }
}

/// Settings accessor bound to one application id and one current user.
///
/// Build one per request or session.  Nothing inside changes after
/// construction.
pub struct ConfigService<S, V> {
    app_name: String,
    user_id: String,
    store: S,
    versions: V,
}

impl<S: HostConfigStore, V: VersionProvider> ConfigService<S, V> {
    pub fn new(
        app_name: impl Into<String>,
        user_id: impl Into<String>,
        store: S,
        versions: V,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            user_id: user_id.into(),
            store,
            versions,
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// The user identity that `get_user_value` / `set_user_value` act on.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Reads an application-scope value, falling back to the key's default.
    ///
    /// Keys outside the default table fall back to `None`.
    pub fn get_app_value(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.store.get_app_value(&self.app_name, key, default_for(key))
    }

    pub fn set_app_value(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.store.set_app_value(&self.app_name, key, value)
    }

    /// Removes an application-scope value and returns the store's status.
    pub fn delete_app_value(&self, key: &str) -> Result<bool, StoreError> {
        self.store.delete_app_value(&self.app_name, key)
    }

    /// Reads a value for the bound user.  No default substitution.
    pub fn get_user_value(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.store.get_user_value(&self.user_id, &self.app_name, key)
    }

    pub fn set_user_value(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.store.set_user_value(&self.user_id, &self.app_name, key, value)
    }

    /// Reads a value for an arbitrary user, not necessarily the bound one.
    pub fn get_value_for_user(
        &self,
        user_id: &str,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        self.store.get_user_value(user_id, &self.app_name, key)
    }

    /// Returns the host's major version, or the full dotted version when
    /// `complete` is `true`.
    ///
    /// # Errors
    ///
    /// Returns the provider's [`VersionError`] unchanged.
    pub fn get_cloud_version(&self, complete: bool) -> Result<CloudVersion, VersionError> {
        Ok(self.versions.version()?.cloud_version(complete))
    }
}
