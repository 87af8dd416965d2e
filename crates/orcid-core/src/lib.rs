//! # orcid-core
//!
//! Shared vocabulary for the ORCID plugin's configuration accessor.
//!
//! The plugin stores a handful of string settings in the host application's
//! key/value configuration store, some shared by every user of the plugin and
//! some private to a single user.  This crate names those settings, holds the
//! fallback values used when an application-wide setting has never been
//! written, and models the host's version descriptor.
//!
//! It has no I/O and no dependency on any particular host store.
//!
//! - **`domain::settings`** – Setting keys, the default table, and [`Scope`].
//! - **`domain::version`** – [`HostVersion`] and the [`CloudVersion`] view of it.

pub mod domain;

pub use domain::settings::{
    default_for, is_default_bearing, KnownKey, Scope, DEFAULTS, KEY_CONFIGURED, ORCID_CLIENT_APPID,
    ORCID_CLIENT_SECRET, ORCID_USER_ORCID, ORCID_USER_TOKEN,
};
pub use domain::version::{CloudVersion, HostVersion, VersionError};
