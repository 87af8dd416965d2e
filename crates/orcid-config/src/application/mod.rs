//! Application layer for the ORCID plugin settings.
//!
//! Code here depends on traits ([`config_service::HostConfigStore`],
//! [`config_service::VersionProvider`]) rather than on any concrete store, so
//! the same accessor runs against the in-memory store in tests and the
//! TOML-backed store in the CLI.
//!
//! - **`config_service`** – The configuration accessor: app-scope and
//!   user-scope get/set/delete with default substitution, plus the host
//!   version query.

pub mod config_service;
