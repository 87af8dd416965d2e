//! Domain entities for the configuration accessor.
//!
//! Nothing in here touches the file system, the host application, or a
//! logger.  Outer layers (the accessor in `orcid-config` and its store
//! adapters) depend on these types; these types depend on nothing.

/// Setting keys, default values, and storage scopes.
pub mod settings;

/// Host version descriptor.
pub mod version;
