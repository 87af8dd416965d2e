//! Infrastructure layer for the settings accessor.
//!
//! Contains the concrete collaborators the accessor talks to: host stores,
//! the version provider, the on-disk settings, and the command-line front end
//! that wires them together.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `orcid_core`, but MUST NOT be imported by the `application` layer.

pub mod cli;
pub mod storage;
pub mod version;
