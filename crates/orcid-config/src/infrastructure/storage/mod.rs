//! Storage infrastructure: host configuration stores and the CLI settings file.
//!
//! - `memory` – [`memory::MemoryConfigStore`], a process-local store for
//!   tests and throwaway sessions.
//! - `toml_store` – [`toml_store::TomlConfigStore`], a store persisted to a
//!   single TOML document and rewritten on every change.
//! - `settings` – The `config.toml` that tells the CLI which application id,
//!   user, host version and store file to use.

pub mod memory;
pub mod settings;
pub mod toml_store;
