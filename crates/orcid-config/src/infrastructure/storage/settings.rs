//! TOML settings for the `orcid-config` command-line tool.
//!
//! Read from the platform-appropriate config file:
//! - Windows:  `%APPDATA%\OrcidConfig\config.toml`
//! - Linux:    `~/.config/orcid-config/config.toml`
//! - macOS:    `~/Library/Application Support/OrcidConfig/config.toml`
//!
//! ```toml
//! [accessor]
//! app_name = "orcid"
//! user_id = "alice"
//! log_level = "warn"
//!
//! [host]
//! version = "20.0.3"
//! store_path = "/var/lib/orcid/store.toml"
//! ```
//!
//! Every field has a `#[serde(default = ...)]`, so a missing file, a missing
//! section, or a missing field all fall back to the values below.

use std::path::PathBuf;

use orcid_core::HostVersion;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Settings schema types ─────────────────────────────────────────────────────

/// Top-level settings stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ShimSettings {
    #[serde(default)]
    pub accessor: AccessorSettings,
    #[serde(default)]
    pub host: HostSettings,
}

/// Identity the accessor is bound to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessorSettings {
    /// Application id under which values are stored.
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// The "current user" for user-scope reads and writes.
    #[serde(default)]
    pub user_id: String,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// What the tool pretends the host looks like.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostSettings {
    /// Version reported by the host version provider.
    #[serde(default = "default_host_version")]
    pub version: HostVersion,
    /// Store file.  When absent, `store.toml` beside the settings file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_app_name() -> String {
    "orcid".to_string()
}
fn default_log_level() -> String {
    "warn".to_string()
}
fn default_host_version() -> HostVersion {
    HostVersion::from_parts(20, &[0, 3])
}

impl Default for AccessorSettings {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            user_id: String::new(),
            log_level: default_log_level(),
        }
    }
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            version: default_host_version(),
            store_path: None,
        }
    }
}

// ── Settings repository ───────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the settings file.
///
/// # Errors
///
/// Returns [`SettingsError::NoPlatformConfigDir`] when the platform config
/// base directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, SettingsError> {
    platform_config_dir().ok_or(SettingsError::NoPlatformConfigDir)
}

/// Resolves the full path to the settings file.
pub fn settings_file_path() -> Result<PathBuf, SettingsError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads settings from `path`, returning defaults if the file does not exist.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] for file-system errors other than "not
/// found", and [`SettingsError::Parse`] if the TOML is malformed.
pub fn load_settings_from(path: &std::path::Path) -> Result<ShimSettings, SettingsError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ShimSettings::default()),
        Err(source) => Err(SettingsError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

impl ShimSettings {
    /// The store file to open: the configured path, or `store.toml` next to
    /// `settings_path`.
    pub fn resolve_store_path(&self, settings_path: &std::path::Path) -> PathBuf {
        match &self.host.store_path {
            Some(path) => path.clone(),
            None => settings_path
                .parent()
                .map(|dir| dir.join("store.toml"))
                .unwrap_or_else(|| PathBuf::from("store.toml")),
        }
    }
}

/// Resolves the platform config base directory including the app subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("OrcidConfig"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("orcid-config"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("OrcidConfig")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
