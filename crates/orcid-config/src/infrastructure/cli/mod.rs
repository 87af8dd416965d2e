//! Command-line front end: argument definitions, settings resolution and
//! command dispatch for the `orcid-config` binary.
//!
//! `main.rs` only parses arguments, initialises logging and converts the
//! [`Outcome`] into a process exit code; everything else lives here so the
//! command contract can be tested without spawning a process.
//!
//! # Exit status
//!
//! | Outcome               | Status |
//! |-----------------------|--------|
//! | [`Outcome::Done`]     | 0      |
//! | [`Outcome::NotFound`] | 1      |
//! | `Err(_)`              | 1 (reported by `main` through `anyhow`) |

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::application::config_service::{ConfigService, HostConfigStore};
use crate::infrastructure::storage::memory::MemoryConfigStore;
use crate::infrastructure::storage::settings::{
    load_settings_from, settings_file_path, SettingsError, ShimSettings,
};
use crate::infrastructure::storage::toml_store::TomlConfigStore;
use crate::infrastructure::version::StaticVersionProvider;
use orcid_core::{HostVersion, KnownKey};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Read and write ORCID plugin settings.
#[derive(Debug, Parser)]
#[command(name = "orcid-config", about = "ORCID plugin settings accessor", version)]
pub struct Cli {
    /// Settings file.  Defaults to the platform config directory.
    #[arg(long, env = "ORCID_CONFIG")]
    pub config: Option<PathBuf>,

    /// Application id.  Overrides `[accessor] app_name`.
    #[arg(long, env = "ORCID_APP")]
    pub app: Option<String>,

    /// User the `*-user` commands act on.  Overrides `[accessor] user_id`.
    #[arg(long, env = "ORCID_USER")]
    pub user: Option<String>,

    /// Store file.  Overrides `[host] store_path`.
    #[arg(long, env = "ORCID_STORE")]
    pub store: Option<PathBuf>,

    /// Host version, e.g. `20.0.3`.  Overrides `[host] version`.
    #[arg(long, env = "ORCID_HOST_VERSION")]
    pub host_version: Option<HostVersion>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print an application-scope value, falling back to its default.
    GetApp { key: String },
    /// Write an application-scope value.
    SetApp { key: String, value: String },
    /// Remove an application-scope value.
    DeleteApp { key: String },
    /// Print a value stored for the bound user.
    GetUser { key: String },
    /// Write a value for the bound user.
    SetUser { key: String, value: String },
    /// Print a value stored for another user.
    GetForUser { user: String, key: String },
    /// Print the host version.
    CloudVersion {
        /// Print every component (`20.0.3`) instead of the major only.
        #[arg(long)]
        complete: bool,
    },
    /// List known setting keys.
    Keys,
}

/// The accessor as the CLI builds it: store chosen at runtime.
pub type Service = ConfigService<Arc<dyn HostConfigStore>, StaticVersionProvider>;

/// How a successful command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command did what was asked.
    Done,
    /// A read found no value, or a delete found nothing to remove.
    NotFound,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Done => ExitCode::SUCCESS,
            Outcome::NotFound => ExitCode::from(1),
        }
    }
}

// ── Settings resolution ───────────────────────────────────────────────────────

/// Settings the CLI runs with, and where they came from.
#[derive(Debug)]
pub struct LoadedSettings {
    pub settings: ShimSettings,
    /// The settings file consulted, if one could be located.
    pub path: Option<PathBuf>,
    /// Set when the file exists but could not be parsed; `settings` then
    /// holds the defaults.
    pub rejected: Option<SettingsError>,
}

/// Loads the settings file named by `--config`, or the platform default.
///
/// A file that fails to parse does not stop the tool: defaults are used and
/// the parse error is handed back in [`LoadedSettings::rejected`] so the
/// caller can log it once tracing is up.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load_settings(cli: &Cli) -> anyhow::Result<LoadedSettings> {
    let path = match &cli.config {
        Some(path) => Some(path.clone()),
        None => settings_file_path().ok(),
    };
    let Some(path) = path else {
        return Ok(LoadedSettings {
            settings: ShimSettings::default(),
            path: None,
            rejected: None,
        });
    };

    let (settings, rejected) = match load_settings_from(&path) {
        Ok(settings) => (settings, None),
        Err(e @ SettingsError::Parse(_)) => (ShimSettings::default(), Some(e)),
        Err(e) => {
            return Err(e)
                .with_context(|| format!("failed to load settings from {}", path.display()))
        }
    };
    Ok(LoadedSettings {
        settings,
        path: Some(path),
        rejected,
    })
}

/// Resolves CLI overrides against the settings file and opens the store.
///
/// Flags (and their environment variables) win over the file.  The store is
/// `--store`, else the file's `store_path`, else `store.toml` beside the
/// settings file; with no settings location at all, values live in memory.
///
/// # Errors
///
/// Returns an error if the store file exists but cannot be read or parsed.
pub fn build_service(
    cli: &Cli,
    settings: &ShimSettings,
    settings_path: Option<&Path>,
) -> anyhow::Result<Service> {
    let app = cli
        .app
        .clone()
        .unwrap_or_else(|| settings.accessor.app_name.clone());
    let user = cli
        .user
        .clone()
        .unwrap_or_else(|| settings.accessor.user_id.clone());
    let version = cli
        .host_version
        .clone()
        .unwrap_or_else(|| settings.host.version.clone());

    let store_path = cli
        .store
        .clone()
        .or_else(|| settings_path.map(|p| settings.resolve_store_path(p)));

    let store: Arc<dyn HostConfigStore> = match store_path {
        Some(path) => {
            info!("using store file {}", path.display());
            Arc::new(
                TomlConfigStore::open(&path)
                    .with_context(|| format!("failed to open store {}", path.display()))?,
            )
        }
        None => {
            warn!("no config directory and no --store given; values will not be persisted");
            Arc::new(MemoryConfigStore::new())
        }
    };

    Ok(ConfigService::new(
        app,
        user,
        store,
        StaticVersionProvider::new(version),
    ))
}

// ── Command dispatch ──────────────────────────────────────────────────────────

/// Executes `command`, writing values to `out`.
///
/// # Errors
///
/// Returns store and version errors unchanged, write errors on `out`, and an
/// error for user-scope commands when no user is bound.
pub fn run(command: Command, service: &Service, out: &mut impl Write) -> anyhow::Result<Outcome> {
    match command {
        Command::GetApp { key } => print_value(out, service.get_app_value(&key)?),
        Command::SetApp { key, value } => {
            service.set_app_value(&key, &value)?;
            Ok(Outcome::Done)
        }
        Command::DeleteApp { key } => {
            if service.delete_app_value(&key)? {
                Ok(Outcome::Done)
            } else {
                info!("{key} was not set");
                Ok(Outcome::NotFound)
            }
        }
        Command::GetUser { key } => {
            require_user(service)?;
            print_value(out, service.get_user_value(&key)?)
        }
        Command::SetUser { key, value } => {
            require_user(service)?;
            service.set_user_value(&key, &value)?;
            Ok(Outcome::Done)
        }
        Command::GetForUser { user, key } => {
            print_value(out, service.get_value_for_user(&user, &key)?)
        }
        Command::CloudVersion { complete } => {
            writeln!(out, "{}", service.get_cloud_version(complete)?)?;
            Ok(Outcome::Done)
        }
        Command::Keys => {
            for key in KnownKey::ALL {
                let scope = if key.is_user_scoped() { "user" } else { "app" };
                let default = match key.default_value() {
                    Some(v) => format!("{v:?}"),
                    None => "-".to_string(),
                };
                writeln!(
                    out,
                    "{:<12} {:<5} {:<8} {}",
                    key.as_str(),
                    scope,
                    default,
                    key.description()
                )?;
            }
            Ok(Outcome::Done)
        }
    }
}

fn require_user(service: &Service) -> anyhow::Result<()> {
    if service.user_id().is_empty() {
        bail!("no user bound; pass --user or set [accessor] user_id");
    }
    Ok(())
}

fn print_value(out: &mut impl Write, value: Option<String>) -> anyhow::Result<Outcome> {
    match value {
        Some(v) => {
            writeln!(out, "{v}")?;
            Ok(Outcome::Done)
        }
        None => Ok(Outcome::NotFound),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use orcid_core::CloudVersion;
    use uuid::Uuid;

    fn parse(args: &[&str]) -> Cli {
        let argv = std::iter::once("orcid-config").chain(args.iter().copied());
        Cli::try_parse_from(argv).expect("arguments parse")
    }

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("orcid_cli_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn memory_service(user: &str) -> (Arc<MemoryConfigStore>, Service) {
        let memory = Arc::new(MemoryConfigStore::new());
        let store: Arc<dyn HostConfigStore> = memory.clone();
        let versions = StaticVersionProvider::new(HostVersion::from_parts(20, &[0, 3]));
        (memory, ConfigService::new("orcid", user, store, versions))
    }

    fn run_captured(command: Command, service: &Service) -> (anyhow::Result<Outcome>, String) {
        let mut out = Vec::new();
        let result = run(command, service, &mut out);
        (result, String::from_utf8(out).expect("utf-8 output"))
    }

    // ── Output and outcomes ──────────────────────────────────────────────────

    #[test]
    fn test_get_app_prints_default_for_default_bearing_key() {
        // Arrange
        let (_, service) = memory_service("alice");

        // Act
        let (result, out) = run_captured(
            Command::GetApp {
                key: "orcidAppID".to_string(),
            },
            &service,
        );

        // Assert – empty-string default is present, so one empty line
        assert_eq!(result.unwrap(), Outcome::Done);
        assert_eq!(out, "\n");
    }

    #[test]
    fn test_get_app_on_absent_value_prints_nothing_and_reports_not_found() {
        let (_, service) = memory_service("alice");

        let (result, out) = run_captured(
            Command::GetApp {
                key: "configured".to_string(),
            },
            &service,
        );

        assert_eq!(result.unwrap(), Outcome::NotFound);
        assert!(out.is_empty());
    }

    #[test]
    fn test_set_app_then_get_app_prints_value() {
        // Arrange
        let (_, service) = memory_service("alice");
        run_captured(
            Command::SetApp {
                key: "configured".to_string(),
                value: "1".to_string(),
            },
            &service,
        )
        .0
        .unwrap();

        // Act
        let (result, out) = run_captured(
            Command::GetApp {
                key: "configured".to_string(),
            },
            &service,
        );

        // Assert
        assert_eq!(result.unwrap(), Outcome::Done);
        assert_eq!(out, "1\n");
    }

    #[test]
    fn test_delete_app_reports_not_found_for_missing_key() {
        // Arrange
        let (memory, service) = memory_service("alice");
        memory.set_app_value("orcid", "configured", "1").unwrap();

        // Act
        let first = run_captured(
            Command::DeleteApp {
                key: "configured".to_string(),
            },
            &service,
        );
        let second = run_captured(
            Command::DeleteApp {
                key: "configured".to_string(),
            },
            &service,
        );

        // Assert
        assert_eq!(first.0.unwrap(), Outcome::Done);
        assert_eq!(second.0.unwrap(), Outcome::NotFound);
        assert!(memory.is_empty());
    }

    #[test]
    fn test_user_commands_fail_when_no_user_is_bound() {
        // Arrange
        let (memory, service) = memory_service("");

        // Act
        let get = run_captured(
            Command::GetUser {
                key: "user_orcid".to_string(),
            },
            &service,
        );
        let set = run_captured(
            Command::SetUser {
                key: "user_orcid".to_string(),
                value: "0000-0001".to_string(),
            },
            &service,
        );

        // Assert – both refuse, and nothing reaches the store
        let message = get.0.unwrap_err().to_string();
        assert!(message.contains("no user bound"), "got: {message}");
        assert!(set.0.is_err());
        assert!(memory.is_empty());
    }

    #[test]
    fn test_set_user_then_get_user_prints_value_for_bound_user() {
        // Arrange
        let (memory, service) = memory_service("alice");

        // Act
        let set = run_captured(
            Command::SetUser {
                key: "user_orcid".to_string(),
                value: "0000-0001".to_string(),
            },
            &service,
        );
        let (result, out) = run_captured(
            Command::GetUser {
                key: "user_orcid".to_string(),
            },
            &service,
        );

        // Assert
        assert_eq!(set.0.unwrap(), Outcome::Done);
        assert_eq!(result.unwrap(), Outcome::Done);
        assert_eq!(out, "0000-0001\n");
        assert_eq!(
            memory
                .get_user_value("alice", "orcid", "user_orcid")
                .unwrap()
                .as_deref(),
            Some("0000-0001")
        );
    }

    #[test]
    fn test_get_for_user_works_without_bound_user() {
        let (memory, service) = memory_service("");
        memory
            .set_user_value("bob", "orcid", "user_token", "tok")
            .unwrap();

        let (result, out) = run_captured(
            Command::GetForUser {
                user: "bob".to_string(),
                key: "user_token".to_string(),
            },
            &service,
        );

        assert_eq!(result.unwrap(), Outcome::Done);
        assert_eq!(out, "tok\n");
    }

    #[test]
    fn test_cloud_version_prints_major_or_full_version() {
        let (_, service) = memory_service("alice");

        let (_, major) = run_captured(Command::CloudVersion { complete: false }, &service);
        let (_, full) = run_captured(Command::CloudVersion { complete: true }, &service);

        assert_eq!(major, "20\n");
        assert_eq!(full, "20.0.3\n");
    }

    #[test]
    fn test_keys_lists_every_known_key() {
        let (_, service) = memory_service("alice");

        let (result, out) = run_captured(Command::Keys, &service);

        assert_eq!(result.unwrap(), Outcome::Done);
        assert_eq!(out.lines().count(), KnownKey::ALL.len());
        for key in KnownKey::ALL {
            assert!(out.contains(key.as_str()), "missing {key}");
        }
    }

    // ── Settings and overrides ───────────────────────────────────────────────

    #[test]
    fn test_flags_override_settings_file() {
        // Arrange
        let dir = scratch_dir();
        let config = dir.join("config.toml");
        let contents = r#"
[accessor]
app_name = "files"
user_id = "alice"

[host]
version = "28.0.1"
"#;
        std::fs::write(&config, contents).unwrap();
        let config_arg = config.to_string_lossy().into_owned();
        let cli = parse(&[
            "--config",
            &config_arg,
            "--user",
            "bob",
            "--host-version",
            "30.1",
            "keys",
        ]);

        // Act
        let loaded = load_settings(&cli).unwrap();
        let service = build_service(&cli, &loaded.settings, loaded.path.as_deref()).unwrap();

        // Assert – flags win, unflagged fields come from the file
        assert!(loaded.rejected.is_none());
        assert_eq!(service.user_id(), "bob");
        assert_eq!(service.app_name(), "files");
        assert_eq!(service.get_cloud_version(false).unwrap(), CloudVersion::Major(30));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_settings_file_applies_when_no_flags_given() {
        let dir = scratch_dir();
        let config = dir.join("config.toml");
        std::fs::write(&config, "[accessor]\nuser_id = \"alice\"\n").unwrap();
        let config_arg = config.to_string_lossy().into_owned();
        let cli = parse(&["--config", &config_arg, "keys"]);

        let loaded = load_settings(&cli).unwrap();
        let service = build_service(&cli, &loaded.settings, loaded.path.as_deref()).unwrap();

        assert_eq!(service.user_id(), "alice");
        assert_eq!(service.app_name(), "orcid");
        assert_eq!(service.get_cloud_version(true).unwrap().to_string(), "20.0.3");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_store_file_defaults_beside_settings_file() {
        // Arrange
        let dir = scratch_dir();
        let config_arg = dir.join("config.toml").to_string_lossy().into_owned();
        let cli = parse(&["--config", &config_arg, "set-app", "configured", "1"]);
        let loaded = load_settings(&cli).unwrap();
        let service = build_service(&cli, &loaded.settings, loaded.path.as_deref()).unwrap();

        // Act
        let result = run(cli.command.clone(), &service, &mut Vec::<u8>::new());

        // Assert
        assert_eq!(result.unwrap(), Outcome::Done);
        assert!(dir.join("store.toml").exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_store_flag_overrides_settings_store_path() {
        // Arrange
        let dir = scratch_dir();
        let config = dir.join("config.toml");
        let configured = dir.join("configured.toml");
        let flagged = dir.join("flagged.toml");
        std::fs::write(
            &config,
            format!("[host]\nstore_path = {:?}\n", configured.to_string_lossy()),
        )
        .unwrap();
        let config_arg = config.to_string_lossy().into_owned();
        let store_arg = flagged.to_string_lossy().into_owned();
        let cli = parse(&[
            "--config",
            &config_arg,
            "--store",
            &store_arg,
            "set-app",
            "configured",
            "1",
        ]);
        let loaded = load_settings(&cli).unwrap();
        let service = build_service(&cli, &loaded.settings, loaded.path.as_deref()).unwrap();

        // Act
        run(cli.command.clone(), &service, &mut Vec::<u8>::new()).unwrap();

        // Assert
        assert!(flagged.exists());
        assert!(!configured.exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_corrupt_settings_file_falls_back_to_defaults() {
        // Arrange
        let dir = scratch_dir();
        let config = dir.join("config.toml");
        std::fs::write(&config, "[[[ not valid toml").unwrap();
        let config_arg = config.to_string_lossy().into_owned();
        let cli = parse(&["--config", &config_arg, "--user", "alice", "keys"]);

        // Act
        let loaded = load_settings(&cli).unwrap();
        let service = build_service(&cli, &loaded.settings, loaded.path.as_deref());

        // Assert – defaults are used and the parse error is kept for logging
        assert_eq!(loaded.settings, ShimSettings::default());
        assert!(matches!(loaded.rejected, Some(SettingsError::Parse(_))));
        assert_eq!(service.unwrap().user_id(), "alice");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unreadable_settings_path_is_an_error() {
        // A directory where the file should be cannot be read as text.
        let dir = scratch_dir();
        let config_arg = dir.to_string_lossy().into_owned();
        let cli = parse(&["--config", &config_arg, "keys"]);

        let result = load_settings(&cli);

        assert!(result.is_err());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_host_version_flag_is_rejected_by_parser() {
        let result = Cli::try_parse_from(["orcid-config", "--host-version", "twenty", "keys"]);
        assert!(result.is_err());
    }
}
