//! `orcid-config` — read and write the ORCID plugin's settings from a shell.
//!
//! Wraps a [`ConfigService`] bound to one application id and one user, backed
//! by the TOML store file, so administrators can inspect or seed values
//! without going through the host application.
//!
//! # Usage
//!
//! ```text
//! orcid-config [OPTIONS] <COMMAND>
//!
//! Commands:
//!   get-app       KEY          Print an application-scope value (default applied)
//!   set-app       KEY VALUE    Write an application-scope value
//!   delete-app    KEY          Remove an application-scope value
//!   get-user      KEY          Print a value for the bound user
//!   set-user      KEY VALUE    Write a value for the bound user
//!   get-for-user  USER KEY     Print a value for another user
//!   cloud-version [--complete] Print the host major version (or full version)
//!   keys                       List the known setting keys and their defaults
//! ```
//!
//! Values go to stdout; logs go to stderr.  A read that finds no value (and no
//! default) prints nothing and exits with status 1.  A settings file that does
//! not parse is reported with a warning and ignored.
//!
//! # Environment variable overrides
//!
//! | Variable             | Description                         |
//! |----------------------|-------------------------------------|
//! | `ORCID_APP`          | Application id                      |
//! | `ORCID_USER`         | Bound user                          |
//! | `ORCID_STORE`        | Store file path                     |
//! | `ORCID_HOST_VERSION` | Host version reported by the tool   |
//! | `ORCID_CONFIG`       | Settings file path                  |

use std::process::ExitCode;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use orcid_config::infrastructure::cli::{build_service, load_settings, run, Cli};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let loaded = load_settings(&cli)?;

    // Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&loaded.settings.accessor.log_level)),
        )
        .init();

    if let (Some(e), Some(path)) = (&loaded.rejected, &loaded.path) {
        warn!("ignoring settings file {}: {e}; using defaults", path.display());
    }

    let service = build_service(&cli, &loaded.settings, loaded.path.as_deref())?;
    info!(
        "accessor bound to app {} as user {:?}",
        service.app_name(),
        service.user_id()
    );

    let outcome = run(cli.command, &service, &mut std::io::stdout().lock())?;
    Ok(outcome.into())
}
