//! Host application version descriptor.
//!
//! The host reports its version as an ordered list of integer components,
//! e.g. `[20, 0, 3]`.  Callers usually want either the major component alone
//! (to branch on API differences between host releases) or the full dotted
//! string (for display and diagnostics).  [`CloudVersion`] carries whichever
//! of the two was asked for.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for building a [`HostVersion`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionError {
    /// The host reported no version components at all.
    #[error("host version has no components")]
    Empty,

    /// A dotted version string contained a non-numeric component.
    #[error("invalid version component {0:?}")]
    InvalidComponent(String),
}

/// A non-empty ordered sequence of version components.
///
/// Serialises to and from the dotted string form so it can sit in a TOML
/// settings file as `version = "20.0.3"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HostVersion(Vec<u32>);

impl HostVersion {
    /// Builds a version from its components.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::Empty`] if `components` is empty.
    pub fn new(components: Vec<u32>) -> Result<Self, VersionError> {
        if components.is_empty() {
            return Err(VersionError::Empty);
        }
        Ok(Self(components))
    }

    /// Builds a version from a major component plus any further components.
    /// Infallible, since the major component is always present.
    pub fn from_parts(major: u32, rest: &[u32]) -> Self {
        let mut components = Vec::with_capacity(rest.len() + 1);
        components.push(major);
        components.extend_from_slice(rest);
        Self(components)
    }

    /// The first (major) component.
    pub fn major(&self) -> u32 {
        // Non-empty by construction.
        self.0[0]
    }

    pub fn components(&self) -> &[u32] {
        &self.0
    }

    /// Returns the major component, or the full dotted string when `complete`.
    pub fn cloud_version(&self, complete: bool) -> CloudVersion {
        if complete {
            CloudVersion::Full(self.to_string())
        } else {
            CloudVersion::Major(self.major())
        }
    }
}

impl fmt::Display for HostVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(".");
        f.write_str(&joined)
    }
}

impl FromStr for HostVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(VersionError::Empty);
        }
        let components = trimmed
            .split('.')
            .map(|part| {
                part.parse::<u32>()
                    .map_err(|_| VersionError::InvalidComponent(part.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(components)
    }
}

impl TryFrom<String> for HostVersion {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HostVersion> for String {
    fn from(value: HostVersion) -> Self {
        value.to_string()
    }
}

/// The answer to "which host version is this?".
///
/// `Major` is an integer, `Full` is the dotted string.  `Display` renders
/// either form as it would be shown to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloudVersion {
    Major(u32),
    Full(String),
}

impl fmt::Display for CloudVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloudVersion::Major(major) => write!(f, "{major}"),
            CloudVersion::Full(full) => f.write_str(full),
        }
    }
}
