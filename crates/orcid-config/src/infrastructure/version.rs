//! Host version providers.

use orcid_core::{HostVersion, VersionError};

use crate::application::config_service::VersionProvider;

/// Reports a fixed version, taken from the settings file or the command line.
#[derive(Debug, Clone)]
pub struct StaticVersionProvider {
    version: HostVersion,
}

impl StaticVersionProvider {
    pub fn new(version: HostVersion) -> Self {
        Self { version }
    }
}

impl VersionProvider for StaticVersionProvider {
    fn version(&self) -> Result<HostVersion, VersionError> {
        Ok(self.version.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_provider_returns_configured_version() {
        let provider = StaticVersionProvider::new(HostVersion::from_parts(20, &[0, 3]));
        assert_eq!(provider.version().unwrap().components(), &[20, 0, 3]);
    }

    #[test]
    fn test_static_provider_is_stable_across_calls() {
        let provider = StaticVersionProvider::new(HostVersion::from_parts(27, &[1]));
        assert_eq!(provider.version(), provider.version());
    }
}
