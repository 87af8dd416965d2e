//! Setting keys and the application-scope default table.
//!
//! Keys are plain strings as far as the accessor is concerned: any `&str` can
//! be read or written, and unknown keys are never rejected.  The constants
//! below only name the keys the plugin itself uses.
//!
//! # Defaults
//!
//! [`DEFAULTS`] is consulted for application-scope reads only.  A key listed
//! there falls back to its entry when the host store has no value; every
//! other key falls back to "absent" (`None`).  Absent and empty are distinct:
//! `orcidAppID` defaults to `Some("")`, while an unknown key defaults to `None`.

/// Client application identifier issued by the ORCID registry.
pub const ORCID_CLIENT_APPID: &str = "orcidAppID";

/// Client secret paired with [`ORCID_CLIENT_APPID`].
pub const ORCID_CLIENT_SECRET: &str = "orcidSecret";

/// The ORCID iD linked to a user account.
pub const ORCID_USER_ORCID: &str = "user_orcid";

/// The OAuth access token obtained for a user.
pub const ORCID_USER_TOKEN: &str = "user_token";

/// `"1"` once an administrator has completed the plugin setup, `"0"` before.
pub const KEY_CONFIGURED: &str = "configured";

/// Fallback values for application-scope keys that have never been written.
pub const DEFAULTS: &[(&str, &str)] = &[
    (KEY_CONFIGURED, "0"),
    (ORCID_CLIENT_APPID, ""),
    (ORCID_CLIENT_SECRET, ""),
];

/// Returns the application-scope default for `key`, or `None` when the key
/// has no documented fallback.
pub fn default_for(key: &str) -> Option<&'static str> {
    DEFAULTS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}

/// Returns `true` if `key` appears in [`DEFAULTS`].
pub fn is_default_bearing(key: &str) -> bool {
    default_for(key).is_some()
}

/// Where a setting lives in the host store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    /// Shared by every user of the plugin.
    App,
    /// Private to the given user identity.
    User(String),
}

impl Scope {
    /// Convenience constructor for [`Scope::User`].
    pub fn user(user_id: impl Into<String>) -> Self {
        Scope::User(user_id.into())
    }
}

/// The settings the plugin itself reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownKey {
    ClientAppId,
    ClientSecret,
    UserOrcid,
    UserToken,
    Configured,
}

impl KnownKey {
    /// Every known key, application-scope keys first.
    pub const ALL: [KnownKey; 5] = [
        KnownKey::Configured,
        KnownKey::ClientAppId,
        KnownKey::ClientSecret,
        KnownKey::UserOrcid,
        KnownKey::UserToken,
    ];

    /// The string stored in the host configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            KnownKey::ClientAppId => ORCID_CLIENT_APPID,
            KnownKey::ClientSecret => ORCID_CLIENT_SECRET,
            KnownKey::UserOrcid => ORCID_USER_ORCID,
            KnownKey::UserToken => ORCID_USER_TOKEN,
            KnownKey::Configured => KEY_CONFIGURED,
        }
    }

    /// `true` for keys stored per user rather than per application.
    pub fn is_user_scoped(self) -> bool {
        matches!(self, KnownKey::UserOrcid | KnownKey::UserToken)
    }

    /// One-line human description, used by the CLI `keys` listing.
    pub fn description(self) -> &'static str {
        match self {
            KnownKey::ClientAppId => "client application identifier",
            KnownKey::ClientSecret => "client secret",
            KnownKey::UserOrcid => "ORCID iD linked to the user",
            KnownKey::UserToken => "user access token",
            KnownKey::Configured => "setup completed flag",
        }
    }

    /// Application-scope default, if any.
    pub fn default_value(self) -> Option<&'static str> {
        default_for(self.as_str())
    }
}

impl std::fmt::Display for KnownKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
