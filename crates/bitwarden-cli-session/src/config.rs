use std::{env, ffi::OsString};

/// Environment variable holding the personal API key client id, read by `bw login --apikey`.
pub const CLIENT_ID_ENV: &str = "BW_CLIENTID";
/// Environment variable holding the personal API key client secret.
pub const CLIENT_SECRET_ENV: &str = "BW_CLIENTSECRET";
/// Environment variable `bw unlock --passwordenv` is pointed at when it is present.
pub const PASSWORD_ENV: &str = "BW_PASSWORD";
/// Overrides the `bw` executable used by [BwConfig::from_env].
pub const CLI_PATH_ENV: &str = "BW_CLI_PATH";

const DEFAULT_PROGRAM: &str = "bw";

/// Inputs that decide how a [VaultSession](crate::VaultSession) authenticates.
///
/// Nothing here is read implicitly: build it by hand, or opt in to the conventional `BW_*`
/// variables with [BwConfig::from_env].
#[derive(Clone, PartialEq, Eq)]
pub struct BwConfig {
    /// Executable to run, `bw` unless overridden.
    pub program: String,
    /// Personal API key client id. Together with `client_secret` selects non-interactive login.
    pub client_id: Option<String>,
    /// Personal API key client secret.
    pub client_secret: Option<String>,
    /// Name of an environment variable holding the master password. When set, unlock reads the
    /// password from it instead of prompting.
    pub password_env: Option<String>,
    /// Run `bw sync` once the vault is unlocked.
    pub sync_on_unlock: bool,
}

impl Default for BwConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            client_id: None,
            client_secret: None,
            password_env: None,
            sync_on_unlock: true,
        }
    }
}

impl BwConfig {
    /// Load the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var_os(key))
    }

    /// Variables count when present, whatever their value. Values that are not UTF-8 are
    /// converted lossily.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let value = |key: &str| lookup(key).map(|v| v.to_string_lossy().into_owned());
        Self {
            program: value(CLI_PATH_ENV)
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| DEFAULT_PROGRAM.to_string()),
            client_id: value(CLIENT_ID_ENV),
            client_secret: value(CLIENT_SECRET_ENV),
            password_env: lookup(PASSWORD_ENV).map(|_| PASSWORD_ENV.to_string()),
            sync_on_unlock: true,
        }
    }

    /// Both halves of the API key, if configured.
    pub fn api_key(&self) -> Option<(&str, &str)> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) => Some((id.as_str(), secret.as_str())),
            _ => None,
        }
    }
}

impl std::fmt::Debug for BwConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BwConfig")
            .field("program", &self.program)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field("password_env", &self.password_env)
            .field("sync_on_unlock", &self.sync_on_unlock)
            .finish()
    }
}
