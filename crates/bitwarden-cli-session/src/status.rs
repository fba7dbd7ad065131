use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Output of `bw status`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VaultStatus {
    #[serde(default)]
    #[allow(missing_docs)]
    pub server_url: Option<String>,
    /// `None` until the vault has been synced at least once.
    #[serde(default)]
    pub last_sync: Option<DateTime<Utc>>,
    #[serde(default)]
    #[allow(missing_docs)]
    pub user_email: Option<String>,
    #[serde(default)]
    #[allow(missing_docs)]
    pub user_id: Option<String>,
    #[allow(missing_docs)]
    pub status: LockStatus,
}

/// Lock state of the vault as reported by `bw status`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum LockStatus {
    /// The vault is unlocked and can be read.
    Unlocked,
    /// Logged in, but the vault is encrypted.
    Locked,
    /// No account is logged in.
    Unauthenticated,
    /// Anything else, kept verbatim.
    Unknown(String),
}

impl LockStatus {
    #[allow(missing_docs)]
    pub fn as_str(&self) -> &str {
        match self {
            LockStatus::Unlocked => "unlocked",
            LockStatus::Locked => "locked",
            LockStatus::Unauthenticated => "unauthenticated",
            LockStatus::Unknown(s) => s.as_str(),
        }
    }
}

impl From<String> for LockStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "unlocked" => LockStatus::Unlocked,
            "locked" => LockStatus::Locked,
            "unauthenticated" => LockStatus::Unauthenticated,
            _ => LockStatus::Unknown(value),
        }
    }
}

impl From<LockStatus> for String {
    fn from(value: LockStatus) -> Self {
        match value {
            LockStatus::Unknown(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for LockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
