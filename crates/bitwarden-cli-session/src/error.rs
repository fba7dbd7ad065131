//! Errors that can occur when driving the `bw` command line tool

use thiserror::Error;

/// Errors returned by [VaultSession](crate::VaultSession) and the command helpers.
#[derive(Debug, Error)]
pub enum BwError {
    /// The process could not be started or waited on.
    #[error("{command}: {source}")]
    Spawn {
        /// The command line that was attempted, with the session redacted.
        command: String,
        #[allow(missing_docs)]
        #[source]
        source: std::io::Error,
    },

    /// The process ran but exited unsuccessfully.
    #[error("{command}: {status}: {stderr}")]
    CommandFailed {
        /// The command line that was run, with the session redacted.
        command: String,
        /// Human readable exit status, e.g. `exit status: 1`.
        status: String,
        /// Everything the process wrote to standard error. Empty for interactive commands,
        /// whose standard error goes to the terminal.
        stderr: String,
    },

    /// The process succeeded but its output was not the expected JSON document.
    #[error("unable to unmarshal {target}: {source}")]
    Decode {
        /// Name of the record the output was decoded into, e.g. `Item` or `Vec<Item>`.
        target: String,
        #[allow(missing_docs)]
        #[source]
        source: serde_json::Error,
    },

    /// `bw status` reported a status other than unlocked, locked or unauthenticated.
    #[error("unknown vault status `{0}`")]
    UnknownStatus(String),

    /// The vault was still not unlocked after logging in or unlocking.
    #[error("authentication failed: vault status `{0}`")]
    AuthenticationFailed(String),

    /// Syncing the freshly unlocked vault failed.
    #[error("failed sync of unlocked vault: {0}")]
    Sync(#[source] Box<BwError>),
}

impl BwError {
    /// Returns the captured standard error of a failed command, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            BwError::CommandFailed { stderr, .. } => Some(stderr),
            BwError::Sync(inner) => inner.stderr(),
            _ => None,
        }
    }
}
