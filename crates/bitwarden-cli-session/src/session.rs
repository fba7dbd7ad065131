use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Session token printed by `bw unlock --raw` or `bw login --raw`.
///
/// The token is kept byte for byte as the tool printed it. Its `Debug` output is redacted and
/// the backing memory is cleared on drop.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Session(String);

impl Session {
    /// Build a session from the captured standard output of an unlock or login command.
    pub fn from_stdout(stdout: &[u8]) -> Self {
        Self(String::from_utf8_lossy(stdout).into_owned())
    }

    /// The raw token, suitable for exporting as `BW_SESSION`.
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Session {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("Session(<empty>)")
        } else {
            f.write_str("Session([REDACTED])")
        }
    }
}
