//! Platform suffix identifiers.
//!
//! A platform suffix names the OS family and architecture of a downloadable
//! artifact, e.g. `win-x64`, `linux-x64`, `ubuntu.18.04-x64`, `osx-x64`.

use serde::{Deserialize, Serialize};

/// A platform-architecture token used to select the correct artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatformSuffix(String);

impl PlatformSuffix {
    /// Create a suffix from a token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The suffix as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this suffix names a Windows artifact.
    ///
    /// Windows artifacts ship in zip containers, everything else as
    /// compressed tarballs.
    #[must_use]
    pub fn is_windows(&self) -> bool {
        self.0.starts_with("win-")
    }
}

impl std::fmt::Display for PlatformSuffix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
