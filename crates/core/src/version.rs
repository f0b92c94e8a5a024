//! Exact version validation.
//!
//! The installer only accepts fully pinned versions. Anything that could
//! resolve to more than one release (wildcards, ranges, channel names like
//! "latest") is rejected before any network or cache operation happens.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A fully pinned version token, e.g. `3.1.404`.
///
/// Invariant: the inner string parses as a complete semantic version with
/// no wildcard, range operator, or floating marker. Constructed only
/// through [`ExactVersion::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExactVersion(String);

impl ExactVersion {
    /// Validate a raw version string.
    ///
    /// The input is whitespace-trimmed and an optional leading `v` is
    /// stripped. Fails with [`Error::InvalidVersion`] for anything that is
    /// not a single pinned `major.minor.patch[-prerelease]` version.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::invalid_version(raw, "version is empty"));
        }

        let cleaned = trimmed.strip_prefix('v').unwrap_or(trimmed);

        // Range operators and wildcards are never part of a pinned version;
        // reject them up front so the message names the offending marker.
        if let Some(marker) = cleaned
            .chars()
            .find(|c| matches!(c, '*' | '^' | '~' | '>' | '<' | '=' | ' '))
        {
            return Err(Error::invalid_version(
                trimmed,
                format!("contains range or wildcard marker '{marker}'"),
            ));
        }

        match semver::Version::parse(cleaned) {
            Ok(_) => Ok(Self(cleaned.to_string())),
            Err(e) => Err(Error::invalid_version(trimmed, e.to_string())),
        }
    }

    /// The pinned version as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExactVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
