//! The validated install request.

use serde::{Deserialize, Serialize};

use crate::{ExactVersion, Result};

/// Which .NET package to install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    /// The full SDK (includes the runtime).
    Sdk,
    /// The runtime only.
    Runtime,
}

impl PackageType {
    /// The tool-cache name this package is stored under.
    #[must_use]
    pub fn tool_name(self) -> &'static str {
        match self {
            Self::Sdk => "dncs",
            Self::Runtime => "dncr",
        }
    }

    /// The artifact name prefix used in download URLs.
    #[must_use]
    pub fn artifact(self) -> &'static str {
        match self {
            Self::Sdk => "dotnet-sdk",
            Self::Runtime => "dotnet-runtime",
        }
    }

    /// The feed directory this package is published under.
    #[must_use]
    pub fn feed_dir(self) -> &'static str {
        match self {
            Self::Sdk => "Sdk",
            Self::Runtime => "Runtime",
        }
    }
}

impl std::fmt::Display for PackageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sdk => write!(f, "sdk"),
            Self::Runtime => write!(f, "runtime"),
        }
    }
}

impl std::str::FromStr for PackageType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sdk" => Ok(Self::Sdk),
            "runtime" => Ok(Self::Runtime),
            other => Err(format!("unknown package type '{other}'")),
        }
    }
}

/// An immutable, validated request to install one pinned package.
///
/// Constructed once per invocation; the version is guaranteed exact before
/// the request exists, so no pipeline stage ever sees an unpinned version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    /// Which package to install.
    pub package_type: PackageType,
    /// The pinned version.
    pub version: ExactVersion,
}

impl InstallRequest {
    /// Validate a raw version string and build the request.
    pub fn new(package_type: PackageType, raw_version: &str) -> Result<Self> {
        Ok(Self {
            package_type,
            version: ExactVersion::parse(raw_version)?,
        })
    }

    /// The tool-cache name for this request.
    #[must_use]
    pub fn tool_name(&self) -> &'static str {
        self.package_type.tool_name()
    }
}
