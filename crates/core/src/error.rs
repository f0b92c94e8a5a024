//! Error types for installer operations.

use thiserror::Error;

/// Result type for installer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A single failed download candidate.
///
/// Collected by the download fallback loop; one entry per attempted URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadFailure {
    /// The candidate URL that was attempted.
    pub url: String,
    /// Why the attempt failed (network error, HTTP status, truncation).
    pub reason: String,
}

impl std::fmt::Display for DownloadFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.url, self.reason)
    }
}

/// Errors that can occur while installing a package.
#[derive(Error, Debug)]
pub enum Error {
    /// The requested version is not fully pinned.
    #[error("Version '{version}' is not an exact version: {message}")]
    InvalidVersion {
        /// The rejected version string.
        version: String,
        /// Why it was rejected.
        message: String,
    },

    /// The platform probe failed or produced unusable output.
    #[error("Platform detection failed: {0}")]
    PlatformDetection(String),

    /// Every download candidate failed.
    #[error("All download candidates failed ({})", format_failures(.0))]
    Download(Vec<DownloadFailure>),

    /// The downloaded archive could not be extracted.
    #[error("Failed to extract archive '{archive}': {message}")]
    Extraction {
        /// The archive path that was being extracted.
        archive: String,
        /// Underlying failure detail.
        message: String,
    },

    /// The extracted tree could not be committed to the tool cache.
    #[error("Failed to cache {tool} {version}: {message}")]
    CacheStore {
        /// The cached tool name.
        tool: String,
        /// The version key.
        version: String,
        /// Underlying failure detail.
        message: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_failures(failures: &[DownloadFailure]) -> String {
    if failures.is_empty() {
        return "no candidates".to_string();
    }
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// Create an invalid version error.
    #[must_use]
    pub fn invalid_version(version: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.into(),
            message: message.into(),
        }
    }

    /// Create a platform detection error.
    #[must_use]
    pub fn platform_detection(message: impl Into<String>) -> Self {
        Self::PlatformDetection(message.into())
    }

    /// Create a download error for a single failed candidate.
    ///
    /// The fallback loop flattens these into one aggregate [`Error::Download`].
    #[must_use]
    pub fn download_candidate(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Download(vec![DownloadFailure {
            url: url.into(),
            reason: reason.into(),
        }])
    }

    /// Create an extraction error.
    #[must_use]
    pub fn extraction(archive: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            archive: archive.into(),
            message: message.into(),
        }
    }

    /// Create a cache store error.
    #[must_use]
    pub fn cache_store(
        tool: impl Into<String>,
        version: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::CacheStore {
            tool: tool.into(),
            version: version.into(),
            message: message.into(),
        }
    }
}
