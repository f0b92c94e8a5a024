//! Candidate download URL resolution.

use dotup_core::{ExactVersion, PackageType, PlatformSuffix};

/// Maps platform suffixes + version + package type to candidate URLs.
///
/// Candidates are ordered most platform-specific first; the download loop
/// consumes them strictly in sequence.
pub trait UrlResolver: Send + Sync {
    /// Produce the ordered candidate URL list.
    fn resolve(
        &self,
        suffixes: &[PlatformSuffix],
        version: &ExactVersion,
        package_type: PackageType,
    ) -> Vec<String>;
}

/// Default URL for the .NET CLI release feed.
pub const DEFAULT_FEED: &str = "https://dotnetcli.azureedge.net/dotnet";

/// Resolver for the .NET CLI CDN.
///
/// Builds one candidate per suffix, preserving suffix order. Windows
/// suffixes select the zip container, everything else the compressed
/// tarball, matching the artifacts the feed publishes.
pub struct CdnUrlResolver {
    feed: String,
}

impl Default for CdnUrlResolver {
    fn default() -> Self {
        Self::new(DEFAULT_FEED)
    }
}

impl CdnUrlResolver {
    /// Create a resolver against the given feed base URL.
    #[must_use]
    pub fn new(feed: impl Into<String>) -> Self {
        Self { feed: feed.into() }
    }
}

impl UrlResolver for CdnUrlResolver {
    fn resolve(
        &self,
        suffixes: &[PlatformSuffix],
        version: &ExactVersion,
        package_type: PackageType,
    ) -> Vec<String> {
        suffixes
            .iter()
            .map(|suffix| {
                let ext = if suffix.is_windows() { "zip" } else { "tar.gz" };
                format!(
                    "{feed}/{dir}/{version}/{artifact}-{version}-{suffix}.{ext}",
                    feed = self.feed,
                    dir = package_type.feed_dir(),
                    artifact = package_type.artifact(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version() -> ExactVersion {
        ExactVersion::parse("3.1.404").unwrap()
    }

    #[test]
    fn test_sdk_tarball_url() {
        let resolver = CdnUrlResolver::default();
        let urls = resolver.resolve(
            &[PlatformSuffix::new("linux-x64")],
            &version(),
            PackageType::Sdk,
        );
        assert_eq!(
            urls,
            vec![
                "https://dotnetcli.azureedge.net/dotnet/Sdk/3.1.404/dotnet-sdk-3.1.404-linux-x64.tar.gz"
            ]
        );
    }

    #[test]
    fn test_windows_suffix_selects_zip() {
        let resolver = CdnUrlResolver::default();
        let urls = resolver.resolve(
            &[PlatformSuffix::new("win-x64")],
            &version(),
            PackageType::Runtime,
        );
        assert_eq!(
            urls,
            vec![
                "https://dotnetcli.azureedge.net/dotnet/Runtime/3.1.404/dotnet-runtime-3.1.404-win-x64.zip"
            ]
        );
    }

    #[test]
    fn test_suffix_order_is_preserved() {
        let resolver = CdnUrlResolver::new("https://feed.example");
        let urls = resolver.resolve(
            &[
                PlatformSuffix::new("ubuntu.18.04-x64"),
                PlatformSuffix::new("ubuntu-x64"),
            ],
            &version(),
            PackageType::Sdk,
        );
        assert_eq!(urls.len(), 2);
        assert!(urls[0].contains("ubuntu.18.04-x64"));
        assert!(urls[1].contains("-ubuntu-x64"));
    }
}
