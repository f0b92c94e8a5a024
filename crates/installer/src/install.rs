//! The install orchestrator.
//!
//! Linear pipeline with no branching back:
//! check cache, and on a miss detect the platform, resolve candidate URLs,
//! download the first that succeeds, extract, and commit to the cache.
//! Extraction always targets a disposable scratch directory, so a failed
//! run commits nothing and a re-invocation is safe.

use std::path::{Path, PathBuf};
use tracing::info;

use dotup_core::{InstallRequest, Result};

use crate::cache::ToolCache;
use crate::detect::{SuffixDetector, platform_detector};
use crate::download::{Downloader, HttpDownloader, fetch_first};
use crate::extract::extract_archive;
use crate::resolve::{CdnUrlResolver, UrlResolver};
use crate::ROOT_VARIABLE;

/// Sequences the install pipeline and applies process-level side effects.
pub struct Installer {
    cache: ToolCache,
    detector: Box<dyn SuffixDetector>,
    resolver: Box<dyn UrlResolver>,
    downloader: Box<dyn Downloader>,
}

impl Installer {
    /// Create an installer with the production seams.
    ///
    /// `probe` is the platform-probe executable used on OS families
    /// without a deterministic artifact naming convention.
    #[must_use]
    pub fn new(cache: ToolCache, probe: PathBuf) -> Self {
        Self {
            cache,
            detector: platform_detector(probe),
            resolver: Box::new(CdnUrlResolver::default()),
            downloader: Box::new(HttpDownloader::new()),
        }
    }

    /// Replace the platform detector.
    #[must_use]
    pub fn with_detector(mut self, detector: Box<dyn SuffixDetector>) -> Self {
        self.detector = detector;
        self
    }

    /// Replace the URL resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Box<dyn UrlResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace the downloader.
    #[must_use]
    pub fn with_downloader(mut self, downloader: Box<dyn Downloader>) -> Self {
        self.downloader = downloader;
        self
    }

    /// Install the requested package, reusing the cache when possible.
    ///
    /// On success the installed path is prepended to the process `PATH`
    /// and exported as `DOTNET_ROOT`, then returned.
    pub async fn install(&self, request: &InstallRequest) -> Result<PathBuf> {
        let tool = request.tool_name();
        let version = request.version.as_str();

        info!(%tool, %version, "Checking tool cache");
        let tool_path = match self.cache.lookup(tool, version) {
            Some(path) => {
                info!(?path, "Using cached tool");
                path
            }
            None => self.download_and_install(request).await?,
        };

        export_tool_path(&tool_path);
        Ok(tool_path)
    }

    async fn download_and_install(&self, request: &InstallRequest) -> Result<PathBuf> {
        info!("Installing afresh");

        let suffixes = self.detector.detect().await?;
        info!(package_type = %request.package_type, version = %request.version, "Resolving download URLs");
        let candidates = self
            .resolver
            .resolve(&suffixes, &request.version, request.package_type);

        // Disposable intermediate location; dropped (and removed) on any
        // failure, so no partial artifact ever reaches the cache.
        let scratch = tempfile::tempdir()?;
        let archive = fetch_first(self.downloader.as_ref(), &candidates, scratch.path()).await?;

        info!(?archive, "Extracting package");
        let extracted = extract_archive(&archive, scratch.path())?;

        info!("Caching tool");
        let cached = self
            .cache
            .store(&extracted, request.tool_name(), request.version.as_str())?;
        info!(package_type = %request.package_type, version = %request.version, "Successfully installed");
        Ok(cached)
    }
}

/// Prepend the tool path to `PATH` and export the root-location variable,
/// so processes launched from this context can find the runtime without a
/// well-known system location. Visible to this process and its children
/// only.
#[allow(unsafe_code)]
fn export_tool_path(tool_path: &Path) {
    let prepended = match std::env::var_os("PATH") {
        Some(current) => {
            let entries = std::iter::once(tool_path.to_path_buf())
                .chain(std::env::split_paths(&current));
            std::env::join_paths(entries).ok()
        }
        None => Some(tool_path.as_os_str().to_os_string()),
    };

    // SAFETY: the pipeline is single-threaded at this point; no other
    // thread reads or writes the environment concurrently.
    unsafe {
        if let Some(path) = prepended {
            std::env::set_var("PATH", path);
        }
        std::env::set_var(ROOT_VARIABLE, tool_path);
    }
}
