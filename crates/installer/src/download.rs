//! Download manager with ordered candidate fallback.

use async_trait::async_trait;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use dotup_core::{DownloadFailure, Error, Result};

/// Capability seam for downloading a single URL.
///
/// The real implementation talks HTTP; tests substitute doubles that fail
/// or succeed on cue.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Fully download `url` into `dest_dir`, returning the file path.
    ///
    /// Any failure (network error, non-success status, truncated transfer)
    /// is an error; partial files are not returned.
    async fn download(&self, url: &str, dest_dir: &Path) -> Result<PathBuf>;
}

/// HTTP downloader backed by reqwest.
pub struct HttpDownloader {
    client: Client,
}

impl Default for HttpDownloader {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpDownloader {
    /// Create a new HTTP downloader.
    ///
    /// # Panics
    ///
    /// `Client::builder().build()` only fails with a broken TLS backend,
    /// which is a fundamental environment issue.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .user_agent("dotup")
                .build()
                .expect("Failed to create HTTP client - TLS backend initialization failed"),
        }
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, url: &str, dest_dir: &Path) -> Result<PathBuf> {
        debug!(%url, "Downloading candidate");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::download_candidate(url, e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::download_candidate(
                url,
                format!("HTTP {}", response.status()),
            ));
        }

        let expected_len = response.content_length();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::download_candidate(url, e.to_string()))?;

        // A short body relative to Content-Length means the transfer was cut off.
        if let Some(expected) = expected_len {
            if body.len() as u64 != expected {
                return Err(Error::download_candidate(
                    url,
                    format!("truncated transfer: got {} of {expected} bytes", body.len()),
                ));
            }
        }

        let dest = dest_dir.join(file_name_for_url(url));
        tokio::fs::write(&dest, &body).await?;
        debug!(?dest, bytes = body.len(), "Downloaded candidate");
        Ok(dest)
    }
}

/// Derive a local file name from the last URL path segment.
fn file_name_for_url(url: &str) -> String {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("download")
        .to_string()
}

/// Attempt candidates strictly in order; first full success wins.
///
/// Each per-candidate failure is demoted to a warning and recorded; later
/// candidates are only attempted after the previous one failed, and nothing
/// past the first success is ever attempted. If every candidate fails, the
/// result is [`Error::Download`] carrying one entry per candidate.
pub async fn fetch_first(
    downloader: &dyn Downloader,
    candidates: &[String],
    dest_dir: &Path,
) -> Result<PathBuf> {
    let mut failures: Vec<DownloadFailure> = Vec::new();

    for url in candidates {
        match downloader.download(url, dest_dir).await {
            Ok(path) => {
                info!(%url, "Download succeeded");
                return Ok(path);
            }
            Err(e) => {
                warn!(%url, error = %candidate_reason(&e), "Could not download candidate");
                failures.push(DownloadFailure {
                    url: url.clone(),
                    reason: candidate_reason(&e),
                });
            }
        }
    }

    Err(Error::Download(failures))
}

/// Unwrap a single-candidate download error back to its bare reason.
fn candidate_reason(error: &Error) -> String {
    match error {
        Error::Download(failures) if failures.len() == 1 => failures[0].reason.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Double that fails the first `fail_count` attempts, then succeeds,
    /// recording every URL it was asked for.
    struct FlakyDownloader {
        fail_count: usize,
        attempts: Mutex<Vec<String>>,
    }

    impl FlakyDownloader {
        fn new(fail_count: usize) -> Self {
            Self {
                fail_count,
                attempts: Mutex::new(Vec::new()),
            }
        }

        fn attempts(&self) -> Vec<String> {
            self.attempts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Downloader for FlakyDownloader {
        async fn download(&self, url: &str, dest_dir: &Path) -> Result<PathBuf> {
            let mut attempts = self.attempts.lock().unwrap();
            attempts.push(url.to_string());
            if attempts.len() <= self.fail_count {
                return Err(Error::download_candidate(url, "HTTP 404"));
            }
            let dest = dest_dir.join("artifact.tar.gz");
            std::fs::write(&dest, b"payload")?;
            Ok(dest)
        }
    }

    fn urls(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("https://feed.example/{i}")).collect()
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let temp = TempDir::new().unwrap();
        let downloader = FlakyDownloader::new(0);

        let path = fetch_first(&downloader, &urls(3), temp.path()).await.unwrap();
        assert!(path.exists());
        // Nothing past the first success is attempted.
        assert_eq!(downloader.attempts(), vec!["https://feed.example/0"]);
    }

    #[tokio::test]
    async fn test_fallback_stops_after_first_success() {
        let temp = TempDir::new().unwrap();
        let downloader = FlakyDownloader::new(2);

        let path = fetch_first(&downloader, &urls(5), temp.path()).await.unwrap();
        assert!(path.exists());
        // First two failed, third succeeded, fourth and fifth never attempted.
        assert_eq!(downloader.attempts().len(), 3);
        assert_eq!(downloader.attempts()[2], "https://feed.example/2");
    }

    #[tokio::test]
    async fn test_all_candidates_failing_aggregates_every_failure() {
        let temp = TempDir::new().unwrap();
        let downloader = FlakyDownloader::new(usize::MAX);

        let err = fetch_first(&downloader, &urls(3), temp.path())
            .await
            .unwrap_err();
        match err {
            Error::Download(failures) => {
                assert_eq!(failures.len(), 3);
                assert_eq!(failures[0].url, "https://feed.example/0");
                assert_eq!(failures[0].reason, "HTTP 404");
                assert_eq!(failures[2].url, "https://feed.example/2");
            }
            other => panic!("expected Download error, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_empty_candidate_list_fails() {
        let temp = TempDir::new().unwrap();
        let downloader = FlakyDownloader::new(0);

        let err = fetch_first(&downloader, &[], temp.path()).await.unwrap_err();
        assert!(matches!(err, Error::Download(f) if f.is_empty()));
    }

    #[test]
    fn test_file_name_for_url() {
        assert_eq!(
            file_name_for_url("https://feed/dotnet-sdk-3.1.404-linux-x64.tar.gz"),
            "dotnet-sdk-3.1.404-linux-x64.tar.gz"
        );
        assert_eq!(file_name_for_url("https://feed/dir/"), "dir");
        assert_eq!(file_name_for_url(""), "download");
    }
}
