//! Install pipeline for dotup.
//!
//! This crate provides functionality to:
//! - Detect the platform suffixes naming the right downloadable artifact
//! - Resolve suffixes + version to an ordered list of candidate URLs
//! - Download the first candidate that succeeds
//! - Extract the archive and commit it to the shared tool cache
//!
//! # Example
//!
//! ```ignore
//! use dotup_core::{InstallRequest, PackageType};
//! use dotup_installer::{Installer, ToolCache};
//!
//! let request = InstallRequest::new(PackageType::Sdk, "3.1.404")?;
//! let installer = Installer::new(ToolCache::default());
//!
//! // Cache hit short-circuits; miss runs detect -> resolve -> download ->
//! // extract -> store. Either way PATH and DOTNET_ROOT point at the result.
//! let path = installer.install(&request).await?;
//! ```

#![warn(missing_docs)]

mod cache;
mod detect;
mod download;
mod extract;
mod install;
mod resolve;

pub use cache::ToolCache;
pub use detect::{BuiltinDetector, ProbeDetector, SuffixDetector, platform_detector};
pub use download::{Downloader, HttpDownloader, fetch_first};
pub use extract::extract_archive;
pub use install::Installer;
pub use resolve::{CdnUrlResolver, UrlResolver};

/// Environment variable exported on success so launched processes can find
/// the installed runtime outside any well-known system location.
pub const ROOT_VARIABLE: &str = "DOTNET_ROOT";
