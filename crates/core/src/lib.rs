//! Core types for the dotup installer.
//!
//! This crate holds the pure, I/O-free model shared by the installer
//! pipeline and the CLI:
//!
//! - [`Error`] / [`Result`] - the closed set of failure kinds
//! - [`ExactVersion`] - a fully pinned version token
//! - [`PackageType`] and [`InstallRequest`] - the validated install request
//! - [`PlatformSuffix`] - a platform-architecture artifact identifier

#![warn(missing_docs)]

mod error;
mod platform;
mod request;
mod version;

pub use error::{DownloadFailure, Error, Result};
pub use platform::PlatformSuffix;
pub use request::{InstallRequest, PackageType};
pub use version::ExactVersion;
