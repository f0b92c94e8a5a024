//! Keyed tool cache.
//!
//! Extracted tool trees are stored under `(tool name, version)` and reused
//! by every later invocation on the same machine. A `<version>.complete`
//! marker written after the tree is fully in place distinguishes committed
//! entries from debris left by an interrupted store; entries are never
//! re-validated on hit.
//!
//! Structure:
//! ```text
//! <root>/
//! └── dncs/
//!     ├── 3.1.404/          # extracted tool tree
//!     └── 3.1.404.complete  # commit marker
//! ```
//!
//! No eviction: the cache grows without bound, which is acceptable because
//! the agent environment running the installer is itself periodically
//! recycled.

use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use dotup_core::{Error, Result};

/// Keyed lookup/store of previously extracted tool directories.
#[derive(Debug, Clone)]
pub struct ToolCache {
    root: PathBuf,
}

impl Default for ToolCache {
    fn default() -> Self {
        let root = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("dotup")
            .join("tools");
        Self::new(root)
    }
}

impl ToolCache {
    /// Create a cache at the specified root directory.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Get the cache root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The canonical directory for a (tool, version) key.
    #[must_use]
    pub fn tool_dir(&self, name: &str, version: &str) -> PathBuf {
        self.root.join(name).join(version)
    }

    fn marker_path(&self, name: &str, version: &str) -> PathBuf {
        self.root.join(name).join(format!("{version}.complete"))
    }

    /// Look up a previously stored tool. Pure read.
    ///
    /// A hit requires both the tree and its commit marker; a directory
    /// without the marker is an interrupted store and is treated as absent.
    #[must_use]
    pub fn lookup(&self, name: &str, version: &str) -> Option<PathBuf> {
        let dir = self.tool_dir(name, version);
        if dir.is_dir() && self.marker_path(name, version).is_file() {
            trace!(name, version, ?dir, "Cache hit");
            Some(dir)
        } else {
            trace!(name, version, "Cache miss");
            None
        }
    }

    /// Relocate a fully extracted tree under the (name, version) key.
    ///
    /// The commit marker is written only after the tree is in place, and
    /// the canonical cached path is returned. A stale uncommitted directory
    /// under the same key is replaced.
    pub fn store(&self, extracted_root: &Path, name: &str, version: &str) -> Result<PathBuf> {
        let dest = self.tool_dir(name, version);

        let commit = || -> std::io::Result<()> {
            if dest.exists() {
                std::fs::remove_dir_all(&dest)?;
            }
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent)?;
            }
            // The scratch dir and the cache root may be on different
            // filesystems; fall back to a recursive copy when rename fails.
            if std::fs::rename(extracted_root, &dest).is_err() {
                copy_tree(extracted_root, &dest)?;
            }
            std::fs::write(self.marker_path(name, version), b"")?;
            Ok(())
        };

        commit().map_err(|e| Error::cache_store(name, version, e.to_string()))?;
        debug!(name, version, ?dest, "Stored tool in cache");
        Ok(dest)
    }
}

fn copy_tree(source: &Path, dest: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dest)?;
    for entry in std::fs::read_dir(source)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
