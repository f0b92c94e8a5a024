//! Platform suffix detection.
//!
//! Windows artifacts follow a single deterministic naming convention, so the
//! suffix is computed directly from the architecture. Every other OS family
//! is probed with an external executable whose stdout names the closest
//! platform match (`Primary:`) and an optional broadly compatible fallback
//! (`Legacy:`).

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, info};

use dotup_core::{Error, PlatformSuffix, Result};

/// Capability seam for platform detection.
///
/// Two implementations: a pure table-driven detector for the
/// deterministically named OS family, and a subprocess-backed detector that
/// parses probe output. Tests substitute canned doubles.
#[async_trait]
pub trait SuffixDetector: Send + Sync {
    /// Produce the ordered, non-empty suffix list for the current machine.
    ///
    /// Order encodes preference: primary first, legacy fallback second.
    async fn detect(&self) -> Result<Vec<PlatformSuffix>>;
}

/// Table-driven detector for Windows, the one OS family whose artifact
/// naming needs no external probing.
pub struct BuiltinDetector;

impl BuiltinDetector {
    /// The single `win-<arch>` suffix for a given architecture token.
    #[must_use]
    pub fn windows_suffix(arch: &str) -> PlatformSuffix {
        let arch = match arch {
            "x86_64" => "x64",
            "aarch64" => "arm64",
            other => other,
        };
        PlatformSuffix::new(format!("win-{arch}"))
    }
}

#[async_trait]
impl SuffixDetector for BuiltinDetector {
    async fn detect(&self) -> Result<Vec<PlatformSuffix>> {
        let suffix = Self::windows_suffix(std::env::consts::ARCH);
        info!(%suffix, "Primary platform");
        Ok(vec![suffix])
    }
}

/// Subprocess-backed detector for OS families without a deterministic
/// artifact naming convention.
pub struct ProbeDetector {
    probe: PathBuf,
}

impl ProbeDetector {
    /// Create a detector that runs the given probe executable.
    #[must_use]
    pub fn new(probe: PathBuf) -> Self {
        Self { probe }
    }
}

#[async_trait]
impl SuffixDetector for ProbeDetector {
    async fn detect(&self) -> Result<Vec<PlatformSuffix>> {
        debug!(probe = ?self.probe, "Running platform probe");

        let output = Command::new(&self.probe).output().await.map_err(|e| {
            Error::platform_detection(format!(
                "failed to run probe '{}': {e}",
                self.probe.display()
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::platform_detection(format!(
                "probe '{}' exited with {}: {}",
                self.probe.display(),
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let suffixes = parse_probe_output(&stdout)?;
        for suffix in &suffixes {
            info!(%suffix, "Detected platform");
        }
        Ok(suffixes)
    }
}

/// Parse `Primary:` / `Legacy:` markers from probe output.
///
/// The suffix is the text immediately after the marker up to the line
/// terminator, trimmed. Primary is appended before legacy. Marker presence
/// is an explicit `Option` check so a marker at offset zero is still found.
fn parse_probe_output(output: &str) -> Result<Vec<PlatformSuffix>> {
    let mut suffixes = Vec::new();

    for marker in ["Primary:", "Legacy:"] {
        if let Some(index) = output.find(marker) {
            let rest = &output[index + marker.len()..];
            let value = rest.lines().next().unwrap_or("").trim();
            if !value.is_empty() {
                suffixes.push(PlatformSuffix::new(value));
            }
        }
    }

    if suffixes.is_empty() {
        return Err(Error::platform_detection(
            "probe output contained no Primary:/Legacy: markers",
        ));
    }
    Ok(suffixes)
}

/// Pick the detector for the current machine.
///
/// Windows gets the table-driven detector and never spawns the probe.
#[must_use]
pub fn platform_detector(probe: PathBuf) -> Box<dyn SuffixDetector> {
    if cfg!(windows) {
        Box::new(BuiltinDetector)
    } else {
        Box::new(ProbeDetector::new(probe))
    }
}
