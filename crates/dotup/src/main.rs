//! dotup CLI
//!
//! Installs an exactly-pinned .NET SDK or runtime into the shared local
//! tool cache and points `PATH`/`DOTNET_ROOT` at it for later pipeline
//! steps.

// CLI binary needs to output to stdout/stderr - this is intentional
#![allow(clippy::print_stdout, clippy::print_stderr)]

use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::info;

use dotup_core::{InstallRequest, PackageType};
use dotup_installer::{Installer, ToolCache};

/// Install a pinned .NET package into the shared tool cache.
#[derive(Parser, Debug)]
#[command(name = "dotup", version, about)]
struct Cli {
    /// Which package to install.
    #[arg(long, value_enum)]
    package_type: PackageTypeArg,

    /// Exact version to install, e.g. 3.1.404. Ranges and "latest" are
    /// rejected.
    #[arg(value_name = "VERSION")]
    requested_version: String,

    /// Tool cache root (defaults to the user cache directory).
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Platform probe executable (defaults to get-os-distro.sh next to
    /// this binary).
    #[arg(long)]
    probe: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PackageTypeArg {
    Sdk,
    Runtime,
}

impl From<PackageTypeArg> for PackageType {
    fn from(arg: PackageTypeArg) -> Self {
        match arg {
            PackageTypeArg::Sdk => Self::Sdk,
            PackageTypeArg::Runtime => Self::Runtime,
        }
    }
}

/// The probe ships in `externals/` next to the installed binary.
fn default_probe_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .map_or_else(
            || PathBuf::from("get-os-distro.sh"),
            |dir| dir.join("externals").join("get-os-distro.sh"),
        )
}

#[tokio::main]
async fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let cli = Cli::parse();

    let package_type = PackageType::from(cli.package_type);
    info!(%package_type, version = %cli.requested_version.trim(), "Tool to install");

    let request = match InstallRequest::new(package_type, &cli.requested_version) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("dotup: {e}");
            std::process::exit(2);
        }
    };

    let cache = cli.cache_dir.map_or_else(ToolCache::default, ToolCache::new);
    let probe = cli.probe.unwrap_or_else(default_probe_path);
    let installer = Installer::new(cache, probe);

    match installer.install(&request).await {
        Ok(path) => {
            println!("{}", path.display());
        }
        Err(e) => {
            eprintln!("dotup: {e}");
            std::process::exit(1);
        }
    }
}
