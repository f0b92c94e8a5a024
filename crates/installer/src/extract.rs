//! Archive extraction.
//!
//! Dispatches on the archive file name: a zip-container suffix selects zip
//! extraction, anything else is treated as a (optionally gzip-compressed)
//! tarball. Extraction is all-or-nothing: a failed run removes the partial
//! tree and surfaces only the error.

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tar::Archive;
use tracing::debug;

use dotup_core::{Error, Result};

/// Extract `archive` into a fresh `extracted/` subdirectory of `scratch`.
///
/// Returns the root of the extracted tree. The scratch directory is the
/// caller's disposable intermediate location; nothing here touches the
/// permanent cache.
pub fn extract_archive(archive: &Path, scratch: &Path) -> Result<PathBuf> {
    let dest = scratch.join("extracted");
    if dest.exists() {
        std::fs::remove_dir_all(&dest)?;
    }
    std::fs::create_dir_all(&dest)?;

    let name = archive
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    debug!(?archive, ?dest, "Extracting package");

    let result = if name.ends_with(".zip") {
        extract_zip(archive, &dest)
    } else {
        extract_tar(archive, &name, &dest)
    };

    // No partial extraction is ever surfaced as a result.
    if let Err(e) = result {
        let _ = std::fs::remove_dir_all(&dest);
        return Err(Error::extraction(archive.display().to_string(), e.to_string()));
    }

    Ok(dest)
}

fn extract_zip(archive: &Path, dest: &Path) -> std::result::Result<(), String> {
    let file = File::open(archive).map_err(|e| e.to_string())?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| format!("failed to open zip: {e}"))?;

    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .map_err(|e| format!("failed to read zip entry: {e}"))?;

        let outpath = match entry.enclosed_name() {
            Some(path) => dest.join(path),
            None => continue,
        };

        if entry.is_dir() {
            std::fs::create_dir_all(&outpath).map_err(|e| e.to_string())?;
        } else {
            if let Some(parent) = outpath.parent() {
                std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
            }
            let mut content = Vec::new();
            entry.read_to_end(&mut content).map_err(|e| e.to_string())?;
            std::fs::write(&outpath, &content).map_err(|e| e.to_string())?;

            #[cfg(unix)]
            if let Some(mode) = entry.unix_mode() {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))
                    .map_err(|e| e.to_string())?;
            }
        }
    }
    Ok(())
}

fn extract_tar(archive: &Path, name: &str, dest: &Path) -> std::result::Result<(), String> {
    let file = File::open(archive).map_err(|e| e.to_string())?;

    let compressed = name.ends_with(".gz") || name.ends_with(".tgz");
    if compressed {
        let mut tar = Archive::new(GzDecoder::new(file));
        tar.unpack(dest).map_err(|e| format!("failed to extract tar: {e}"))
    } else {
        let mut tar = Archive::new(file);
        tar.unpack(dest).map_err(|e| format!("failed to extract tar: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;
    use tar::Builder;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn create_test_tarball(dir: &Path, files: &[(&str, &[u8])]) -> PathBuf {
        let tarball_path = dir.join("test.tar.gz");
        let file = File::create(&tarball_path).unwrap();
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = Builder::new(encoder);

        for (path, content) in files {
            let mut header = tar::Header::new_gnu();
            header.set_path(path).unwrap();
            header.set_size(content.len() as u64);
            header.set_mode(0o755);
            header.set_cksum();
            builder.append(&header, &content[..]).unwrap();
        }

        builder.into_inner().unwrap().finish().unwrap();
        tarball_path
    }

    fn create_test_zip(dir: &Path, files: &[(&str, &[u8])]) -> PathBuf {
        let zip_path = dir.join("test.zip");
        let file = File::create(&zip_path).unwrap();
        let mut writer = zip::ZipWriter::new(file);

        for (path, content) in files {
            writer
                .start_file(*path, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap();
        zip_path
    }

    #[test]
    fn test_extract_tarball() {
        let temp = TempDir::new().unwrap();
        let archive = create_test_tarball(
            temp.path(),
            &[("dotnet", b"host binary"), ("sdk/3.1.404/sdk.dll", b"sdk")],
        );

        let root = extract_archive(&archive, temp.path()).unwrap();
        assert_eq!(
            std::fs::read(root.join("dotnet")).unwrap(),
            b"host binary"
        );
        assert!(root.join("sdk/3.1.404/sdk.dll").exists());
    }

    #[test]
    fn test_extract_zip_by_suffix() {
        let temp = TempDir::new().unwrap();
        let archive = create_test_zip(
            temp.path(),
            &[("dotnet.exe", b"host"), ("shared/runtime.dll", b"rt")],
        );

        let root = extract_archive(&archive, temp.path()).unwrap();
        assert!(root.join("dotnet.exe").exists());
        assert!(root.join("shared/runtime.dll").exists());
    }

    #[test]
    fn test_corrupt_archive_fails_without_partial_tree() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("bad.tar.gz");
        std::fs::write(&archive, b"not a gzip stream").unwrap();

        let err = extract_archive(&archive, temp.path()).unwrap_err();
        assert!(matches!(err, Error::Extraction { .. }));
        assert!(!temp.path().join("extracted").exists());
    }

    #[test]
    fn test_corrupt_zip_fails() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("bad.zip");
        std::fs::write(&archive, b"not a zip").unwrap();

        let err = extract_archive(&archive, temp.path()).unwrap_err();
        assert!(matches!(err, Error::Extraction { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_tarball_preserves_executable_bit() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let archive = create_test_tarball(temp.path(), &[("dotnet", b"host binary")]);

        let root = extract_archive(&archive, temp.path()).unwrap();
        let mode = std::fs::metadata(root.join("dotnet"))
            .unwrap()
            .permissions()
            .mode();
        assert_ne!(mode & 0o111, 0);
    }
}
