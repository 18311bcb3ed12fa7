//! Bundling of multi-track results into one zip archive.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, instrument};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

/// Default archive name for a bundled run.
pub const DEFAULT_ARCHIVE_NAME: &str = "downloaded_music.zip";

/// Errors produced while writing an archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// I/O error reading a member or writing the archive.
    #[error("I/O error bundling {path}: {source}")]
    Io {
        /// The file being read or written.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// The zip writer rejected an entry.
    #[error("zip error bundling {path}: {source}")]
    Zip {
        /// The file being added.
        path: PathBuf,
        /// The underlying zip error.
        #[source]
        source: zip::result::ZipError,
    },

    /// A member path has no usable file name.
    #[error("cannot bundle {0}: path has no file name")]
    NoFileName(PathBuf),
}

/// Writes `files` into a zip at `archive_path`, each under its base name.
///
/// # Errors
///
/// Returns [`ArchiveError`] if any member cannot be read or the archive
/// cannot be written.
#[instrument(skip(files), fields(count = files.len(), archive = %archive_path.display()))]
pub fn bundle_zip(files: &[PathBuf], archive_path: &Path) -> Result<PathBuf, ArchiveError> {
    let archive = File::create(archive_path).map_err(|source| ArchiveError::Io {
        path: archive_path.to_path_buf(),
        source,
    })?;
    let mut writer = zip::ZipWriter::new(BufWriter::new(archive));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in files {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ArchiveError::NoFileName(path.clone()))?;
        writer
            .start_file(name, options)
            .map_err(|source| ArchiveError::Zip {
                path: path.clone(),
                source,
            })?;
        let mut member = File::open(path).map_err(|source| ArchiveError::Io {
            path: path.clone(),
            source,
        })?;
        io::copy(&mut member, &mut writer).map_err(|source| ArchiveError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(member = name, "Added to archive");
    }

    writer.finish().map_err(|source| ArchiveError::Zip {
        path: archive_path.to_path_buf(),
        source,
    })?;
    Ok(archive_path.to_path_buf())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn test_bundle_zip_stores_members_by_base_name() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("Y - X.mp3");
        let b = temp.path().join("Solo.mp3");
        std::fs::write(&a, b"first").unwrap();
        std::fs::write(&b, b"second").unwrap();

        let archive_path = temp.path().join(DEFAULT_ARCHIVE_NAME);
        bundle_zip(&[a, b], &archive_path).unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);
        let mut content = String::new();
        archive
            .by_name("Y - X.mp3")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "first");
        assert!(archive.by_name("Solo.mp3").is_ok());
    }

    #[test]
    fn test_bundle_zip_missing_member_fails() {
        let temp = TempDir::new().unwrap();
        let archive_path = temp.path().join("out.zip");
        let err = bundle_zip(&[temp.path().join("missing.mp3")], &archive_path).unwrap_err();
        assert!(matches!(err, ArchiveError::Io { .. }));
    }
}
