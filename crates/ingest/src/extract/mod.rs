//! Archive extraction — materialize a stored artifact into a directory tree.
//!
//! Format dispatch is by filename suffix only: `.zip` goes through the zip
//! reader, `.tar.gz`/`.tgz` through gzip-then-tar, and anything else is
//! copied verbatim into the destination. The destination is always the
//! sibling `extracted/` directory of the source; a second extraction of
//! the same source overwrites same-named entries in place.

use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("unreadable zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("invalid source path: {0}")]
    InvalidSource(PathBuf),
}

/// Archive suffixes recognised for extraction and recursive descent.
pub fn is_archive_name(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    name.ends_with(".zip") || name.ends_with(".tar.gz") || name.ends_with(".tgz")
}

/// Unpack `source` into its sibling `extracted/` directory and return it.
///
/// Fails when the source cannot be opened or the destination cannot be
/// created; individual entries the archive reader cannot materialize are
/// skipped instead.
pub fn extract(source: &Path) -> Result<PathBuf, ExtractError> {
    let file_name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ExtractError::InvalidSource(source.to_path_buf()))?
        .to_string();
    let parent = source
        .parent()
        .ok_or_else(|| ExtractError::InvalidSource(source.to_path_buf()))?;
    let dest = parent.join("extracted");
    fs::create_dir_all(&dest)?;

    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".zip") {
        unpack_zip(source, &dest)?;
    } else if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
        unpack_tar_gz(source, &dest)?;
    } else {
        // Not an archive: a null extraction that still yields a
        // destination directory holding the one file.
        fs::copy(source, dest.join(&file_name))?;
    }
    debug!("extracted {} into {}", source.display(), dest.display());
    Ok(dest)
}

fn unpack_zip(source: &Path, dest: &Path) -> Result<(), ExtractError> {
    let file = File::open(source)?;
    let mut archive = zip::ZipArchive::new(file)?;
    for index in 0..archive.len() {
        let mut entry = match archive.by_index(index) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(
                    "skipping unreadable zip entry #{} in {}: {}",
                    index,
                    source.display(),
                    e
                );
                continue;
            }
        };
        let relative = match sanitize_entry_path(Path::new(entry.name())) {
            Some(relative) => relative,
            None => {
                warn!("skipping zip entry with empty path in {}", source.display());
                continue;
            }
        };
        let target = dest.join(relative);
        if entry.is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = File::create(&target)?;
            io::copy(&mut entry, &mut out)?;
        }
    }
    Ok(())
}

fn unpack_tar_gz(source: &Path, dest: &Path) -> Result<(), ExtractError> {
    let file = File::open(source)?;
    let mut archive = Archive::new(GzDecoder::new(file));
    for entry in archive.entries()? {
        let mut entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                // The stream cannot be re-synchronised past a bad header;
                // keep what was materialized so far.
                warn!(
                    "skipping remainder of tar archive {}: {}",
                    source.display(),
                    e
                );
                break;
            }
        };
        let raw_path = match entry.path() {
            Ok(path) => path.into_owned(),
            Err(e) => {
                warn!(
                    "skipping tar entry with unreadable path in {}: {}",
                    source.display(),
                    e
                );
                continue;
            }
        };
        let relative = match sanitize_entry_path(&raw_path) {
            Some(relative) => relative,
            None => continue,
        };
        let target = dest.join(relative);
        let kind = entry.header().entry_type();
        if kind.is_dir() {
            fs::create_dir_all(&target)?;
        } else if kind.is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = File::create(&target)?;
            io::copy(&mut entry, &mut out)?;
        } else {
            debug!(
                "skipping special tar entry {} ({:?})",
                raw_path.display(),
                kind
            );
        }
    }
    Ok(())
}

/// Normalize an entry's stored path for joining under the destination:
/// root, parent and current-dir segments are dropped.
fn sanitize_entry_path(raw: &Path) -> Option<PathBuf> {
    let mut clean = PathBuf::new();
    for component in raw.components() {
        if let Component::Normal(part) = component {
            clean.push(part);
        }
    }
    if clean.as_os_str().is_empty() {
        None
    } else {
        Some(clean)
    }
}
