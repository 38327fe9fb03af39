//! Mirrors the static asset tree into the output directory. Assets are
//! optional: a missing source directory is reported as
//! [`CopyOutcome::SourceAbsent`] rather than as an error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// The result of a successful [`copy_assets`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyOutcome {
    /// The source directory doesn't exist; nothing was copied.
    SourceAbsent,

    /// The tree was mirrored. `files` counts copied files.
    Copied { files: usize },
}

/// Recreates the directory structure of `src` under `dst` and copies every
/// file byte-for-byte. Only a missing `src` is tolerated; any other failure,
/// including one partway through the copy, is returned.
pub fn copy_assets(src: &Path, dst: &Path) -> Result<CopyOutcome> {
    match fs::metadata(src) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Ok(CopyOutcome::SourceAbsent)
        }
        Err(err) => {
            return Err(Error::Io {
                path: src.to_owned(),
                err,
            })
        }
        Ok(meta) if !meta.is_dir() => return Err(Error::NotADirectory(src.to_owned())),
        Ok(_) => {}
    }

    let mut files = 0;
    for result in WalkDir::new(src).follow_links(true).sort_by_file_name() {
        let entry = result?;
        let relative = entry.path().strip_prefix(src).unwrap(); // `src` is always an ancestor
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|err| Error::Io {
                path: target.clone(),
                err,
            })?;
        } else {
            fs::copy(entry.path(), &target).map_err(|err| Error::Io {
                path: entry.path().to_owned(),
                err,
            })?;
            debug!(asset = %relative.display(), "copied asset");
            files += 1;
        }
    }

    Ok(CopyOutcome::Copied { files })
}

/// The result of an asset-copy operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error copying assets.
#[derive(Debug, Error)]
pub enum Error {
    /// Returned when the asset path exists but isn't a directory.
    #[error("Asset source '{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// Returned for I/O failures on a specific path.
    #[error("Copying asset '{}': {err}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        err: io::Error,
    },

    /// Returned for errors while traversing the asset tree.
    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),
}
