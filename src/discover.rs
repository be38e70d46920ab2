// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Source tree discovery.
//!
//! Walks the source directory with `WalkDir` and collects every regular file
//! beneath it. Symbolic links are never followed and never reported, so a link
//! cycle in the source tree cannot trap the walk.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::warn;
use walkdir::WalkDir;

use crate::model::FileEntry;

/// Failure to use the source root. Always fatal for a run.
#[derive(Error, Debug)]
pub(crate) enum DiscoverError {
    #[error("source path not found: {0}")]
    NotFound(PathBuf),

    #[error("source path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("cannot access source path {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Recursively collects the regular files beneath `root`.
///
/// The returned paths are absolute. Within each directory entries are visited
/// in file-name order; directories, symbolic links and special files are not
/// included. Entries that cannot be read are logged and skipped.
///
/// # Errors
///
/// Returns an error if `root` does not exist, is not a directory, or cannot be
/// resolved to an absolute path.
pub(crate) fn discover_files(root: &Path) -> Result<Vec<FileEntry>, DiscoverError> {
    let root = validate_root(root)?;

    let mut files = Vec::new();

    for entry in WalkDir::new(&root).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        if let Some(file) = FileEntry::new(entry.into_path()) {
            files.push(file);
        }
    }

    Ok(files)
}

fn validate_root(root: &Path) -> Result<PathBuf, DiscoverError> {
    let io_error = |source| DiscoverError::Io {
        path: root.to_path_buf(),
        source,
    };

    let metadata = match fs::metadata(root) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(DiscoverError::NotFound(root.to_path_buf()));
        }
        Err(e) => return Err(io_error(e)),
    };

    if !metadata.is_dir() {
        return Err(DiscoverError::NotADirectory(root.to_path_buf()));
    }

    fs::canonicalize(root).map_err(io_error)
}
