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

//! Copy orchestration.
//!
//! Discovers every file beneath the source root and copies each one into a
//! genre folder beneath the destination root. Only a bad source root or an
//! unusable destination root stops a run; every per-file problem is logged
//! and the run moves on to the next file.
//!
//! Re-running against the same destination is safe: a file whose destination
//! already exists is skipped, so a second run copies nothing.

use std::{
    fs::{self, File, OpenOptions},
    io::{self, Read},
    panic::{self, AssertUnwindSafe},
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
    classify,
    discover::{self, DiscoverError},
    model::{Classification, FileEntry, UNKNOWN_DIR},
    tags::TagReader,
};

/// Errors that abort a run before any file is copied.
#[derive(Error, Debug)]
pub(crate) enum OrganizeError {
    #[error(transparent)]
    Source(#[from] DiscoverError),

    #[error("cannot create destination directory {path}")]
    Destination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What happened to a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FileOutcome {
    Copied,
    SkippedExists,
    Failed,
}

/// Per-run tallies.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunReport {
    pub copied: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunReport {
    fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Copied => self.copied += 1,
            FileOutcome::SkippedExists => self.skipped += 1,
            FileOutcome::Failed => self.failed += 1,
        }
    }
}

/// Sorts every file beneath `source_root` into genre folders beneath
/// `dest_root`.
///
/// The `UNKNOWN` folder is created before the first file is processed.
/// Directories are created one level at a time, so `dest_root` may be created
/// but its parent must already exist.
///
/// # Errors
///
/// Returns an error if the source root is missing or not a directory, or if
/// the destination root or its `UNKNOWN` folder cannot be created.
pub(crate) fn run<R: TagReader + ?Sized>(
    reader: &R,
    source_root: &Path,
    dest_root: &Path,
) -> Result<RunReport, OrganizeError> {
    let files = discover::discover_files(source_root)?;
    info!("Found {} files under {}", files.len(), source_root.display());

    ensure_dir(dest_root).map_err(|source| OrganizeError::Destination {
        path: dest_root.to_path_buf(),
        source,
    })?;

    let unknown_dir = dest_root.join(UNKNOWN_DIR);
    ensure_dir(&unknown_dir).map_err(|source| OrganizeError::Destination {
        path: unknown_dir.clone(),
        source,
    })?;

    let mut report = RunReport::default();
    for entry in &files {
        report.record(process_file(reader, entry, dest_root));
    }

    debug!(
        "Run finished: {} copied, {} skipped, {} failed",
        report.copied, report.skipped, report.failed
    );

    Ok(report)
}

fn process_file<R: TagReader + ?Sized>(
    reader: &R,
    entry: &FileEntry,
    dest_root: &Path,
) -> FileOutcome {
    // A parser blowing up on one malformed file must not take the run down.
    let classified = panic::catch_unwind(AssertUnwindSafe(|| {
        classify::classify(reader, entry, dest_root)
    }));

    let classification = match classified {
        Ok(classification) => classification,
        Err(_) => {
            error!(
                "Classification of {} failed unexpectedly, using {}",
                entry.path().display(),
                UNKNOWN_DIR
            );
            classify::unknown_destination(entry, dest_root)
        }
    };

    info!(
        source = %classification.source.display(),
        dest = %classification.destination.display(),
        genre = %classification.label,
        "Sorting file"
    );

    let dir = classification.destination_dir();
    match ensure_dir(dir) {
        Ok(true) => info!("Created directory {}", dir.display()),
        Ok(false) => {}
        Err(e) => {
            error!("Cannot create directory {}: {}", dir.display(), e);
            return FileOutcome::Failed;
        }
    }

    copy_file(&classification)
}

fn copy_file(classification: &Classification) -> FileOutcome {
    let Classification {
        source,
        destination,
        ..
    } = classification;

    if destination.exists() {
        warn!("{} already exists, skipping", destination.display());
        return FileOutcome::SkippedExists;
    }

    match copy_new(source, destination) {
        Ok(bytes) => {
            debug!("Copied {} bytes to {}", bytes, destination.display());
            FileOutcome::Copied
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            warn!("{} already exists, skipping", destination.display());
            FileOutcome::SkippedExists
        }
        Err(e) => {
            error!(
                "Failed to copy {} to {}: {}",
                source.display(),
                destination.display(),
                e
            );
            FileOutcome::Failed
        }
    }
}

/// Copies `source` to `destination`, refusing to overwrite anything.
///
/// A partially written destination is removed so that a later run does not
/// mistake it for a completed copy.
fn copy_new(source: &Path, destination: &Path) -> io::Result<u64> {
    let mut input = File::open(source)?;
    write_new(&mut input, destination)
}

/// Streams `input` into a newly created `destination`.
fn write_new<R: Read + ?Sized>(input: &mut R, destination: &Path) -> io::Result<u64> {
    let mut output = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(destination)?;

    io::copy(input, &mut output).map_err(|e| {
        fs::remove_file(destination).ok();
        e
    })
}

/// Creates a single directory level unless it already exists.
///
/// Returns whether the directory was created.
fn ensure_dir(path: &Path) -> io::Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }

    match fs::create_dir(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(false),
        Err(e) => Err(e),
    }
}
