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

//! Per-file genre classification.
//!
//! Decides, for one discovered file, which folder beneath the destination root
//! it belongs in. Classification never fails: any problem reading metadata
//! sends the file to the `UNKNOWN` folder.

use std::path::Path;

use tracing::{debug, warn};

use crate::{
    model::{AudioMetadata, Classification, ContainerKind, FileEntry, GenreLabel},
    tags::{TagError, TagReader},
};

/// Detects the container type from a file name.
///
/// Matching is a case-sensitive substring test, so `my.mp3.backup` is still
/// treated as MPEG. AIFF takes precedence when both markers appear.
pub(crate) fn container_kind(file_name: &str) -> Option<ContainerKind> {
    if file_name.contains(".aif") {
        Some(ContainerKind::Aiff)
    } else if file_name.contains(".mp3") {
        Some(ContainerKind::Mpeg)
    } else {
        None
    }
}

/// Makes a genre usable as a single directory name.
pub(crate) fn sanitize_genre(genre: &str) -> String {
    genre.replace('/', "&")
}

/// Reads and sanitizes the genre of a file, logging why it is unavailable.
pub(crate) fn read_metadata<R: TagReader + ?Sized>(reader: &R, entry: &FileEntry) -> AudioMetadata {
    let file_name = entry.file_name().to_string_lossy();

    let Some(kind) = container_kind(&file_name) else {
        debug!("{}: not an audio container", entry.path().display());
        return AudioMetadata::default();
    };

    match read_genre(reader, entry.path(), kind) {
        Ok(genre) => AudioMetadata { genre: Some(genre) },
        Err(e) => {
            warn!("{} does not have a usable ID3 tag: {}", entry.path().display(), e);
            AudioMetadata::default()
        }
    }
}

fn read_genre<R: TagReader + ?Sized>(
    reader: &R,
    path: &Path,
    kind: ContainerKind,
) -> Result<String, TagError> {
    let genres = match kind {
        ContainerKind::Aiff => reader.aiff_genres(path)?,
        ContainerKind::Mpeg => reader.mp3_genres(path)?,
    };

    let genre = genres
        .into_iter()
        .next()
        .filter(|genre| !genre.is_empty())
        .ok_or(TagError::NoGenre)?;

    // Anything that would not stay a single folder under the destination
    // root is as good as no genre at all.
    let genre = sanitize_genre(&genre);
    if genre == "." || genre == ".." {
        return Err(TagError::NoGenre);
    }

    Ok(genre)
}

/// Builds the destination for a file under `dest_root` using its genre.
pub(crate) fn classify<R: TagReader + ?Sized>(
    reader: &R,
    entry: &FileEntry,
    dest_root: &Path,
) -> Classification {
    let metadata = read_metadata(reader, entry);
    debug!(
        "{}: {:?}: {}",
        entry.path().display(),
        metadata.genre,
        metadata.has_tag()
    );

    let label = match metadata.genre {
        Some(genre) => GenreLabel::Genre(genre),
        None => GenreLabel::Unknown,
    };

    destination(entry, dest_root, label)
}

/// The fallback destination, `<dest_root>/UNKNOWN/<file name>`.
pub(crate) fn unknown_destination(entry: &FileEntry, dest_root: &Path) -> Classification {
    destination(entry, dest_root, GenreLabel::Unknown)
}

fn destination(entry: &FileEntry, dest_root: &Path, label: GenreLabel) -> Classification {
    let destination = dest_root.join(label.dir_name()).join(entry.file_name());

    Classification {
        source: entry.path().to_path_buf(),
        destination,
        label,
    }
}
