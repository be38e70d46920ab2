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

//! Domain types shared by discovery, classification and the copy driver.

use std::{
    ffi::{OsStr, OsString},
    fmt,
    path::{Path, PathBuf},
};

/// Name of the destination folder for files without usable genre metadata.
pub(crate) const UNKNOWN_DIR: &str = "UNKNOWN";

/// A regular file found beneath the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FileEntry {
    path: PathBuf,
    file_name: OsString,
}

impl FileEntry {
    /// Returns `None` if the path has no final file-name component.
    pub(crate) fn new(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let file_name = path.file_name()?.to_os_string();
        Some(Self { path, file_name })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn file_name(&self) -> &OsStr {
        &self.file_name
    }
}

/// Audio container families recognised from the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContainerKind {
    Aiff,
    Mpeg,
}

/// Genre metadata read from a single file.
///
/// When `genre` is present it is non-empty and already sanitized for use as a
/// directory name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct AudioMetadata {
    pub genre: Option<String>,
}

impl AudioMetadata {
    pub(crate) fn has_tag(&self) -> bool {
        self.genre.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum GenreLabel {
    Genre(String),
    Unknown,
}

impl GenreLabel {
    /// The destination folder name for this label.
    pub(crate) fn dir_name(&self) -> &str {
        match self {
            GenreLabel::Genre(genre) => genre,
            GenreLabel::Unknown => UNKNOWN_DIR,
        }
    }
}

impl fmt::Display for GenreLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Where a single source file is going to be copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Classification {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub label: GenreLabel,
}

impl Classification {
    /// The genre folder the destination lives in.
    pub(crate) fn destination_dir(&self) -> &Path {
        // Destinations are always built as `<root>/<label>/<basename>`.
        self.destination.parent().unwrap_or(&self.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_entry_requires_a_file_name() {
        assert!(FileEntry::new("/music/..").is_none());
        assert!(FileEntry::new("/").is_none());

        let entry = FileEntry::new("/music/a.mp3").unwrap();
        assert_eq!(entry.file_name(), "a.mp3");
        assert_eq!(entry.path(), Path::new("/music/a.mp3"));
    }

    #[test]
    fn unknown_label_uses_reserved_folder() {
        assert_eq!(GenreLabel::Unknown.to_string(), "UNKNOWN");
        assert_eq!(GenreLabel::Genre("Rock&Pop".into()).dir_name(), "Rock&Pop");
    }

    #[test]
    fn metadata_without_genre_has_no_tag() {
        assert!(!AudioMetadata::default().has_tag());
        assert!(AudioMetadata { genre: Some("Jazz".into()) }.has_tag());
    }
}
