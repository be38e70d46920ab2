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

//! Genre tag extraction.
//!
//! The sorter only needs one thing from an audio file: the ordered list of
//! genre strings stored in its ID3 tag. [`TagReader`] is the seam between the
//! classifier and whatever parses the container; [`LoftyTagReader`] is the
//! real implementation backed by `Lofty`.
//!
//! The container type is always chosen by the caller from the file name and
//! forced on the parser, it is never guessed from the file extension.

use std::{
    fs::File,
    io::{self, BufReader},
    path::Path,
};

use lofty::config::ParseOptions;
use lofty::error::LoftyError;
use lofty::file::{FileType, TaggedFile};
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag, TagType};
use thiserror::Error;

/// Reasons a genre could not be read from a file.
#[derive(Error, Debug)]
pub(crate) enum TagError {
    #[error("cannot open file: {0}")]
    Io(#[from] io::Error),

    #[error("cannot parse container: {0}")]
    Lofty(#[from] LoftyError),

    #[error("no ID3 tag present")]
    NoTag,

    #[error("tag has no genre")]
    NoGenre,
}

/// Metadata extraction entry points used by the classifier.
pub(crate) trait TagReader {
    /// Reads the text list of the `TCON` frame of an AIFF file's ID3 chunk.
    fn aiff_genres(&self, path: &Path) -> Result<Vec<String>, TagError>;

    /// Reads the genre list of an MPEG audio file's ID3 tag.
    fn mp3_genres(&self, path: &Path) -> Result<Vec<String>, TagError>;
}

/// [`TagReader`] backed by `Lofty`.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct LoftyTagReader;

impl LoftyTagReader {
    fn read_as(path: &Path, file_type: FileType) -> Result<TaggedFile, TagError> {
        let reader = BufReader::new(File::open(path)?);

        // Only tags are needed, skip decoding stream properties.
        let tagged_file = Probe::new(reader)
            .set_file_type(file_type)
            .options(ParseOptions::new().read_properties(false))
            .read()?;

        Ok(tagged_file)
    }
}

impl TagReader for LoftyTagReader {
    fn aiff_genres(&self, path: &Path) -> Result<Vec<String>, TagError> {
        let tagged_file = Self::read_as(path, FileType::Aiff)?;
        let tag = tagged_file.tag(TagType::Id3v2).ok_or(TagError::NoTag)?;

        genres(tag)
    }

    fn mp3_genres(&self, path: &Path) -> Result<Vec<String>, TagError> {
        let tagged_file = Self::read_as(path, FileType::Mpeg)?;
        let tag = tagged_file
            .tag(TagType::Id3v2)
            .or_else(|| tagged_file.tag(TagType::Id3v1))
            .ok_or(TagError::NoTag)?;

        genres(tag)
    }
}

fn genres(tag: &Tag) -> Result<Vec<String>, TagError> {
    let genres: Vec<String> = tag
        .get_strings(ItemKey::Genre)
        .map(str::to_string)
        .collect();

    if genres.is_empty() {
        return Err(TagError::NoGenre);
    }

    Ok(genres)
}


#[cfg(test)]
mod tests {
    use std::fs;

    use super::testing::{aiff_with_genre, id3v2_genre_tag, mp3_with_genre, mp3_with_id3v1_genre};
    use super::*;
    use tempfile::TempDir;

    fn write(temp: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = temp.path().join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn reads_mp3_id3v2_genre() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "a.mp3", &mp3_with_genre("Jazz"));

        assert_eq!(LoftyTagReader.mp3_genres(&path).unwrap(), vec!["Jazz"]);
    }

    #[test]
    fn mp3_falls_back_to_id3v1() {
        let temp = TempDir::new().unwrap();
        // Genre number 8 is Jazz in the ID3v1 list.
        let path = write(&temp, "old.mp3", &mp3_with_id3v1_genre(8));

        assert_eq!(LoftyTagReader.mp3_genres(&path).unwrap(), vec!["Jazz"]);
    }

    #[test]
    fn reads_aiff_tcon_text() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "b.aif", &aiff_with_genre("Funk/Soul"));

        assert_eq!(LoftyTagReader.aiff_genres(&path).unwrap(), vec!["Funk/Soul"]);
    }

    #[test]
    fn multi_value_genre_keeps_order() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "multi.mp3", &mp3_with_genre("House\0Techno"));

        let genres = LoftyTagReader.mp3_genres(&path).unwrap();
        assert_eq!(genres.first().map(String::as_str), Some("House"));
    }

    #[test]
    fn mp3_type_is_forced_regardless_of_extension() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "a.mp3.backup", &mp3_with_genre("Jazz"));

        assert_eq!(LoftyTagReader.mp3_genres(&path).unwrap(), vec!["Jazz"]);
    }

    #[test]
    fn tag_without_audio_frames_is_unreadable() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "tag-only.mp3", &id3v2_genre_tag("Jazz"));

        assert!(LoftyTagReader.mp3_genres(&path).is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let temp = TempDir::new().unwrap();
        let result = LoftyTagReader.mp3_genres(&temp.path().join("absent.mp3"));

        assert!(matches!(result, Err(TagError::Io(_))));
    }

    #[test]
    fn io_error_message_names_the_cause() {
        let err = TagError::from(io::Error::new(io::ErrorKind::PermissionDenied, "access denied"));

        assert_eq!(err.to_string(), "cannot open file: access denied");
    }

    #[test]
    fn garbage_aiff_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "noise.aif", b"this is not an aiff container");

        assert!(LoftyTagReader.aiff_genres(&path).is_err());
    }

    #[test]
    fn empty_mp3_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "empty.mp3", b"");

        assert!(LoftyTagReader.mp3_genres(&path).is_err());
    }
}
