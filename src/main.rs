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

//! # Genre Sorter.
//!
//! Sorts a collection of music files into folders named after the genre
//! stored in their ID3 tags.
//!
//! The source directory is crawled recursively. Every MP3 and AIFF file with a
//! readable genre is copied to `<dest>/<genre>/<file name>`, everything else
//! goes to `<dest>/UNKNOWN/<file name>`. Source files are never modified, and
//! files already present at their destination are left alone, so a run can be
//! repeated safely.
//!
//! ## Exit status
//!
//! `0` once every file has been considered, `1` if the run could not start
//! (bad source directory, unusable destination, unreadable configuration).

mod classify;
mod config;
mod discover;
mod model;
mod organize;
mod tags;

use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{config::AppConfig, tags::LoftyTagReader};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "genre-sorter", version)]
#[command(about = "Separates a collection of music files into folders based on the \
                   ID3 genre tags in MP3 and AIFF files")]
struct Args {
    /// Configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Path of root directory to copy files to
    #[arg(short, long = "dest-path", value_name = "DEST_PATH")]
    dest_path: PathBuf,

    /// Path to crawl for audio files
    #[arg(short, long = "source-path", value_name = "SOURCE_PATH")]
    source_path: PathBuf,
}

/// The entry point of the application.
///
/// Fatal errors are reported on stderr, logging may not be set up yet when
/// they happen.
fn main() -> ExitCode {
    let args = Args::parse();

    ExitCode::from(exit_status(run(args)))
}

/// Maps the outcome of a run to the process exit status.
fn exit_status(result: Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("error: {:#}", e);
            1
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref())?;

    init_logging(&config);

    organize::run(&LoftyTagReader, &args.source_path, &args.dest_path).with_context(|| {
        format!(
            "Failed to sort {} into {}",
            args.source_path.display(),
            args.dest_path.display()
        )
    })?;

    Ok(())
}

/// Installs the log subscriber, `RUST_LOG` overrides the configured level.
///
/// A subscriber that is already installed is kept.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
        .ok();
}
