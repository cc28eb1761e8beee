//! # drsx
//!
//! Extracts the contents of DRS resource archives, the container format used
//! by classic real-time strategy games for their sprites, sounds and
//! interface data.
//!
//! Each archive is unpacked into `<root>/<archive name>/`, one file per entry,
//! named `<file id>.<table extension>`.
//!
//! ## Features
//!
//! - Single forward pass over the archive, no seeking
//! - Directory layout checks that stop on corrupted or misread archives
//! - Per-file failures are reported and skipped without losing position
//! - Pluggable follow-up processing for recognized sub-formats such as SLP
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use drsx::{SecondaryRegistry, extract_archive};
//!
//! fn main() -> anyhow::Result<()> {
//!     let report = extract_archive(
//!         Path::new("graphics.drs"),
//!         Path::new("extracted"),
//!         SecondaryRegistry::with_defaults(),
//!     )?;
//!     println!("{} files written", report.files_written);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod drs;
pub mod error;
pub mod io;

#[cfg(test)]
mod test_utils;

pub use cli::Cli;
pub use drs::{
    DrsArchive, DrsExtractor, ExtractionReport, SecondaryExtractor, SecondaryRegistry,
    extract_archive, list_archive,
};
pub use error::{DrsError, Result};
pub use io::ByteStream;
