//! DRS archive parsing and extraction.
//!
//! ## Architecture
//!
//! - [`structures`]: on-disk records (header, table descriptors, file entries)
//! - [`parser`]: sequential directory parser with layout checks
//! - [`extractor`]: payload pass writing each entry to its own file
//! - [`secondary`]: follow-up processing for recognized sub-formats
//!
//! ## DRS Format Overview
//!
//! All integers are 32-bit little-endian. A DRS file consists of:
//! 1. A 64-byte header: copyright text, version, archive type, table count
//!    and the offset of the first payload
//! 2. One 12-byte descriptor per table: a tag byte, the table's file
//!    extension stored reversed, the offset of its file entries and their count
//! 3. 12-byte file entries (id, offset, size) for each table in turn
//! 4. Payload bytes, packed in directory order
//!
//! Everything is read in a single forward pass. Offsets recorded in the
//! directory are checked against the read position instead of being seeked to.

mod extractor;
mod parser;
mod secondary;
mod structures;

pub use extractor::{
    DrsExtractor, ExtractionReport, FailureKind, FileFailure, extract_archive, list_archive,
    output_dir_for,
};
pub use parser::DrsParser;
pub use secondary::{SecondaryExtractor, SecondaryRegistry, SlpInspector};
pub use structures::*;
