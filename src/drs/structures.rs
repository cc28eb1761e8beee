use std::io::Read;

use crate::error::{DrsError, Result};
use crate::io::ByteStream;

pub const COPYRIGHT_SIZE: usize = 40;
pub const VERSION_SIZE: usize = 4;
pub const TYPE_SIZE: usize = 12;

/// Header - 64 bytes (copyright, version, type, table count, first offset)
pub const HEADER_SIZE: u64 = (COPYRIGHT_SIZE + VERSION_SIZE + TYPE_SIZE) as u64 + 8;

/// Table descriptor - 12 bytes (tag, reversed extension, offset, file count)
pub const TABLE_DESCRIPTOR_SIZE: u64 = 12;

/// File entry - 12 bytes (id, offset, size)
pub const FILE_ENTRY_SIZE: u64 = 12;

/// Fixed archive header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub copyright: [u8; COPYRIGHT_SIZE],
    pub version: [u8; VERSION_SIZE],
    pub archive_type: [u8; TYPE_SIZE],
    pub num_tables: u32,
    pub first_offset: u32,
}

impl Header {
    /// Read the header from the start of `stream`.
    ///
    /// Fails with [`DrsError::TooSmall`] before consuming anything if fewer
    /// than [`HEADER_SIZE`] bytes remain.
    pub fn read<R: Read>(stream: &mut ByteStream<R>) -> Result<Self> {
        let found = stream.remaining();
        if found < HEADER_SIZE {
            return Err(DrsError::TooSmall {
                found,
                required: HEADER_SIZE,
            });
        }

        Ok(Self {
            copyright: stream.read_array()?,
            version: stream.read_array()?,
            archive_type: stream.read_array()?,
            num_tables: stream.read_u32()?,
            first_offset: stream.read_u32()?,
        })
    }

    pub fn copyright_text(&self) -> String {
        display_text(&self.copyright)
    }

    pub fn version_text(&self) -> String {
        display_text(&self.version)
    }

    pub fn type_text(&self) -> String {
        display_text(&self.archive_type)
    }
}

/// Render a fixed-width text field, dropping NUL padding and the trailing
/// EOF marker some archives carry.
fn display_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches(|c: char| c == '\0' || c == '\x1a' || c.is_whitespace())
        .to_string()
}

/// One table of the directory: a group of files sharing an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    /// Category byte stored ahead of the extension.
    pub tag: u8,
    /// File extension, already un-reversed.
    pub extension: String,
    /// Archive offset of this table's file-entry records.
    pub offset: u32,
    pub num_files: u32,
    /// Entries in directory order, filled by the file-entry pass.
    pub entries: Vec<FileEntry>,
}

impl TableDescriptor {
    pub fn read<R: Read>(stream: &mut ByteStream<R>) -> Result<Self> {
        let tag = stream.read_u8()?;

        // Extensions are stored back to front ("pls" on disk is "slp")
        let mut extension = stream.read_array::<3>()?;
        extension.swap(0, 2);

        Ok(Self {
            tag,
            extension: String::from_utf8_lossy(&extension).into_owned(),
            offset: stream.read_u32()?,
            num_files: stream.read_u32()?,
            entries: Vec::new(),
        })
    }

    /// Payload bytes held by this table.
    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.size)).sum()
    }
}

/// Directory record for a single stored file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileEntry {
    pub id: u32,
    pub offset: u32,
    pub size: u32,
}

impl FileEntry {
    pub fn read<R: Read>(stream: &mut ByteStream<R>) -> Result<Self> {
        Ok(Self {
            id: stream.read_u32()?,
            offset: stream.read_u32()?,
            size: stream.read_u32()?,
        })
    }

    /// Output file name: `<id>.<extension>`.
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.id, extension)
    }
}

/// Fully parsed directory of one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrsArchive {
    pub header: Header,
    pub tables: Vec<TableDescriptor>,
}

impl DrsArchive {
    pub fn total_files(&self) -> usize {
        self.tables.iter().map(|t| t.entries.len()).sum()
    }

    pub fn total_size(&self) -> u64 {
        self.tables.iter().map(TableDescriptor::total_size).sum()
    }
}
