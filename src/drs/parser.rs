//! Directory parser for DRS archives.
//!
//! The directory is read strictly front to back:
//! 1. The fixed 64-byte header
//! 2. `num_tables` table descriptors, packed right after the header
//! 3. For each table, `num_files` file-entry records starting at the
//!    table's recorded offset
//!
//! The stream never seeks. Wherever the directory records an offset, the
//! parser checks that the stream is already there and fails with
//! [`DrsError::LayoutInvariantViolation`] otherwise, since a gap or
//! overlap means the rest of the archive cannot be read safely.

use std::io::Read;
use tracing::debug;

use crate::error::{DrsError, Result};
use crate::io::ByteStream;

use super::structures::*;

/// Fail unless `stream` sits exactly at `expected`.
pub(crate) fn check_position<R: Read>(
    stream: &ByteStream<R>,
    expected: u64,
    context: impl FnOnce() -> String,
) -> Result<()> {
    let actual = stream.position();
    if actual != expected {
        return Err(DrsError::LayoutInvariantViolation {
            context: context(),
            expected,
            actual,
        });
    }
    Ok(())
}

/// Sequential DRS directory parser.
///
/// Owns the archive stream; after [`read_archive`](Self::read_archive) the
/// stream is positioned at the first payload byte and can be handed on to
/// the extractor.
pub struct DrsParser<R: Read> {
    stream: ByteStream<R>,
}

impl<R: Read> DrsParser<R> {
    pub fn new(stream: ByteStream<R>) -> Self {
        Self { stream }
    }

    /// Read the fixed header, enforcing that the declared table count fits
    /// in the archive.
    pub fn read_header(&mut self) -> Result<Header> {
        let header = Header::read(&mut self.stream)?;

        let needed = HEADER_SIZE + u64::from(header.num_tables) * TABLE_DESCRIPTOR_SIZE;
        let len = self.stream.len();
        if needed > len {
            return Err(DrsError::DirectoryOverrun {
                tables: header.num_tables,
                needed,
                len,
            });
        }

        Ok(header)
    }

    /// Read `count` table descriptors from the current position.
    pub fn read_table_descriptors(&mut self, count: u32) -> Result<Vec<TableDescriptor>> {
        let mut tables = Vec::with_capacity(count as usize);
        for index in 0..count {
            let table = TableDescriptor::read(&mut self.stream)?;
            debug!(
                index,
                extension = %table.extension,
                files = table.num_files,
                offset = table.offset,
                "table descriptor"
            );
            tables.push(table);
        }
        Ok(tables)
    }

    /// Fill every table's entry list, in table order.
    pub fn read_file_entries(&mut self, tables: &mut [TableDescriptor]) -> Result<()> {
        for (index, table) in tables.iter_mut().enumerate() {
            // Cap the reservation so a garbage count cannot allocate past the file
            let capacity =
                u64::from(table.num_files).min(self.stream.remaining() / FILE_ENTRY_SIZE);
            table.entries = Vec::with_capacity(capacity as usize);

            for n in 0..u64::from(table.num_files) {
                let expected = u64::from(table.offset) + n * FILE_ENTRY_SIZE;
                check_position(&self.stream, expected, || {
                    format!("file entry {n} of table {index} ({})", table.extension)
                })?;
                table.entries.push(FileEntry::read(&mut self.stream)?);
            }
        }
        Ok(())
    }

    /// Parse the header and the complete directory.
    pub fn read_archive(&mut self) -> Result<DrsArchive> {
        let header = self.read_header()?;
        let mut tables = self.read_table_descriptors(header.num_tables)?;

        let directory_end = HEADER_SIZE + u64::from(header.num_tables) * TABLE_DESCRIPTOR_SIZE;
        check_position(&self.stream, directory_end, || "table descriptors".to_string())?;

        self.read_file_entries(&mut tables)?;

        if self.stream.position() != u64::from(header.first_offset) {
            debug!(
                first_offset = header.first_offset,
                position = self.stream.position(),
                "header offset does not match end of directory"
            );
        }

        Ok(DrsArchive { header, tables })
    }

    pub fn stream(&self) -> &ByteStream<R> {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut ByteStream<R> {
        &mut self.stream
    }
}
