//! In-memory DRS archive builder for tests.

use crate::drs::{COPYRIGHT_SIZE, FILE_ENTRY_SIZE, HEADER_SIZE, TABLE_DESCRIPTOR_SIZE};

struct FixtureTable {
    tag: u8,
    extension: [u8; 3],
    files: Vec<(u32, Vec<u8>)>,
}

/// Builds a well-formed archive: header, descriptors, entry records, then
/// payloads packed contiguously in directory order.
#[derive(Default)]
pub struct DrsBuilder {
    tables: Vec<FixtureTable>,
}

/// Deterministic payload bytes for file `id`.
pub fn payload(id: u32, size: u32) -> Vec<u8> {
    (0..size).map(|i| (id.wrapping_mul(31).wrapping_add(i) % 251) as u8).collect()
}

impl DrsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table of `(id, size)` files. `extension` is given the way it
    /// should read back; it is stored reversed.
    pub fn table(mut self, tag: u8, extension: &str, files: &[(u32, u32)]) -> Self {
        let ext = extension.as_bytes();
        self.tables.push(FixtureTable {
            tag,
            extension: [ext[2], ext[1], ext[0]],
            files: files.iter().map(|&(id, size)| (id, payload(id, size))).collect(),
        });
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let descriptors_end = HEADER_SIZE + self.tables.len() as u64 * TABLE_DESCRIPTOR_SIZE;
        let entry_count: u64 = self.tables.iter().map(|t| t.files.len() as u64).sum();
        let directory_end = descriptors_end + entry_count * FILE_ENTRY_SIZE;

        let mut out = Vec::new();
        let mut copyright = b"Copyright (c) 1997 Ensemble Studios.\x1a".to_vec();
        copyright.resize(COPYRIGHT_SIZE, 0);
        out.extend_from_slice(&copyright);
        out.extend_from_slice(b"1.00");
        out.extend_from_slice(b"tribe\0\0\0\0\0\0\0");
        out.extend_from_slice(&(self.tables.len() as u32).to_le_bytes());
        out.extend_from_slice(&(directory_end as u32).to_le_bytes());

        let mut table_offset = descriptors_end;
        for table in &self.tables {
            out.push(table.tag);
            out.extend_from_slice(&table.extension);
            out.extend_from_slice(&(table_offset as u32).to_le_bytes());
            out.extend_from_slice(&(table.files.len() as u32).to_le_bytes());
            table_offset += table.files.len() as u64 * FILE_ENTRY_SIZE;
        }

        let mut file_offset = directory_end;
        for table in &self.tables {
            for (id, data) in &table.files {
                out.extend_from_slice(&id.to_le_bytes());
                out.extend_from_slice(&(file_offset as u32).to_le_bytes());
                out.extend_from_slice(&(data.len() as u32).to_le_bytes());
                file_offset += data.len() as u64;
            }
        }

        for table in &self.tables {
            for (_, data) in &table.files {
                out.extend_from_slice(data);
            }
        }

        out
    }
}
