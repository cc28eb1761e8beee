//! Follow-up processing for extracted files of known sub-formats.
//!
//! After a payload has been written, the extractor looks up the owning
//! table's extension in a [`SecondaryRegistry`] and hands the output path to
//! the matching [`SecondaryExtractor`]. A failure there is reported against
//! that file only.

use anyhow::{Result, bail};
use std::path::Path;
use tracing::info;

use crate::io::ByteStream;

/// Processor for one sub-format found inside archives.
pub trait SecondaryExtractor {
    /// Table extension this extractor handles, compared case-sensitively.
    fn extension(&self) -> &str;

    /// Process a freshly written output file.
    fn extract(&self, path: &Path) -> Result<()>;
}

/// Set of secondary extractors keyed by extension.
#[derive(Default)]
pub struct SecondaryRegistry {
    extractors: Vec<Box<dyn SecondaryExtractor>>,
}

impl SecondaryRegistry {
    /// Empty registry: nothing runs after extraction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in extractors.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(SlpInspector);
        registry
    }

    /// Add an extractor. A later registration for the same extension wins.
    pub fn register(&mut self, extractor: impl SecondaryExtractor + 'static) {
        self.extractors.push(Box::new(extractor));
    }

    pub fn find(&self, extension: &str) -> Option<&dyn SecondaryExtractor> {
        self.extractors
            .iter()
            .rev()
            .find(|e| e.extension() == extension)
            .map(|e| e.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

/// SLP header - 32 bytes (version, frame count, comment)
const SLP_HEADER_SIZE: u64 = 32;

/// Reads the header of an extracted SLP sprite and logs what it holds.
pub struct SlpInspector;

impl SecondaryExtractor for SlpInspector {
    fn extension(&self) -> &str {
        "slp"
    }

    fn extract(&self, path: &Path) -> Result<()> {
        let mut stream = ByteStream::open(path)?;
        if stream.len() < SLP_HEADER_SIZE {
            bail!(
                "SLP file {} is too small: only {} bytes long",
                path.display(),
                stream.len()
            );
        }

        let version = stream.read_array::<4>()?;
        let num_frames = stream.read_u32()?;
        let _comment = stream.read_array::<24>()?;

        let version = String::from_utf8_lossy(&version);
        info!(
            path = %path.display(),
            version = %version.trim_end_matches('\0'),
            frames = num_frames,
            "sprite"
        );

        Ok(())
    }
}
