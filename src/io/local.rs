use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::ByteStream;
use crate::error::{DrsError, Result};

impl ByteStream<BufReader<File>> {
    /// Open a local archive for sequential reading.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        Ok(Self::new(BufReader::new(file), len))
    }
}

/// Create `path` and any missing parents. Succeeds if it already exists as a directory.
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(path).map_err(|source| DrsError::DirectoryCreateFailed {
        path: path.to_path_buf(),
        source,
    })
}
