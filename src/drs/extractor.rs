use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{DrsError, Result};
use crate::io::{ByteStream, ensure_directory_exists};

use super::parser::{DrsParser, check_position};
use super::secondary::{SecondaryExtractor, SecondaryRegistry};
use super::structures::{DrsArchive, FileEntry};

/// What went wrong with a single output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    DirectoryCreate,
    OutputOpen,
    Write,
    Secondary,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::DirectoryCreate => "directory",
            Self::OutputOpen => "open",
            Self::Write => "write",
            Self::Secondary => "secondary",
        };
        f.write_str(text)
    }
}

/// A non-fatal problem recorded during extraction.
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub path: PathBuf,
    pub kind: FailureKind,
    pub message: String,
}

/// Outcome of extracting one archive that ran to completion.
#[derive(Debug, Clone)]
pub struct ExtractionReport {
    pub output_dir: PathBuf,
    pub files_written: usize,
    pub bytes_written: u64,
    pub failures: Vec<FileFailure>,
}

impl ExtractionReport {
    fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            files_written: 0,
            bytes_written: 0,
            failures: Vec::new(),
        }
    }

    fn record_failure(&mut self, path: &Path, kind: FailureKind, message: impl ToString) {
        let message = message.to_string();
        warn!(path = %path.display(), kind = %kind, "{message}");
        self.failures.push(FileFailure {
            path: path.to_path_buf(),
            kind,
            message,
        });
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn count(&self, kind: FailureKind) -> usize {
        self.failures.iter().filter(|f| f.kind == kind).count()
    }
}

/// DRS archive extractor
pub struct DrsExtractor<R: Read> {
    parser: DrsParser<R>,
    secondary: SecondaryRegistry,
}

impl<R: Read> DrsExtractor<R> {
    pub fn new(stream: ByteStream<R>) -> Self {
        Self {
            parser: DrsParser::new(stream),
            secondary: SecondaryRegistry::new(),
        }
    }

    /// Run `registry` on files whose table extension it recognizes.
    pub fn with_secondary(mut self, registry: SecondaryRegistry) -> Self {
        self.secondary = registry;
        self
    }

    /// Parse the directory without extracting anything.
    pub fn list_files(&mut self) -> Result<DrsArchive> {
        self.parser.read_archive()
    }

    /// Extract every entry into `output_dir` as `<id>.<extension>`.
    ///
    /// Per-file problems end up in the returned report. Errors returned here
    /// mean the archive could not be processed past that point.
    pub fn extract_to_dir(mut self, output_dir: &Path) -> Result<ExtractionReport> {
        let archive = self.parser.read_archive()?;
        let mut report = ExtractionReport::new(output_dir.to_path_buf());

        info!(
            tables = archive.tables.len(),
            files = archive.total_files(),
            dir = %output_dir.display(),
            "extracting"
        );
        if let Err(err) = ensure_directory_exists(output_dir) {
            report.record_failure(output_dir, FailureKind::DirectoryCreate, err);
        }

        for table in &archive.tables {
            info!(extension = %table.extension, files = table.num_files, "table");
            let secondary = self.secondary.find(&table.extension);

            for entry in &table.entries {
                let stream = self.parser.stream_mut();
                check_position(stream, u64::from(entry.offset), || {
                    format!("payload of file {} ({})", entry.id, table.extension)
                })?;

                let path = output_dir.join(entry.file_name(&table.extension));
                if write_entry(stream, entry, &path, &mut report)? {
                    report.files_written += 1;
                    report.bytes_written += u64::from(entry.size);
                    debug!(path = %path.display(), size = entry.size, "extracted");

                    if let Some(extractor) = secondary {
                        run_secondary(extractor, &path, &mut report);
                    }
                }
            }
        }

        Ok(report)
    }
}

/// Copy one payload to `path`. Returns `false` when the file could not be
/// written; the stream is still advanced past the payload in that case.
fn write_entry<R: Read>(
    stream: &mut ByteStream<R>,
    entry: &FileEntry,
    path: &Path,
    report: &mut ExtractionReport,
) -> Result<bool> {
    let size = u64::from(entry.size);
    let end = stream.position() + size;

    let file = match File::create(path) {
        Ok(file) => file,
        Err(source) => {
            let err = DrsError::OutputOpenFailed {
                path: path.to_path_buf(),
                source,
            };
            report.record_failure(path, FailureKind::OutputOpen, err);
            stream.skip(size)?;
            return Ok(false);
        }
    };

    let mut writer = BufWriter::new(file);
    let copied = stream
        .copy_to(&mut writer, size)
        .and_then(|_| writer.flush().map_err(DrsError::WriteFailed));

    match copied {
        Ok(()) => Ok(true),
        Err(DrsError::WriteFailed(source)) => {
            report.record_failure(path, FailureKind::Write, source);
            stream.skip(end - stream.position())?;
            Ok(false)
        }
        Err(err) => Err(err),
    }
}

fn run_secondary(extractor: &dyn SecondaryExtractor, path: &Path, report: &mut ExtractionReport) {
    if let Err(err) = extractor.extract(path) {
        report.record_failure(path, FailureKind::Secondary, format!("{err:#}"));
    }
}

/// Directory an archive is extracted into: `<root>/<archive stem>`.
pub fn output_dir_for(archive: &Path, extraction_root: &Path) -> PathBuf {
    let stem = archive
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "archive".into());
    extraction_root.join(stem)
}

/// Open the archive at `path` and extract it below `extraction_root`.
pub fn extract_archive(
    path: &Path,
    extraction_root: &Path,
    secondary: SecondaryRegistry,
) -> Result<ExtractionReport> {
    info!(archive = %path.display(), "reading");
    let stream = ByteStream::open(path)?;
    DrsExtractor::new(stream)
        .with_secondary(secondary)
        .extract_to_dir(&output_dir_for(path, extraction_root))
}

/// Open the archive at `path` and parse its directory.
pub fn list_archive(path: &Path) -> Result<DrsArchive> {
    let stream = ByteStream::open(path)?;
    DrsExtractor::new(stream).list_files()
}
