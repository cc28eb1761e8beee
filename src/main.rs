//! Main entry point for the drsx CLI application.
//!
//! Extracts or lists one or more DRS archives. Each archive is processed on
//! its own: a fatal error in one is reported and the next one still runs.

use anyhow::{Result, bail};
use clap::Parser;
use std::io::IsTerminal;
use std::path::Path;
use tracing::error;
use tracing_subscriber::EnvFilter;

use drsx::drs::output_dir_for;
use drsx::{Cli, SecondaryRegistry, extract_archive, list_archive};

/// Application entry point.
///
/// Parses command-line arguments, installs the log subscriber and runs every
/// archive through listing or extraction. Exits with an error if any archive
/// could not be processed.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let mut failed = 0usize;
    for archive in &cli.archives {
        let outcome = if cli.is_listing() {
            list_tables(archive, cli.verbose)
        } else {
            extract(archive, &cli)
        };

        if let Err(err) = outcome {
            error!(archive = %archive.display(), "{err:#}");
            failed += 1;
        }
    }

    if failed > 0 {
        bail!(
            "{failed} of {} archives could not be processed",
            cli.archives.len()
        );
    }

    Ok(())
}

/// Send diagnostics to stderr, filtered by `RUST_LOG` or the `-q` level.
fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

/// Extract a single archive below the configured extraction root.
///
/// Per-file problems are already logged by the extractor; they are summed up
/// here but do not fail the archive.
fn extract(archive: &Path, cli: &Cli) -> Result<()> {
    let secondary = if cli.no_secondary {
        SecondaryRegistry::new()
    } else {
        SecondaryRegistry::with_defaults()
    };

    let report = extract_archive(archive, &cli.extract_dir, secondary)?;

    if !cli.is_quiet() {
        println!(
            "{}: {} files ({}) extracted to {}",
            archive.display(),
            report.files_written,
            format_size(report.bytes_written),
            report.output_dir.display()
        );
        if !report.is_clean() {
            println!("  {} problems reported", report.failures.len());
        }
    }

    Ok(())
}

/// List the directory of an archive.
///
/// Supports two output formats:
/// - Table format (`-l`): one line per table
/// - Verbose format (`-v`): every file with its offset, size and output name
fn list_tables(path: &Path, verbose: bool) -> Result<()> {
    let archive = list_archive(path)?;

    println!("{}:", path.display());
    println!(
        "  {} {} ({})",
        archive.header.type_text(),
        archive.header.version_text(),
        archive.header.copyright_text()
    );

    if verbose {
        let dir = output_dir_for(path, Path::new(""));
        println!("{:>10}  {:>10}  {:>10}  Name", "Id", "Offset", "Size");
        println!("{}", "-".repeat(50));
        for table in &archive.tables {
            for entry in &table.entries {
                println!(
                    "{:>10}  {:>10}  {:>10}  {}",
                    entry.id,
                    entry.offset,
                    entry.size,
                    dir.join(entry.file_name(&table.extension)).display()
                );
            }
        }
        println!("{}", "-".repeat(50));
        println!(
            "{:>34}  {} files",
            format_size(archive.total_size()),
            archive.total_files()
        );
    } else {
        println!("{:>5}  {:>4}  {:>4}  {:>8}  {:>12}", "Table", "Tag", "Ext", "Files", "Size");
        for (index, table) in archive.tables.iter().enumerate() {
            println!(
                "{:>5}  {:>4}  {:>4}  {:>8}  {:>12}",
                index + 1,
                format_tag(table.tag),
                table.extension,
                table.num_files,
                format_size(table.total_size())
            );
        }
    }

    Ok(())
}

/// Render a table tag as its character when printable, hex otherwise.
fn format_tag(tag: u8) -> String {
    if tag.is_ascii_graphic() {
        (tag as char).to_string()
    } else {
        format!("{tag:#04x}")
    }
}

/// Format a byte size into a human-readable string.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_size(500), "500 bytes");
/// assert_eq!(format_size(1536), "1.50 KB");
/// assert_eq!(format_size(1048576), "1.00 MB");
/// ```
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
