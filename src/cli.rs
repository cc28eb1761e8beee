use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "drsx")]
#[command(version)]
#[command(about = "Extract files from DRS game resource archives", long_about = None)]
#[command(after_help = "Examples:\n  \
  drsx graphics.drs sounds.drs           extract both archives into ./extracted\n  \
  drsx -d out interfac.drs               extract into out/interfac/\n  \
  drsx -v graphics.drs                   list every file without extracting\n\n\
Set RUST_LOG (e.g. RUST_LOG=drsx=debug) for more detailed diagnostics.")]
pub struct Cli {
    /// DRS archive paths
    #[arg(value_name = "ARCHIVE", required = true)]
    pub archives: Vec<PathBuf>,

    /// Extract files below DIR
    #[arg(short = 'd', value_name = "DIR", default_value = "extracted")]
    pub extract_dir: PathBuf,

    /// List tables (short format)
    #[arg(short = 'l')]
    pub list: bool,

    /// List every file
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Do not post-process recognized formats such as SLP
    #[arg(long)]
    pub no_secondary: bool,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_listing(&self) -> bool {
        self.list || self.verbose
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet > 0
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        if self.is_very_quiet() {
            "error"
        } else if self.is_quiet() {
            "warn"
        } else {
            "info"
        }
    }
}
