use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Vendo - declarative source vendoring with drift tracking
#[derive(Parser, Debug)]
#[command(name = "vendo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the vendor configuration
    #[arg(long, default_value = "vendo.yaml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate the configuration and report destination conflicts
    Check {
        /// Treat conflicts as fatal (CI mode)
        #[arg(long)]
        strict: bool,
    },

    /// Report local drift of vendored files against the lockfile
    Status {
        /// Only report this source
        #[arg(long)]
        source: Option<String>,

        /// Project root containing vendored files and vendo.lock
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
}
