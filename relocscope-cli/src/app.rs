use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use relocscope::reloc::{RelocationFilter, RelocationKind};

/// relocscope - PE header and base relocation inspector
#[derive(Debug, Parser)]
#[command(name = "relocscope", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Which relocations to list and how to lay them out.
#[derive(Debug, Args)]
pub struct RelocOptions {
    /// Relocation kind to list (absolute, high, low, highlow, highadj, armmov32, dir64).
    /// Repeatable. Defaults to dir64.
    #[arg(short, long = "kind", value_name = "KIND")]
    pub kinds: Vec<RelocationKind>,

    /// List every relocation kind, padding included.
    #[arg(long, conflicts_with = "kinds")]
    pub all: bool,

    /// Number of targets per output line.
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u16).range(1..))]
    pub per_line: u16,
}

impl RelocOptions {
    /// The kind filter selected on the command line.
    pub fn filter(&self) -> RelocationFilter {
        if self.all {
            RelocationFilter::all()
        } else if self.kinds.is_empty() {
            RelocationFilter::default()
        } else {
            self.kinds.iter().copied().collect()
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Display DOS, COFF and optional header fields.
    Headers {
        /// Path to the PE file.
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },

    /// List the section table.
    Sections {
        /// Path to the PE file.
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },

    /// List the data directory table.
    Directories {
        /// Path to the PE file.
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },

    /// Decode the base relocation directory of a PE file.
    Relocs {
        /// Path to the PE file.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        #[command(flatten)]
        options: RelocOptions,
    },

    /// Decode `.reloc` contents from `objdump -s` output.
    Dump {
        /// objdump output to read, `-` or nothing for stdin.
        #[arg(value_name = "FILE")]
        path: Option<PathBuf>,

        #[command(flatten)]
        options: RelocOptions,
    },
}
