//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::selection::Filter;

/// Top-level CLI parser for `trailpack`.
#[derive(Debug, Parser)]
#[command(name = "trailpack", version, about = "Resolve setup audit trail entries into a deployment manifest")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch and list audit trail entries.
    Entries {
        /// Restrict the listing to created or updated entries.
        #[arg(long, value_enum)]
        filter: Option<FilterArg>,
    },
    /// Resolve selected entries and emit a package manifest.
    Resolve {
        /// Comma-separated entry ids to select (default: everything visible).
        #[arg(long, value_delimiter = ',')]
        ids: Vec<String>,
        /// Restrict the selection view to created or updated entries.
        #[arg(long, value_enum)]
        filter: Option<FilterArg>,
        /// Write the manifest to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Filter choices exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    /// Only entries whose change created a component.
    Created,
    /// Only entries whose change modified a component.
    Updated,
}

impl FilterArg {
    /// The selection-layer filter for this argument, `All` when absent.
    #[must_use]
    pub fn to_filter(arg: Option<Self>) -> Filter {
        match arg {
            None => Filter::All,
            Some(Self::Created) => Filter::Created,
            Some(Self::Updated) => Filter::Updated,
        }
    }
}
