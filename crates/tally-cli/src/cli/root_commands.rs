use clap::{Args, Subcommand};

use crate::cli::subcommands::{CaptureCommands, ChecklistCommands, DocumentCommands, LinkCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Initialize a tally workspace.
    Init(InitArgs),
    /// Checklist definition and item status.
    Checklist {
        #[command(subcommand)]
        action: ChecklistCommands,
    },
    /// Registered documents.
    #[command(name = "doc", alias = "document")]
    Document {
        #[command(subcommand)]
        action: DocumentCommands,
    },
    /// Check item / document links.
    Link {
        #[command(subcommand)]
        action: LinkCommands,
    },
    /// Capture images attached to links.
    Capture {
        #[command(subcommand)]
        action: CaptureCommands,
    },
    /// Checklist overview with link counts.
    Status,
}

/// Arguments for `tally init`.
#[derive(Clone, Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing appsettings.json with defaults.
    #[arg(long)]
    pub force: bool,
}
