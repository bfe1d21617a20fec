use clap::Subcommand;

/// Checklist commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ChecklistCommands {
    /// Reconcile the stored checklist with a JSON definition.
    Sync {
        /// Definition file (defaults to the configured checklist file).
        #[arg(long)]
        file: Option<String>,
    },
    /// Write the stored checklist as a JSON definition.
    Export {
        /// Destination file (prints the definition when omitted).
        #[arg(long)]
        out: Option<String>,
    },
    /// Show the checklist hierarchy.
    Tree,
    /// Show or change the status of a check item.
    Status {
        /// Item path or ID.
        item: String,
        /// New status: pending, done, not_applicable.
        #[arg(long, conflicts_with = "advance")]
        set: Option<String>,
        /// Move to the next status in the cycle.
        #[arg(long)]
        advance: bool,
    },
}
