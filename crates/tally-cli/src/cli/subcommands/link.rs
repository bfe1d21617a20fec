use clap::Subcommand;

/// Link commands. Items and documents take a path or an ID.
#[derive(Clone, Debug, Subcommand)]
pub enum LinkCommands {
    /// Check a document against an item, linking it if needed.
    Check {
        item: String,
        document: String,
        /// Attach this image as the capture.
        #[arg(long, conflicts_with = "no_capture")]
        capture: Option<String>,
        /// Check without a capture.
        #[arg(long)]
        no_capture: bool,
    },
    /// Uncheck a linked document.
    Uncheck { item: String, document: String },
    /// Remove the link.
    Remove { item: String, document: String },
    /// List links, optionally for one item or one document.
    List {
        #[arg(long)]
        item: Option<String>,
        #[arg(long = "doc")]
        document: Option<String>,
    },
    /// Show the state code of a pair.
    State { item: String, document: String },
}
