use clap::Subcommand;

/// Capture commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CaptureCommands {
    /// Store an image as the capture of a pair and mark it checked.
    Attach {
        item: String,
        document: String,
        image: String,
    },
}
