use clap::Subcommand;

/// Document commands.
#[derive(Clone, Debug, Subcommand)]
pub enum DocumentCommands {
    /// Copy (or move) a file into the documents folder and register it.
    Add {
        file: String,
        /// Move instead of copy.
        #[arg(long = "move")]
        move_file: bool,
        /// Subfolder of the documents folder.
        #[arg(long)]
        dest: Option<String>,
    },
    /// Register new files found in the documents folder.
    Scan,
    /// List registered documents.
    List,
    /// Get a document with its links.
    Get {
        /// Relative path or ID.
        document: String,
    },
    /// Rename or move a document inside the documents folder.
    Rename {
        document: String,
        new_path: String,
    },
    /// Unregister a document.
    Remove {
        document: String,
        /// Also delete the file from disk.
        #[arg(long)]
        delete_file: bool,
    },
    /// Open a document in the system viewer.
    Open { document: String },
}
