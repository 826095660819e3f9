use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "recsync", about = "Browse and triage cloud-security recommendations")]
pub struct Cli {
    /// Only log errors
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
    /// Log debug output
    #[arg(long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session token
    Login { email: String, password: String },
    /// Create an account
    Register {
        username: String,
        email: String,
        password: String,
    },
    /// Forget the stored session token
    Logout,
    /// Show whether a session token is available
    Status,
    /// List recommendations page by page
    List {
        /// Read the archived list instead of the active one
        #[arg(long)]
        archived: bool,
        /// Free-text search
        #[arg(long, default_value = "")]
        search: String,
        /// Tag filter (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Maximum number of pages to load
        #[arg(long, default_value = "1")]
        pages: usize,
    },
    /// Show the filter tags offered for a list
    Tags {
        #[arg(long)]
        archived: bool,
    },
    /// Archive a recommendation
    Archive { id: String },
    /// Restore an archived recommendation
    Unarchive { id: String },
}
