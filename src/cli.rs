use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "fsnav")]
#[command(about = "A TUI for browsing a remote file-system tree over its REST API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Where to fetch from and how. Shared by every subcommand that talks to
/// a listing service.
#[derive(Debug, Clone, Default, PartialEq, Args)]
pub struct ConnectionArgs {
    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Base URL of the REST API (e.g. http://localhost:8080/api)
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    /// Bearer token sent with every request
    #[arg(long, global = true)]
    pub token: Option<String>,
    /// Rows per page of the root listing
    #[arg(long, global = true)]
    pub page_size: Option<usize>,
    /// Serve the tree from a local JSON file instead of the REST API
    #[arg(long, global = true)]
    pub fixture: Option<String>,
}

#[derive(Debug, PartialEq, Subcommand)]
pub enum Commands {
    /// Run the interactive TUI (default)
    Run,
    /// Load the listing, optionally descend a path, and print the state as JSON
    Snapshot {
        /// Directory path to descend, `/`-separated (e.g. "docs/2024")
        #[arg(short, long)]
        path: Option<String>,
        /// Output file for the state (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
        /// Log debug output to stderr
        #[arg(short, long)]
        verbose: bool,
    },
    /// Render a saved state JSON to text
    Screenshot {
        /// Path to the state JSON produced by `snapshot`
        #[arg(short, long)]
        state: String,
        /// Output file for the screenshot (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
        /// Terminal width for rendering
        #[arg(long, default_value = "100")]
        width: u16,
        /// Terminal height for rendering
        #[arg(long, default_value = "30")]
        height: u16,
    },
}
