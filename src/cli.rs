use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "codeintel-dashboard")]
#[command(about = "A terminal dashboard for the code intelligence status of a repository")]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run the interactive dashboard
    Run {
        /// Summary JSON file (bare summary or GraphQL response), `-` for stdin
        #[arg(short, long)]
        summary: PathBuf,
        /// Repository name shown in the header
        #[arg(short, long, default_value = "repository")]
        repo: String,
    },
    /// Print the dashboard as a plain-text outline
    Outline {
        /// Summary JSON file (bare summary or GraphQL response), `-` for stdin
        #[arg(short, long)]
        summary: PathBuf,
        /// Repository name shown in the header
        #[arg(short, long, default_value = "repository")]
        repo: String,
    },
    /// Build the collapsed directory tree for a list of paths
    Tree {
        /// Paths that carry data
        paths: Vec<String>,
        /// Emit the node list as JSON instead of an indented outline
        #[arg(long)]
        json: bool,
    },
    /// Render one frame of the dashboard as text
    Screenshot {
        /// Summary JSON file (bare summary or GraphQL response), `-` for stdin
        #[arg(short, long)]
        summary: PathBuf,
        /// Repository name shown in the header
        #[arg(short, long, default_value = "repository")]
        repo: String,
        /// Output file for the screenshot (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
        /// Terminal width for rendering
        #[arg(long, default_value = "120")]
        width: u16,
        /// Terminal height for rendering
        #[arg(long, default_value = "40")]
        height: u16,
    },
}
