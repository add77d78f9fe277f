use clap::{Parser, Subcommand};
use deal_capture::title::TitleFallback;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "deal-capture")]
#[command(about = "Capture link annotations from an open PDF viewer as PNG images plus a text manifest")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to a JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// WebDriver server URL (overrides WEBDRIVER_URL and the config file)
    #[arg(long, global = true)]
    pub webdriver_url: Option<String>,

    /// Directory receiving images and the manifest
    #[arg(short, long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Manifest file name
    #[arg(short, long, global = true)]
    pub manifest: Option<String>,

    /// Title used when an annotation has no title or text
    #[arg(long, value_enum, global = true)]
    pub title_fallback: Option<TitleFallback>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Capture every deal in the viewer
    Capture {
        /// URL of the PDF viewer page
        viewer_url: Option<String>,
    },

    /// Choose deals interactively, then capture them
    Select {
        /// URL of the PDF viewer page
        viewer_url: Option<String>,

        /// Render previews before choosing
        #[arg(short, long)]
        thumbnails: bool,
    },

    /// List the deals without capturing anything
    Scan {
        /// URL of the PDF viewer page
        viewer_url: Option<String>,

        /// Scan a saved viewer HTML file instead of a live browser
        #[arg(short, long, conflicts_with = "viewer_url")]
        snapshot: Option<PathBuf>,

        /// Base URL for resolving relative links in a snapshot
        #[arg(long, requires = "snapshot")]
        base_url: Option<String>,

        /// Print deals as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Command {
    /// The viewer URL given on the command line, if any
    pub fn viewer_url(&self) -> Option<&str> {
        match self {
            Command::Capture { viewer_url }
            | Command::Select { viewer_url, .. }
            | Command::Scan { viewer_url, .. } => viewer_url.as_deref(),
        }
    }
}
