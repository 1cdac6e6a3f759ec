//! Command-line surface.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "selfcast",
    about = "Upload recorded radio broadcasts to a podcast backend"
)]
pub struct Cli {
    /// Files or directories to scan for recordings.
    #[arg(value_name = "FILE_OR_DIRECTORY")]
    pub paths: Vec<PathBuf>,

    /// Delete each file after a successful upload.
    #[arg(short, long)]
    pub delete: bool,

    /// Refresh episode descriptions from the broadcaster's schedule.
    /// Usable on its own, without any paths.
    #[arg(short = 'm', long)]
    pub update_metadata: bool,

    /// Keep watching the given paths and upload recordings as they appear.
    #[arg(short, long)]
    pub watch: bool,

    /// Channel name used when a filename carries no channel token.
    #[arg(short, long, value_name = "NAME")]
    pub channel: Option<String>,

    /// Schedule file overriding the built-in channel/program table.
    #[arg(long, value_name = "FILE")]
    pub schedule: Option<PathBuf>,
}
