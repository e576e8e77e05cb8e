use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Personal to-do manager with a terminal UI.
/// Storage defaults to ~/.taskdesk or a directory passed via --data-dir.
#[derive(Parser)]
#[command(name = "td", version, about = "Personal to-do manager")]
pub struct Cli {
    /// Directory holding tasks.json and darkMode.json.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Keep tasks in memory only for this session.
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Defaults to `ui` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}
