//! # taskdesk
//!
//! A single-user to-do manager. Tasks carry a category, a priority, an
//! optional due date and a description; the terminal UI shows a filter
//! drawer, an entry form and the task list with inline expand, edit and
//! delete.
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the UI
//! td
//!
//! # Add a task from the shell
//! td add "Buy milk" --category shopping --priority high
//!
//! # List today's tasks sorted by due date
//! td list --filter due-today --sort due-date
//! ```
//!
//! Data is stored in `~/.taskdesk/` (or `--data-dir`, or `$TASKDESK_DIR`) as
//! `tasks.json` and `darkMode.json`. Every change is written immediately.
//! Set `RUST_LOG=taskdesk=debug` to get logs on stderr.

use std::io;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub mod cli;
pub mod cmd;
pub mod config;
pub mod controller;
pub mod dates;
pub mod error;
pub mod fields;
pub mod form;
pub mod input;
pub mod persist;
pub mod storage;
pub mod store;
pub mod task;
pub mod view;
pub mod tui {
    pub mod app;
    pub mod enums;
    pub mod run;
    pub mod theme;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use config::Config;

fn init_logging() {
    // Opt-in via RUST_LOG; the UI owns the terminal otherwise.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| EnvFilter::try_new(raw.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let config = Config::resolve(cli.data_dir.as_deref(), cli.ephemeral);
    tracing::debug!(data_dir = %config.data_dir.display(), ephemeral = config.ephemeral, "starting");

    let result = match cli.command.unwrap_or(Commands::Ui) {
        Commands::Ui => cmd_ui(&config),
        Commands::Add { text, category, priority, due, desc } => open_store(&config).and_then(|mut store| {
            cmd_add(&mut store, text, category, priority, due, desc, today(), &mut io::stdout())
        }),
        Commands::List { filter, search, sort } => open_store(&config)
            .and_then(|store| cmd_list(&store, filter, search, sort, today(), &mut io::stdout())),
        Commands::Stats => open_store(&config).and_then(|store| cmd_stats(&store, today(), &mut io::stdout())),
        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
