//! Command implementations for the CLI interface.
//!
//! Each subcommand opens the store once, performs one action, and prints a
//! short result. `ui` (the default) hands over to the terminal interface.

use std::io::{self, Write};

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::config::Config;
use crate::controller::Controller;
use crate::dates::{format_due_relative, parse_due_input};
use crate::error::{Error, Result};
use crate::fields::*;
use crate::persist::Persistence;
use crate::storage::{AnyStorage, Storage};
use crate::store::TaskStore;
use crate::task::{NewTask, Task};
use crate::view::{derive, Counts, ViewState};

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI (default).
    Ui,

    /// Add a new task.
    Add {
        /// Task title.
        text: String,
        /// Category; omitted means Other.
        #[arg(long, value_enum)]
        category: Option<Category>,
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", or "in Nd".
        #[arg(long)]
        due: Option<String>,
        /// Longer description.
        #[arg(long)]
        desc: Option<String>,
    },

    /// List tasks.
    List {
        /// all | high-priority | due-today | personal | work | shopping | health | other
        #[arg(long, value_parser = parse_filter, default_value = "all")]
        filter: ViewFilter,
        /// Case-insensitive title search.
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, value_enum, default_value_t = SortKey::Priority)]
        sort: SortKey,
    },

    /// Print task counts.
    Stats,

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_filter(s: &str) -> std::result::Result<ViewFilter, String> {
    ViewFilter::parse(s).ok_or_else(|| format!("unknown filter '{s}'"))
}

/// Open the configured store.
pub fn open_store(config: &Config) -> Result<TaskStore<AnyStorage>> {
    Ok(TaskStore::open(Persistence::new(config.open_storage()?)))
}

pub fn cmd_ui(config: &Config) -> Result<()> {
    let controller = Controller::new(open_store(config)?)
        .with_notification_timeout(config.notification_timeout);
    crate::tui::run::run_tui(controller)?;
    Ok(())
}

pub fn cmd_add<S: Storage>(
    store: &mut TaskStore<S>,
    text: String,
    category: Option<Category>,
    priority: Priority,
    due: Option<String>,
    desc: Option<String>,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<()> {
    let due_date = match due {
        Some(raw) => Some(
            parse_due_input(&raw, today)
                .ok_or_else(|| Error::InvalidArgument(format!("unrecognised due date '{raw}'")))?,
        ),
        None => None,
    };
    let draft = NewTask {
        text,
        category,
        priority,
        due_date,
        description: desc.unwrap_or_default(),
    };
    match store.add(draft) {
        Some(task) => writeln!(out, "Added task {}: {}", task.id, task.text)?,
        None => return Err(Error::InvalidArgument("task title cannot be empty".into())),
    }
    Ok(())
}

pub fn cmd_list<S: Storage>(
    store: &TaskStore<S>,
    filter: ViewFilter,
    search: String,
    sort: SortKey,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<()> {
    let state = ViewState { filter, search, sort };
    let view = derive(store.tasks(), &state, today);
    print_table(&view.tasks, today, out)?;
    writeln!(out, "{} of {} task(s)", view.len(), view.counts.total)?;
    Ok(())
}

pub fn cmd_stats<S: Storage>(store: &TaskStore<S>, today: NaiveDate, out: &mut impl Write) -> Result<()> {
    let counts = Counts::compute(store.tasks(), today);
    writeln!(out, "Total:         {}", counts.total)?;
    writeln!(out, "Completed:     {}", counts.completed)?;
    writeln!(out, "Overdue:       {}", counts.overdue)?;
    writeln!(out, "High priority: {}", counts.high_priority)?;
    writeln!(out, "Due today:     {}", counts.due_today)?;
    for category in Category::ALL {
        writeln!(out, "  {:<12}{}", category.label(), counts.in_category(category))?;
    }
    Ok(())
}

pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut io::stdout());
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[&Task], today: NaiveDate, out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "{:<14} {:<4} {:<8} {:<9} {:<10} {}",
        "ID", "Done", "Priority", "Category", "Due", "Title"
    )?;
    for t in tasks {
        writeln!(
            out,
            "{:<14} {:<4} {:<8} {:<9} {:<10} {}",
            t.id,
            if t.completed { "x" } else { "" },
            t.priority.label(),
            t.category.label(),
            format_due_relative(t.due_date, today),
            t.text
        )?;
    }
    Ok(())
}

/// Today's date in local time.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
