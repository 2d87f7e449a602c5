//! CLI commands module.

mod actions;
mod helpers;
mod schedule;
mod watch;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::{config, logging};

pub use actions::{cmd_clear_logs, cmd_containers, cmd_logs, cmd_run_now, cmd_save, SaveArgs};
pub use schedule::{cmd_schedule, ScheduleAction};
pub use watch::cmd_watch;

#[derive(Parser)]
#[command(name = "guardian", about = "guardian - container update dashboard")]
struct Cli {
    /// Config file (defaults to ~/.guardian/config.json).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List running containers known to the backend.
    Containers {
        /// Case-insensitive filter on name, image or id.
        #[arg(short, long)]
        query: Option<String>,

        /// Page to show, starting at 1.
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },

    /// Encode, decode or preview update schedules.
    Schedule {
        #[command(subcommand)]
        action: ScheduleAction,
    },

    /// Assemble a configuration document and save it on the backend.
    Save(SaveArgs),

    /// Start an update run, or move a single container to a tag.
    RunNow {
        /// Container to update; requires --tag.
        #[arg(long, requires = "tag")]
        name: Option<String>,

        /// Target image tag.
        #[arg(long, requires = "name")]
        tag: Option<String>,
    },

    /// Show the backend update log.
    Logs {
        /// Minimum level: info, success, warning or error.
        #[arg(short, long)]
        level: Option<String>,

        /// Only lines containing this text.
        #[arg(short, long)]
        grep: Option<String>,
    },

    /// Clear the backend update log.
    ClearLogs,

    /// Follow the update log and container list until Ctrl+C.
    Watch,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut cfg = config::load_config(cli.config.as_deref())?;
    cfg.apply_env_overrides();
    logging::init_logging(&cfg)?;

    match cli.command {
        Commands::Containers { query, page } => cmd_containers(&cfg, query, page).await,
        Commands::Schedule { action } => cmd_schedule(&cfg, action),
        Commands::Save(args) => cmd_save(&cfg, args).await,
        Commands::RunNow { name, tag } => cmd_run_now(&cfg, name.zip(tag)).await,
        Commands::Logs { level, grep } => cmd_logs(&cfg, level, grep).await,
        Commands::ClearLogs => cmd_clear_logs(&cfg).await,
        Commands::Watch => cmd_watch(&cfg).await,
    }
}
