mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use famcal_core::config::Config;
use famcal_core::event::{Category, Owner};

#[derive(Parser)]
#[command(name = "famcal")]
#[command(about = "Shared household calendar: import, edit, and sync family events")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show upcoming events, soonest first
    Agenda {
        /// Only this household member's events
        #[arg(short, long)]
        owner: Option<Owner>,

        /// Include events that already started
        #[arg(long)]
        all: bool,
    },
    /// Add a single event
    Add {
        title: String,

        /// Start date/time (e.g. "2025-11-29T10:00" or "saturday 3pm")
        #[arg(short, long)]
        start: String,

        /// End date/time, or a duration like "45m" (defaults to one hour)
        #[arg(short, long)]
        end: Option<String>,

        /// medical, wellness or other
        #[arg(short, long)]
        category: Option<Category>,

        /// Household member the event belongs to
        #[arg(short, long)]
        owner: Option<Owner>,

        /// Where it happens
        #[arg(short, long)]
        location: Option<String>,

        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Change fields of an existing event
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        /// New start date/time
        #[arg(long)]
        start: Option<String>,

        /// New end date/time, or a duration from the start
        #[arg(long)]
        end: Option<String>,

        #[arg(long)]
        category: Option<Category>,

        #[arg(long)]
        owner: Option<Owner>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete an event by id
    Delete {
        id: String,
    },
    /// Import events from .ics and .csv files, or from pasted text
    Import {
        /// Files to import
        files: Vec<PathBuf>,

        /// Import pasted text as a single note event instead
        #[arg(long, conflicts_with = "files")]
        text: Option<String>,

        /// Owner for every imported event
        #[arg(long)]
        owner: Option<Owner>,

        /// Category for every imported event
        #[arg(long)]
        category: Option<Category>,
    },
    /// Pull events from the configured read-only feed
    Pull,
    /// Write every stored event to a JSON backup file
    Export {
        /// Where to write the backup
        #[arg(short, long, default_value = "famcal-backup.json")]
        out: PathBuf,
    },
    /// Re-create events from a JSON backup file
    Restore {
        file: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::load()?;
    log::debug!("using event store at {}", config.server_url);

    match cli.command {
        Commands::Agenda { owner, all } => commands::agenda::run(&config, owner, all).await,
        Commands::Add {
            title,
            start,
            end,
            category,
            owner,
            location,
            notes,
        } => commands::add::run(&config, title, start, end, category, owner, location, notes).await,
        Commands::Edit {
            id,
            title,
            start,
            end,
            category,
            owner,
            location,
            notes,
        } => {
            commands::edit::run(
                &config, &id, title, start, end, category, owner, location, notes,
            )
            .await
        }
        Commands::Delete { id } => commands::delete::run(&config, &id).await,
        Commands::Import {
            files,
            text,
            owner,
            category,
        } => commands::import::run(&config, files, text, owner, category).await,
        Commands::Pull => commands::pull::run(&config).await,
        Commands::Export { out } => commands::export::run(&config, &out).await,
        Commands::Restore { file } => commands::restore::run(&config, &file).await,
    }
}
