use anyhow::Result;
use famcal_core::config::Config;
use famcal_core::event::{Category, EventDraft, Owner, Provenance, default_end};
use famcal_core::store::EventStore;
use famcal_core::sync::SyncController;
use owo_colors::OwoColorize;

use crate::commands::when;
use crate::render;

pub async fn run(
    config: &Config,
    title: String,
    start: String,
    end: Option<String>,
    category: Option<Category>,
    owner: Option<Owner>,
    location: Option<String>,
    notes: Option<String>,
) -> Result<()> {
    let start = when::parse_when(&start)?;
    let end = match end {
        Some(input) => when::parse_end(&input, start)?,
        None => default_end(start),
    };

    let draft = EventDraft {
        title,
        start,
        end,
        category: category.unwrap_or_default(),
        owner: owner.unwrap_or(config.default_owner),
        description: notes.filter(|n| !n.is_empty()),
        location: location.filter(|l| !l.is_empty()),
        provenance: Provenance::Manual,
    };

    let mut sync = SyncController::new(EventStore::new(&config.server_url));

    let spinner = render::create_spinner("Saving event".to_string());
    let result = sync.create(draft).await;
    spinner.finish_and_clear();

    let created = result?;
    println!(
        "{}",
        format!("Created: {} ({})", created.title, created.id).green()
    );

    Ok(())
}
