use anyhow::{Context, Result};
use famcal_core::config::Config;
use famcal_core::event::{Category, Owner};
use famcal_core::store::EventStore;
use famcal_core::sync::SyncController;
use owo_colors::OwoColorize;

use crate::commands::when;
use crate::render;

pub async fn run(
    config: &Config,
    id: &str,
    title: Option<String>,
    start: Option<String>,
    end: Option<String>,
    category: Option<Category>,
    owner: Option<Owner>,
    location: Option<String>,
    notes: Option<String>,
) -> Result<()> {
    let store = EventStore::new(&config.server_url);

    let spinner = render::create_spinner("Fetching event".to_string());
    let result = store.list().await;
    spinner.finish_and_clear();

    let events = result?;
    let current = events
        .iter()
        .find(|e| e.id == id)
        .with_context(|| format!("No event with id {id}"))?;

    let mut draft = current.to_draft();
    if let Some(title) = title {
        draft.title = title;
    }
    if let Some(input) = start {
        draft.start = when::parse_when(&input)?;
    }
    if let Some(input) = end {
        draft.end = when::parse_end(&input, draft.start)?;
    }
    if let Some(category) = category {
        draft.category = category;
    }
    if let Some(owner) = owner {
        draft.owner = owner;
    }
    // An empty string clears the field.
    if let Some(location) = location {
        draft.location = Some(location).filter(|l| !l.is_empty());
    }
    if let Some(notes) = notes {
        draft.description = Some(notes).filter(|n| !n.is_empty());
    }

    let mut sync = SyncController::new(store);

    let spinner = render::create_spinner("Saving changes".to_string());
    let result = sync.update(id, draft).await;
    spinner.finish_and_clear();

    let updated = result?;
    println!(
        "{}",
        format!("Updated: {} ({})", updated.title, updated.id).green()
    );

    Ok(())
}
