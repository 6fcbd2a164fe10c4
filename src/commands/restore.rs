use std::path::Path;

use anyhow::{Context, Result};
use famcal_core::config::Config;
use famcal_core::event::Event;
use famcal_core::store::EventStore;
use famcal_core::sync::SyncController;
use owo_colors::OwoColorize;

use crate::render;

/// Events from the backup are re-created under fresh store ids; existing
/// events are left alone.
pub async fn run(config: &Config, file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Could not read {}", file.display()))?;
    let events: Vec<Event> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a famcal backup", file.display()))?;

    if events.is_empty() {
        println!("{}", "Backup holds no events".dimmed());
        return Ok(());
    }

    let mut sync = SyncController::new(EventStore::new(&config.server_url));

    let spinner = render::create_spinner(format!(
        "Restoring {}",
        render::count_events(events.len())
    ));
    let result = sync.import_batch(&events).await;
    spinner.finish_and_clear();

    let count = result?;
    println!(
        "{}",
        format!("Restored {}", render::count_events(count)).green()
    );

    Ok(())
}
