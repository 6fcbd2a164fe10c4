use std::path::Path;

use anyhow::{Context, Result};
use famcal_core::config::Config;
use famcal_core::store::EventStore;
use owo_colors::OwoColorize;

use crate::render;

pub async fn run(config: &Config, out: &Path) -> Result<()> {
    let store = EventStore::new(&config.server_url);

    let spinner = render::create_spinner("Fetching events".to_string());
    let result = store.list().await;
    spinner.finish_and_clear();

    let events = result?;
    let json = serde_json::to_string_pretty(&events)?;
    std::fs::write(out, json).with_context(|| format!("Could not write {}", out.display()))?;

    println!(
        "{}",
        format!(
            "Exported {} to {}",
            render::count_events(events.len()),
            out.display()
        )
        .green()
    );

    Ok(())
}
