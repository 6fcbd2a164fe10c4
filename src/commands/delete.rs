use anyhow::Result;
use famcal_core::config::Config;
use famcal_core::store::{DeleteOutcome, EventStore};
use famcal_core::sync::SyncController;
use owo_colors::OwoColorize;

use crate::render;

pub async fn run(config: &Config, id: &str) -> Result<()> {
    let mut sync = SyncController::new(EventStore::new(&config.server_url));

    let spinner = render::create_spinner("Deleting event".to_string());
    let result = sync.delete(id).await;
    spinner.finish_and_clear();

    match result? {
        DeleteOutcome::Deleted => println!("{}", format!("Deleted {id}").green()),
        DeleteOutcome::AlreadyGone => {
            println!("{}", format!("{id} was already gone").yellow());
        }
    }

    Ok(())
}
