use anyhow::{bail, Result};
use famcal_core::config::Config;
use famcal_core::feed::FeedClient;
use famcal_core::ids::UuidTempIds;
use famcal_core::import::ImportDefaults;
use famcal_core::store::EventStore;
use famcal_core::sync::SyncController;
use owo_colors::OwoColorize;

use crate::render;

pub async fn run(config: &Config) -> Result<()> {
    let Some(feed_url) = config.feed_url.as_deref() else {
        bail!(
            "No feed configured. Set feed_url in {}",
            Config::config_path()?.display()
        );
    };

    let defaults = ImportDefaults {
        owner: config.default_owner,
        ..ImportDefaults::default()
    };
    let mut ids = UuidTempIds;
    let feed = FeedClient::new(feed_url);

    let spinner = render::create_spinner("Pulling feed".to_string());
    let fetched = feed.fetch(&defaults, &mut ids).await;
    spinner.finish_and_clear();

    let events = fetched?;
    if events.is_empty() {
        println!("{}", "Feed has no events".dimmed());
        return Ok(());
    }

    let mut sync = SyncController::new(EventStore::new(&config.server_url));

    let spinner = render::create_spinner(format!(
        "Saving {}",
        render::count_events(events.len())
    ));
    let result = sync.import_batch(&events).await;
    spinner.finish_and_clear();

    let count = result?;
    println!(
        "{}",
        format!("Pulled {} from the feed", render::count_events(count)).green()
    );

    Ok(())
}
