use anyhow::Result;
use chrono::{Local, NaiveDate};
use famcal_core::config::Config;
use famcal_core::event::Owner;
use famcal_core::store::EventStore;
use owo_colors::OwoColorize;

use crate::render::{self, Render};

pub async fn run(config: &Config, owner: Option<Owner>, all: bool) -> Result<()> {
    let store = EventStore::new(&config.server_url);

    let spinner = render::create_spinner("Fetching events".to_string());
    let result = store.list().await;
    spinner.finish_and_clear();

    let mut events = result?;
    let now = Local::now().naive_local();
    if !all {
        events.retain(|e| e.start >= now);
    }
    if let Some(owner) = owner {
        events.retain(|e| e.owner == owner);
    }
    events.sort_by_key(|e| e.start);

    if events.is_empty() {
        println!("{}", "No upcoming events".dimmed());
        return Ok(());
    }

    let mut current_date: Option<NaiveDate> = None;
    for event in &events {
        let date = event.start.date();
        if current_date != Some(date) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", format_date_label(date).bold());
            current_date = Some(date);
        }
        println!("  {}", event.render());
    }

    Ok(())
}

/// "Today", "Tomorrow", or "Sat Nov 29".
fn format_date_label(date: NaiveDate) -> String {
    let today = Local::now().date_naive();
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}
