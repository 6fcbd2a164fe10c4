//! Terminal rendering for famcal types.
//!
//! Extension traits that add colored output using owo_colors, plus the
//! shared progress spinner.

use famcal_core::event::{Category, Event, Owner};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

/// Extension trait for colored terminal rendering.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Owner {
    fn render(&self) -> String {
        match self {
            Owner::Nadia => self.as_str().magenta().to_string(),
            Owner::Tariq => self.as_str().blue().to_string(),
        }
    }
}

impl Render for Category {
    fn render(&self) -> String {
        let tag = format!("[{}]", self.as_str());
        match self {
            Category::Medical => tag.red().to_string(),
            Category::Wellness => tag.green().to_string(),
            Category::Other => tag.dimmed().to_string(),
        }
    }
}

impl Render for Event {
    fn render(&self) -> String {
        let mut line = format!(
            "{}-{} {} {} {}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M"),
            self.title,
            self.owner.render(),
            self.category.render(),
        );
        if let Some(location) = &self.location {
            line.push_str(&format!(" @ {location}").dimmed().to_string());
        }
        line.push_str(&format!(" {}", format!("({})", self.id).dimmed()));
        line
    }
}

pub fn create_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["-", "\\", "|", "/"])
            .template("{msg} {spinner}")
            .unwrap(),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

/// "1 event", "3 events"
pub fn count_events(n: usize) -> String {
    if n == 1 {
        "1 event".to_string()
    } else {
        format!("{n} events")
    }
}
