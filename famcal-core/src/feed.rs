//! Read-only external calendar feed.
//!
//! The feed endpoint returns a JSON array of entries. famcal never writes to
//! it; pulled entries become events with `Synced` provenance and reach the
//! store through the normal import path.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

use crate::error::{FamCalError, FamCalResult};
use crate::event::{Event, Provenance, default_end};
use crate::ids::TempIds;
use crate::import::{ImportDefaults, UNTITLED_TITLE};

/// One entry as the feed serves it. Times come as RFC 3339 stamps or bare
/// `YYYY-MM-DD` dates for all-day entries.
#[derive(Debug, Deserialize)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
}

/// Client for the configured feed URL.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    url: String,
}

impl FeedClient {
    pub fn new(url: impl Into<String>) -> Self {
        FeedClient {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Fetch the feed and normalize its entries. Entries without a usable
    /// start are dropped, like tabular rows.
    pub async fn fetch(
        &self,
        defaults: &ImportDefaults,
        ids: &mut dyn TempIds,
    ) -> FamCalResult<Vec<Event>> {
        let resp = self.http.get(&self.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FamCalError::Persistence {
                status: status.as_u16(),
                message: format!("feed returned {status}"),
            });
        }
        let entries: Vec<FeedEntry> = resp.json().await?;
        log::debug!("feed returned {} entries", entries.len());

        Ok(entries
            .into_iter()
            .filter_map(|entry| event_from_entry(entry, defaults, ids))
            .collect())
    }
}

fn event_from_entry(
    entry: FeedEntry,
    defaults: &ImportDefaults,
    ids: &mut dyn TempIds,
) -> Option<Event> {
    let start = parse_feed_time(entry.start.as_deref()?)?;
    let end = entry
        .end
        .as_deref()
        .and_then(parse_feed_time)
        .filter(|end| *end > start)
        .unwrap_or_else(|| default_end(start));

    let title = entry
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| UNTITLED_TITLE.to_string());

    Some(Event {
        id: ids.next(),
        title,
        start,
        end,
        category: defaults.category,
        owner: defaults.owner,
        description: entry.description.filter(|s| !s.is_empty()),
        location: entry.location.filter(|s| !s.is_empty()),
        provenance: Provenance::Synced,
    })
}

/// RFC 3339 stamps keep their wall-clock time; bare dates start at midnight.
fn parse_feed_time(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

// ============================================================================
// Tests
// ============================================================================
