//! The household event model.
//!
//! Events carry wall-clock times with no timezone. The family shares one
//! household clock, and every import source is normalized onto it.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{FamCalError, FamCalResult};

/// Prefix for client-assigned ids the event store has not confirmed yet.
pub const TEMP_ID_PREFIX: &str = "temp-";

/// True for ids assigned locally by a [`crate::ids::TempIds`] source.
pub fn is_temp_id(id: &str) -> bool {
    id.starts_with(TEMP_ID_PREFIX)
}

/// One hour after `start`, the fallback whenever a source has no usable end.
pub fn default_end(start: NaiveDateTime) -> NaiveDateTime {
    start + Duration::hours(1)
}

/// What kind of appointment this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Medical,
    Wellness,
    #[default]
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Medical => "medical",
            Category::Wellness => "wellness",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = FamCalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "medical" => Ok(Category::Medical),
            "wellness" => Ok(Category::Wellness),
            "other" => Ok(Category::Other),
            _ => Err(FamCalError::Validation(format!(
                "unknown category '{s}' (expected medical, wellness or other)"
            ))),
        }
    }
}

/// Which household member an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Owner {
    #[default]
    Nadia,
    Tariq,
}

impl Owner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Owner::Nadia => "nadia",
            Owner::Tariq => "tariq",
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Owner {
    type Err = FamCalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nadia" => Ok(Owner::Nadia),
            "tariq" => Ok(Owner::Tariq),
            _ => Err(FamCalError::Validation(format!(
                "unknown household member '{s}' (expected nadia or tariq)"
            ))),
        }
    }
}

/// Where an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Pulled from the read-only external feed.
    Synced,
    /// Produced by a file or text import.
    Imported,
    /// Entered by hand.
    #[default]
    Manual,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provenance::Synced => "synced",
            Provenance::Imported => "imported",
            Provenance::Manual => "manual",
        };
        f.write_str(name)
    }
}

/// A single calendar entry, as held locally and as the event store returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub category: Category,
    pub owner: Owner,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub provenance: Provenance,
}

impl Event {
    /// Rebuild an event from its writable fields plus an id.
    pub fn from_draft(id: String, draft: EventDraft) -> Self {
        Event {
            id,
            title: draft.title,
            start: draft.start,
            end: draft.end,
            category: draft.category,
            owner: draft.owner,
            description: draft.description,
            location: draft.location,
            provenance: draft.provenance,
        }
    }

    /// The writable fields, without the id. This is what create and update send.
    pub fn to_draft(&self) -> EventDraft {
        EventDraft {
            title: self.title.clone(),
            start: self.start,
            end: self.end,
            category: self.category,
            owner: self.owner,
            description: self.description.clone(),
            location: self.location.clone(),
            provenance: self.provenance,
        }
    }

    /// Whether this event only exists locally so far.
    pub fn is_temp(&self) -> bool {
        is_temp_id(&self.id)
    }
}

/// The writable fields of an event. Ids never appear here, so a temporary id
/// can never leak into a request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub category: Category,
    pub owner: Owner,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub provenance: Provenance,
}

impl EventDraft {
    /// Checks the invariants every event must satisfy before it is persisted.
    pub fn validate(&self) -> FamCalResult<()> {
        if self.title.trim().is_empty() {
            return Err(FamCalError::Validation(
                "title must not be empty".to_string(),
            ));
        }
        if self.end <= self.start {
            return Err(FamCalError::Validation(format!(
                "end ({}) must be after start ({})",
                self.end, self.start
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
