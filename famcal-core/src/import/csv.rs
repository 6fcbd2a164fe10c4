//! Tabular (.csv) import.
//!
//! Column headers are matched against a fixed alias table covering the export
//! dialects we have seen (Outlook-style `Start Date` next to compact
//! `StartDate`). Rows without a start date are dropped without comment;
//! spreadsheets pad their exports with blank rows.

use ::csv::{ReaderBuilder, StringRecord};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{FamCalError, FamCalResult};
use crate::event::{Event, Provenance, default_end};
use crate::ids::TempIds;
use crate::import::{ImportDefaults, UNTITLED_TITLE};

const TITLE_COLUMNS: &[&str] = &["Subject", "Title"];
const START_DATE_COLUMNS: &[&str] = &["Start Date", "StartDate"];
const START_TIME_COLUMNS: &[&str] = &["Start Time", "StartTime"];
const END_DATE_COLUMNS: &[&str] = &["End Date", "EndDate"];
const END_TIME_COLUMNS: &[&str] = &["End Time", "EndTime"];
const DESCRIPTION_COLUMNS: &[&str] = &["Description"];
const LOCATION_COLUMNS: &[&str] = &["Location"];

/// Midnight, for rows that carry a date but no time.
const DEFAULT_TIME: &str = "00:00:00";

/// Parse `.csv` content into events.
pub fn parse_events(
    file: &str,
    content: &str,
    defaults: &ImportDefaults,
    ids: &mut dyn TempIds,
) -> FamCalResult<Vec<Event>> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers().map_err(|e| format_error(file, e))?.clone();
    let columns = Columns::from_headers(&headers);

    let mut events = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| format_error(file, e))?;
        if let Some(event) = event_from_record(&record, &columns, defaults, ids) {
            events.push(event);
        }
    }

    Ok(events)
}

fn format_error(file: &str, err: ::csv::Error) -> FamCalError {
    FamCalError::Format {
        file: file.to_string(),
        reason: err.to_string(),
    }
}

/// Column indexes resolved from one file's header row.
#[derive(Debug, Default)]
struct Columns {
    title: Option<usize>,
    start_date: Option<usize>,
    start_time: Option<usize>,
    end_date: Option<usize>,
    end_time: Option<usize>,
    description: Option<usize>,
    location: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Columns {
        let mut columns = Columns::default();
        for (index, header) in headers.iter().enumerate() {
            let header = header.trim();
            let slot = if matches_any(header, TITLE_COLUMNS) {
                &mut columns.title
            } else if matches_any(header, START_DATE_COLUMNS) {
                &mut columns.start_date
            } else if matches_any(header, START_TIME_COLUMNS) {
                &mut columns.start_time
            } else if matches_any(header, END_DATE_COLUMNS) {
                &mut columns.end_date
            } else if matches_any(header, END_TIME_COLUMNS) {
                &mut columns.end_time
            } else if matches_any(header, DESCRIPTION_COLUMNS) {
                &mut columns.description
            } else if matches_any(header, LOCATION_COLUMNS) {
                &mut columns.location
            } else {
                continue;
            };
            // First matching column wins if a header repeats.
            slot.get_or_insert(index);
        }
        columns
    }
}

fn matches_any(header: &str, names: &[&str]) -> bool {
    names.iter().any(|name| header.eq_ignore_ascii_case(name))
}

/// A row becomes an event only if it has a parseable start date. Everything
/// else about the row may be missing.
fn event_from_record(
    record: &StringRecord,
    columns: &Columns,
    defaults: &ImportDefaults,
    ids: &mut dyn TempIds,
) -> Option<Event> {
    let start_date = field(record, columns.start_date)?;
    let start_time = field(record, columns.start_time).unwrap_or(DEFAULT_TIME);
    let start = parse_stamp(start_date, start_time)?;

    // An end at or before the start counts as missing.
    let end = field(record, columns.end_date)
        .and_then(|date| {
            let time = field(record, columns.end_time).unwrap_or(DEFAULT_TIME);
            parse_stamp(date, time)
        })
        .filter(|end| *end > start)
        .unwrap_or_else(|| default_end(start));

    let title = field(record, columns.title)
        .map(str::to_string)
        .unwrap_or_else(|| UNTITLED_TITLE.to_string());

    Some(Event {
        id: ids.next(),
        title,
        start,
        end,
        category: defaults.category,
        owner: defaults.owner,
        description: field(record, columns.description).map(str::to_string),
        location: field(record, columns.location).map(str::to_string),
        provenance: Provenance::Imported,
    })
}

/// Non-empty trimmed cell value, if the column exists in this file.
fn field<'r>(record: &'r StringRecord, index: Option<usize>) -> Option<&'r str> {
    let value = record.get(index?)?.trim();
    if value.is_empty() { None } else { Some(value) }
}

fn parse_stamp(date: &str, time: &str) -> Option<NaiveDateTime> {
    Some(parse_date(date)?.and_time(parse_time(time)?))
}

/// ISO dates plus the US-style slash dates Outlook exports.
fn parse_date(value: &str) -> Option<NaiveDate> {
    const FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"];
    FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// 24-hour times plus AM/PM.
fn parse_time(value: &str) -> Option<NaiveTime> {
    const FORMATS: &[&str] = &["%H:%M:%S", "%H:%M", "%I:%M:%S %p", "%I:%M %p"];
    FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
}

// ============================================================================
// Tests
// ============================================================================
