//! Calendar (.ics) import using the icalendar crate's parser.

use chrono::{NaiveDateTime, NaiveTime};
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, read_calendar, unfold},
};

use crate::error::{FamCalError, FamCalResult};
use crate::event::{Event, Provenance, default_end};
use crate::ids::TempIds;
use crate::import::{ImportDefaults, UNTITLED_TITLE};

/// Parse `.ics` content into events.
///
/// Every VEVENT with a usable DTSTART becomes one event; VEVENTs without one
/// are dropped as malformed. Content that is not a calendar at all is a
/// format error naming the file.
pub fn parse_events(
    file: &str,
    content: &str,
    defaults: &ImportDefaults,
    ids: &mut dyn TempIds,
) -> FamCalResult<Vec<Event>> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).map_err(|e| FamCalError::Format {
        file: file.to_string(),
        reason: e.to_string(),
    })?;

    let events = calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .filter_map(|vevent| event_from_vevent(vevent, defaults, ids))
        .collect();

    Ok(events)
}

fn event_from_vevent(
    vevent: &Component<'_>,
    defaults: &ImportDefaults,
    ids: &mut dyn TempIds,
) -> Option<Event> {
    let start = vevent
        .find_prop("DTSTART")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .map(to_naive)?;

    // DTEND at or before DTSTART counts as missing.
    let end = vevent
        .find_prop("DTEND")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .map(to_naive)
        .filter(|end| *end > start)
        .unwrap_or_else(|| default_end(start));

    let title = vevent
        .find_prop("SUMMARY")
        .map(|p| p.val.to_string())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| UNTITLED_TITLE.to_string());

    let description = vevent
        .find_prop("DESCRIPTION")
        .map(|p| p.val.to_string())
        .filter(|s| !s.is_empty());
    let location = vevent
        .find_prop("LOCATION")
        .map(|p| p.val.to_string())
        .filter(|s| !s.is_empty());

    Some(Event {
        id: ids.next(),
        title,
        start,
        end,
        category: defaults.category,
        owner: defaults.owner,
        description,
        location,
        provenance: Provenance::Imported,
    })
}

/// Collapse the three ICS time shapes onto the household clock: UTC instants
/// keep their UTC wall time, zoned and floating times keep their local wall
/// time, all-day dates start at midnight.
fn to_naive(dpt: DatePerhapsTime) -> NaiveDateTime {
    match dpt {
        DatePerhapsTime::Date(d) => d.and_time(NaiveTime::MIN),
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => dt.naive_utc(),
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(dt)) => dt,
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, .. }) => date_time,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialTempIds;
    use chrono::NaiveDate;

    const FAMILY_ICS: &str = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:-//famcal test//EN
BEGIN:VEVENT
UID:one@test
SUMMARY:Dentist
DTSTART:20251129T100000
DTEND:20251129T103000
LOCATION:High Street Clinic
END:VEVENT
BEGIN:VEVENT
UID:two@test
SUMMARY:Yoga
DTSTART:20251201T180000Z
DESCRIPTION:Bring a mat
END:VEVENT
END:VCALENDAR"#;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn parse(content: &str) -> FamCalResult<Vec<Event>> {
        let mut ids = SequentialTempIds::default();
        parse_events("family.ics", content, &ImportDefaults::default(), &mut ids)
    }

    #[test]
    fn every_vevent_becomes_an_event() {
        let events = parse(FAMILY_ICS).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "Dentist");
        assert_eq!(events[0].start, dt(2025, 11, 29, 10, 0));
        assert_eq!(events[0].end, dt(2025, 11, 29, 10, 30));
        assert_eq!(events[0].location.as_deref(), Some("High Street Clinic"));
        assert_eq!(events[0].id, "temp-1");
        assert_eq!(events[0].provenance, Provenance::Imported);

        assert_eq!(events[1].title, "Yoga");
        assert_eq!(events[1].description.as_deref(), Some("Bring a mat"));
        assert_eq!(events[1].id, "temp-2");
    }

    #[test]
    fn missing_dtend_defaults_to_one_hour() {
        let events = parse(FAMILY_ICS).unwrap();

        // The second VEVENT has no DTEND; 18:00Z keeps its wall time.
        assert_eq!(events[1].start, dt(2025, 12, 1, 18, 0));
        assert_eq!(events[1].end, dt(2025, 12, 1, 19, 0));
    }

    #[test]
    fn dtend_before_dtstart_counts_as_missing() {
        let ics = r#"BEGIN:VCALENDAR
VERSION:2.0
BEGIN:VEVENT
UID:x@test
SUMMARY:Backwards
DTSTART:20251129T100000
DTEND:20251129T090000
END:VEVENT
END:VCALENDAR"#;

        let events = parse(ics).unwrap();
        assert_eq!(events[0].end, dt(2025, 11, 29, 11, 0));
    }

    #[test]
    fn missing_summary_gets_placeholder_title() {
        let ics = r#"BEGIN:VCALENDAR
VERSION:2.0
BEGIN:VEVENT
UID:x@test
DTSTART:20251129T100000
END:VEVENT
END:VCALENDAR"#;

        let events = parse(ics).unwrap();
        assert_eq!(events[0].title, "Untitled Event");
    }

    #[test]
    fn vevent_without_dtstart_is_dropped() {
        let ics = r#"BEGIN:VCALENDAR
VERSION:2.0
BEGIN:VEVENT
UID:a@test
SUMMARY:Kept
DTSTART:20251129T100000
END:VEVENT
BEGIN:VEVENT
UID:b@test
SUMMARY:No start
END:VEVENT
END:VCALENDAR"#;

        let events = parse(ics).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Kept");
    }

    #[test]
    fn all_day_events_start_at_midnight() {
        let ics = r#"BEGIN:VCALENDAR
VERSION:2.0
BEGIN:VEVENT
UID:x@test
SUMMARY:Eid
DTSTART;VALUE=DATE:20260320
END:VEVENT
END:VCALENDAR"#;

        let events = parse(ics).unwrap();
        assert_eq!(events[0].start, dt(2026, 3, 20, 0, 0));
        assert_eq!(events[0].end, dt(2026, 3, 20, 1, 0));
    }

    #[test]
    fn non_calendar_text_is_a_format_error() {
        let result = parse("once upon a time");
        assert!(matches!(
            result,
            Err(FamCalError::Format { ref file, .. }) if file == "family.ics"
        ));
    }

    #[test]
    fn calendar_with_no_events_parses_to_nothing() {
        let ics = "BEGIN:VCALENDAR\nVERSION:2.0\nEND:VCALENDAR";
        let events = parse(ics).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn reparsing_yields_the_same_events_apart_from_ids() {
        let first = parse(FAMILY_ICS).unwrap();
        let second = parse(FAMILY_ICS).unwrap();

        let first: Vec<_> = first.iter().map(Event::to_draft).collect();
        let second: Vec<_> = second.iter().map(Event::to_draft).collect();
        assert_eq!(first, second);
    }
}
