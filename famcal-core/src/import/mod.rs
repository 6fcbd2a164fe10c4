//! Import coordination: turning files and pasted text into events.
//!
//! Parsers are format-specific and know nothing about each other. The
//! coordinator dispatches on filename suffix, collects per-file failures
//! without aborting the rest of the batch, and reports files it does not
//! understand.

pub mod csv;
pub mod ics;

use chrono::NaiveDateTime;

use crate::error::{FamCalError, FamCalResult};
use crate::event::{Category, Event, Owner, Provenance, default_end};
use crate::ids::TempIds;

/// Title given to events whose source has none.
pub(crate) const UNTITLED_TITLE: &str = "Untitled Event";

/// Title of the single event a text paste produces.
pub const TEXT_IMPORT_TITLE: &str = "Imported from text";

/// One named input to the import coordinator.
#[derive(Debug, Clone)]
pub struct ImportFile {
    pub name: String,
    pub content: String,
}

/// Defaults applied to every imported event.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportDefaults {
    pub category: Category,
    pub owner: Owner,
}

/// A file that could not be parsed at all.
#[derive(Debug, Clone)]
pub struct ImportFailure {
    pub file: String,
    pub reason: String,
}

/// Everything one import run produced.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Parsed events, in input order: files in the order given, records in
    /// the order they appear within each file.
    pub events: Vec<Event>,
    /// Files skipped because their suffix is not supported.
    pub skipped: Vec<String>,
    /// Files that failed to parse. One bad file never aborts the batch.
    pub failures: Vec<ImportFailure>,
}

impl ImportReport {
    /// Zero events across every input is its own condition, distinct from any
    /// per-file failure.
    pub fn ensure_not_empty(&self) -> FamCalResult<()> {
        if self.events.is_empty() {
            return Err(FamCalError::EmptyImport);
        }
        Ok(())
    }
}

enum FileKind {
    Calendar,
    Tabular,
}

impl FileKind {
    /// Dispatch is purely by suffix; content is never sniffed.
    fn from_name(name: &str) -> Option<FileKind> {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".ics") {
            Some(FileKind::Calendar)
        } else if lower.ends_with(".csv") {
            Some(FileKind::Tabular)
        } else {
            None
        }
    }
}

/// Run every file through the parser its suffix selects.
pub fn import_files(
    files: &[ImportFile],
    defaults: &ImportDefaults,
    ids: &mut dyn TempIds,
) -> ImportReport {
    let mut report = ImportReport::default();

    for file in files {
        let parsed = match FileKind::from_name(&file.name) {
            Some(FileKind::Calendar) => ics::parse_events(&file.name, &file.content, defaults, ids),
            Some(FileKind::Tabular) => csv::parse_events(&file.name, &file.content, defaults, ids),
            None => {
                log::warn!("skipping unsupported file: {}", file.name);
                report.skipped.push(file.name.clone());
                continue;
            }
        };

        match parsed {
            Ok(mut events) => report.events.append(&mut events),
            Err(FamCalError::Format { file, reason }) => {
                log::warn!("failed to parse {file}: {reason}");
                report.failures.push(ImportFailure { file, reason });
            }
            Err(other) => report.failures.push(ImportFailure {
                file: file.name.clone(),
                reason: other.to_string(),
            }),
        }
    }

    report
}

/// Import pasted text as a single note-style event.
///
/// The text is never parsed for structure: it lands verbatim in the
/// description of one placeholder event starting at `now`. Blank text
/// produces an empty report.
pub fn import_text(
    text: &str,
    now: NaiveDateTime,
    defaults: &ImportDefaults,
    ids: &mut dyn TempIds,
) -> ImportReport {
    let mut report = ImportReport::default();
    if text.trim().is_empty() {
        return report;
    }

    report.events.push(Event {
        id: ids.next(),
        title: TEXT_IMPORT_TITLE.to_string(),
        start: now,
        end: default_end(now),
        category: defaults.category,
        owner: defaults.owner,
        description: Some(text.to_string()),
        location: None,
        provenance: Provenance::Imported,
    });
    report
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialTempIds;
    use chrono::NaiveDate;

    const GOOD_ICS: &str = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:-//famcal//EN
BEGIN:VEVENT
UID:dentist@famcal
SUMMARY:Dentist
DTSTART:20251129T100000
DTEND:20251129T103000
END:VEVENT
END:VCALENDAR"#;

    const GOOD_CSV: &str = "Subject,Start Date,Start Time\nSwim practice,2025-12-01,16:00:00\n";

    fn files(pairs: &[(&str, &str)]) -> Vec<ImportFile> {
        pairs
            .iter()
            .map(|(name, content)| ImportFile {
                name: name.to_string(),
                content: content.to_string(),
            })
            .collect()
    }

    #[test]
    fn dispatches_on_filename_suffix() {
        let mut ids = SequentialTempIds::default();
        let inputs = files(&[("family.ics", GOOD_ICS), ("school.csv", GOOD_CSV)]);
        let report = import_files(&inputs, &ImportDefaults::default(), &mut ids);

        assert_eq!(report.events.len(), 2);
        assert_eq!(report.events[0].title, "Dentist");
        assert_eq!(report.events[1].title, "Swim practice");
        assert!(report.skipped.is_empty());
        assert!(report.failures.is_empty());
    }

    #[test]
    fn suffix_match_ignores_case() {
        let mut ids = SequentialTempIds::default();
        let inputs = files(&[("Family.ICS", GOOD_ICS)]);
        let report = import_files(&inputs, &ImportDefaults::default(), &mut ids);

        assert_eq!(report.events.len(), 1);
    }

    #[test]
    fn unknown_suffixes_are_skipped_not_fatal() {
        let mut ids = SequentialTempIds::default();
        let inputs = files(&[("family.ics", GOOD_ICS), ("notes.txt", "dentist at ten")]);
        let report = import_files(&inputs, &ImportDefaults::default(), &mut ids);

        assert_eq!(report.events.len(), 1);
        assert_eq!(report.skipped, vec!["notes.txt".to_string()]);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn a_bad_file_does_not_abort_the_batch() {
        let mut ids = SequentialTempIds::default();
        let inputs = files(&[("broken.ics", "not a calendar at all"), ("school.csv", GOOD_CSV)]);
        let report = import_files(&inputs, &ImportDefaults::default(), &mut ids);

        assert_eq!(report.events.len(), 1);
        assert_eq!(report.events[0].title, "Swim practice");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].file, "broken.ics");
    }

    #[test]
    fn empty_batch_is_its_own_condition() {
        let mut ids = SequentialTempIds::default();
        let report = import_files(&[], &ImportDefaults::default(), &mut ids);

        assert!(matches!(
            report.ensure_not_empty(),
            Err(FamCalError::EmptyImport)
        ));
    }

    #[test]
    fn text_paste_becomes_one_placeholder_event() {
        let mut ids = SequentialTempIds::default();
        let now = NaiveDate::from_ymd_opt(2025, 11, 29)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let report = import_text("pick up meds\nthen school run", now, &ImportDefaults::default(), &mut ids);

        assert_eq!(report.events.len(), 1);
        let event = &report.events[0];
        assert_eq!(event.id, "temp-1");
        assert_eq!(event.title, TEXT_IMPORT_TITLE);
        assert_eq!(event.description.as_deref(), Some("pick up meds\nthen school run"));
        assert_eq!(event.start, now);
        assert_eq!(event.end, now + chrono::Duration::hours(1));
        assert_eq!(event.provenance, Provenance::Imported);
    }

    #[test]
    fn blank_text_produces_nothing() {
        let mut ids = SequentialTempIds::default();
        let now = NaiveDate::from_ymd_opt(2025, 11, 29)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let report = import_text("   \n ", now, &ImportDefaults::default(), &mut ids);

        assert!(report.events.is_empty());
        assert!(matches!(
            report.ensure_not_empty(),
            Err(FamCalError::EmptyImport)
        ));
    }
}
