pub mod assemble;
pub mod classify;
pub mod dates;
pub mod grid;
pub mod header;
pub mod stack;
pub mod timerange;

use thiserror::Error;
use tracing::warn;

use crate::document::{Document, Page};
use crate::model::Event;
use header::PageHeader;

/// Fatal per-page failures. Everything else degrades locally: header fields
/// fall back to zero values, undatable weeks and spans are skipped with a
/// warning.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("page {page}: table is missing its time header row")]
    MissingGrid { page: usize },
    #[error("page {page}: time axis column {column} is unreadable: {cell:?}")]
    TimeAxis { page: usize, column: usize, cell: String },
}

/// Everything parsed out of one document. Pages that failed are recorded,
/// not silently dropped, and do not abort their siblings.
pub struct ParseOutcome {
    /// Plan metadata from the first successfully parsed page.
    pub header: PageHeader,
    pub events: Vec<Event>,
    pub errors: Vec<PageError>,
}

/// Full pipeline for one page: header and time axis once, then every row
/// scanned into spans, each span classified, dated, and assembled.
pub fn process_page(page_no: usize, page: &Page) -> Result<(PageHeader, Vec<Event>), PageError> {
    let header = header::extract(page.text_lines());

    let Some((time_row, day_rows)) = page.table_rows().split_first() else {
        return Err(PageError::MissingGrid { page: page_no });
    };
    let times = timerange::reconstruct(page_no, time_row)?;

    let mut events = Vec::new();
    for row in day_rows {
        for span in grid::scan_row(row, &header.weeks, header.year) {
            let content = classify::classify(&span.raw);
            let dates = dates::materialize(&span, &times);
            events.extend(assemble::assemble(&content, &dates, &header));
        }
    }

    Ok((header, events))
}

pub fn process_document(doc: &Document) -> ParseOutcome {
    let mut events = Vec::new();
    let mut errors = Vec::new();
    let mut plan_header: Option<PageHeader> = None;

    for (idx, page) in doc.pages.iter().enumerate() {
        match process_page(idx + 1, page) {
            Ok((page_header, page_events)) => {
                if plan_header.is_none() {
                    plan_header = Some(page_header);
                }
                events.extend(page_events);
            }
            Err(e) => {
                warn!("{e}");
                errors.push(e);
            }
        }
    }

    ParseOutcome {
        header: plan_header.unwrap_or_default(),
        events,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, NaiveDateTime};

    use super::*;
    use crate::document;
    use crate::model::{Course, EventType, Room, StackedEvent};

    fn parse_fixture(name: &str) -> ParseOutcome {
        let path = format!("tests/fixtures/{}.json", name);
        let doc = document::load(std::path::Path::new(&path)).unwrap();
        process_document(&doc)
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").unwrap()
    }

    fn triple(label: &str) -> String {
        label.chars().flat_map(|c| [c, c, c]).collect()
    }

    fn find<'a>(stacked: &'a [StackedEvent], title: &str) -> &'a StackedEvent {
        stacked
            .iter()
            .find(|s| s.title == title)
            .unwrap_or_else(|| panic!("no stacked event titled {title:?}"))
    }

    #[test]
    fn etechnik_fixture_end_to_end() {
        let outcome = parse_fixture("etechnik_1");
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.header.course, Course::Elektrotechnik);
        assert_eq!(outcome.header.semester, 1);
        assert_eq!(outcome.header.group, 4);
        assert_eq!(outcome.header.year, 2022);

        // 5 spans × 3 active weeks
        assert_eq!(outcome.events.len(), 15);
        for event in &outcome.events {
            assert!(event.start < event.end);
        }

        let stacked = stack::stack_events(&outcome.events);
        assert_eq!(stacked.len(), 5);
        assert!(stacked.iter().all(|s| s.occurrences.len() == 3));

        let et = find(&stacked, "Grundlagen Elektrotechnik");
        assert_eq!(et.kind, EventType::Lecture);
        assert_eq!(et.lecturers[0].name, "Prof. Dr. Meier");
        assert_eq!(et.rooms, vec![Room { building: 10, floor: 2, number: 1 }]);
        // Monday of ISO weeks 40, 41, 44; the span runs over a merged cell
        // and ends at the 11:15 boundary
        assert_eq!(et.occurrences[0].start, dt("2022-10-03T07:45"));
        assert_eq!(et.occurrences[0].end, dt("2022-10-03T11:15"));
        assert_eq!(et.occurrences[1].start, dt("2022-10-10T07:45"));
        assert_eq!(et.occurrences[2].start, dt("2022-10-31T07:45"));

        let lab = find(&stacked, "Digitaltechnik-ÜL");
        assert_eq!(lab.kind, EventType::Lab);
        assert_eq!(lab.occurrences[0].start, dt("2022-10-04T09:30"));

        let exercise = find(&stacked, "Mathematik 1-Ü");
        assert_eq!(exercise.kind, EventType::Exercise);
        assert_eq!(exercise.rooms, vec![Room { building: 23, floor: 1, number: 5 }]);

        let physik = find(&stacked, "Physik");
        assert_eq!(physik.rooms.len(), 2);
        assert_eq!(physik.occurrences[0].start, dt("2022-10-06T13:30"));

        let info = find(&stacked, "Informatik-Ü");
        assert!(info.rooms.is_empty());
        assert_eq!(info.occurrences[0].start, dt("2022-10-07T07:45"));
    }

    #[test]
    fn informatik_fixture_legacy_header() {
        let outcome = parse_fixture("informatik_3");
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.header.course, Course::Informatik);
        assert_eq!(outcome.header.semester, 3);
        assert_eq!(outcome.header.group, 2);

        let stacked = stack::stack_events(&outcome.events);
        assert_eq!(stacked.len(), 1);
        assert_eq!(stacked[0].title, "Algorithmen-Ü");
        assert_eq!(stacked[0].kind, EventType::Exercise);
        assert_eq!(stacked[0].occurrences.len(), 4);
        assert_eq!(stacked[0].occurrences[0].start, dt("2023-04-03T08:00"));
        assert_eq!(stacked[0].occurrences[3].start, dt("2023-05-15T08:00"));
    }

    #[test]
    fn informatik_fixture_plan_view() {
        let outcome = parse_fixture("informatik_3");
        let plan = stack::build_plan(
            &outcome.header.title,
            outcome.header.semester,
            outcome.header.group,
            &outcome.events,
        );
        assert_eq!(plan.title, "Informatik");
        assert_eq!(plan.modules.len(), 1);
        assert_eq!(plan.modules[0].events.len(), 4);
    }

    #[test]
    fn broken_time_axis_aborts_page_but_not_document() {
        let good = Page::new(
            vec![
                "Vorlesungsplan für   Elektrotechnik 1. Sem. Gruppe 4".into(),
                "Wintersemester 2022/2023".into(),
                "Kalenderwoche: 40 Datum: 4/10/22".into(),
            ],
            vec![
                vec![
                    Some("".into()),
                    Some(triple("08:00")),
                    Some(triple("09:45")),
                    Some("".into()),
                ],
                vec![Some("Mo".into()), Some("Mathe".into()), Some("".into()), Some("".into())],
            ],
        );
        let bad = Page::new(
            vec![],
            vec![vec![Some("".into()), Some("kaputt".into()), Some("".into())]],
        );
        let doc = Document { source: None, pages: vec![bad, good] };

        let outcome = process_document(&doc);
        assert_eq!(outcome.errors.len(), 1);
        assert!(matches!(outcome.errors[0], PageError::TimeAxis { page: 1, .. }));
        assert_eq!(outcome.events.len(), 1);
        assert_eq!(outcome.header.course, Course::Elektrotechnik);
    }

    #[test]
    fn empty_pages_yield_zero_events() {
        let page = Page::new(
            vec![],
            vec![
                vec![Some("".into()), Some(triple("08:00")), Some("".into())],
                vec![Some("Mo".into()), Some("".into()), Some("".into())],
            ],
        );
        let doc = Document { source: None, pages: vec![page] };
        let outcome = process_document(&doc);
        assert!(outcome.errors.is_empty());
        assert!(outcome.events.is_empty());
    }

    #[test]
    fn event_weeks_lie_in_active_weeks() {
        let outcome = parse_fixture("etechnik_1");
        let weeks = &outcome.header.weeks;
        for event in &outcome.events {
            let week = event.start.date().iso_week().week();
            assert!(weeks.contains(&week), "week {week} not in {weeks:?}");
        }
    }
}
