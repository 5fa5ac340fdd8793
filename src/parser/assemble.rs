use crate::model::{Event, Occurrence};
use crate::parser::classify::Classified;
use crate::parser::header::PageHeader;

/// Pure combination: one Event per materialized occurrence, carrying the
/// span's classified content and the page's header metadata.
pub fn assemble(content: &Classified, dates: &[Occurrence], header: &PageHeader) -> Vec<Event> {
    dates
        .iter()
        .map(|occ| Event {
            title: content.title.clone(),
            // TODO: fill department once the lecturer directory exposes it
            department: None,
            kind: content.kind,
            lecturers: content.lecturers.clone(),
            rooms: content.rooms.clone(),
            start: occ.start,
            end: occ.end,
            course: header.course,
            semester: header.semester,
            group: header.group,
        })
        .collect()
}
