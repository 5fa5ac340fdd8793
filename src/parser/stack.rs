use std::collections::BTreeSet;

use crate::model::{Event, Module, ModuleEvent, Occurrence, Plan, StackedEvent};

/// Merge events that share identity (title, department, type, lecturers,
/// rooms) into one record per recurring session, in first-seen order. The
/// linear scan is deliberate: a document yields tens of events, not
/// thousands.
pub fn stack_events(events: &[Event]) -> Vec<StackedEvent> {
    let mut stacked: Vec<StackedEvent> = Vec::new();

    for event in events {
        let occurrence = Occurrence { start: event.start, end: event.end };
        match stacked.iter_mut().find(|s| same_identity(s, event)) {
            Some(existing) => {
                existing.occurrences.push(occurrence);
                existing.semesters.insert(event.semester);
                existing.groups.insert(event.group);
            }
            None => stacked.push(StackedEvent {
                title: event.title.clone(),
                department: event.department,
                kind: event.kind,
                lecturers: event.lecturers.clone(),
                rooms: event.rooms.clone(),
                occurrences: vec![occurrence],
                course: event.course,
                semesters: BTreeSet::from([event.semester]),
                groups: BTreeSet::from([event.group]),
            }),
        }
    }

    stacked
}

fn same_identity(stacked: &StackedEvent, event: &Event) -> bool {
    stacked.title == event.title
        && stacked.department == event.department
        && stacked.kind == event.kind
        && stacked.lecturers == event.lecturers
        && stacked.rooms == event.rooms
}

/// Legacy grouped view: events keyed by module title alone, under the plan
/// metadata of the document's first page.
pub fn build_plan(title: &str, semester: u8, group: u8, events: &[Event]) -> Plan {
    let mut modules: Vec<Module> = Vec::new();

    for event in events {
        let entry = ModuleEvent {
            start: event.start,
            end: event.end,
            rooms: event.rooms.clone(),
        };
        match modules.iter_mut().find(|m| m.title == event.title) {
            Some(module) => module.events.push(entry),
            None => modules.push(Module {
                title: event.title.clone(),
                category: event.kind,
                events: vec![entry],
            }),
        }
    }

    Plan {
        title: title.to_string(),
        semester,
        group,
        modules,
    }
}
