use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

/// Day labels as they appear in the left-hand column of the grid, Monday first.
pub const WEEKDAYS: [&str; 7] = ["Mo", "Di", "Mi", "Do", "Fr", "Sa", "So"];

/// Degree programs the header line is matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Course {
    Elektrotechnik,
    Informatik,
    Mechatronik,
    Medieningenieur,
    Wirtschaftsingenieurwesen,
    #[default]
    #[serde(rename = "Unbekannt")]
    Unknown,
}

impl Course {
    /// Map a free-form course label onto the closed set. Substring matching
    /// so both full names and the abbreviations seen in headers resolve.
    pub fn from_label(label: &str) -> Self {
        match label {
            l if l.contains("Elektrotechnik") => Course::Elektrotechnik,
            l if l.contains("Informatik") || l.contains("INF") => Course::Informatik,
            l if l.contains("Mechatronik") => Course::Mechatronik,
            l if l.contains("Medieningenieur") => Course::Medieningenieur,
            l if l.contains("Wirtschaftsingenieurwesen") || l.contains("Wing") => {
                Course::Wirtschaftsingenieurwesen
            }
            _ => Course::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventType {
    #[serde(rename = "Vorlesung")]
    Lecture,
    #[serde(rename = "Übung")]
    Exercise,
    #[serde(rename = "Seminar")]
    Seminar,
    #[serde(rename = "Labor")]
    Lab,
    #[serde(rename = "Projekt")]
    Project,
    #[serde(rename = "Sonstige")]
    Other,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EventType::Lecture => "Vorlesung",
            EventType::Exercise => "Übung",
            EventType::Seminar => "Seminar",
            EventType::Lab => "Labor",
            EventType::Project => "Projekt",
            EventType::Other => "Sonstige",
        };
        f.write_str(label)
    }
}

/// Faculty a module belongs to. Not derivable from the grid itself; filled
/// from an external directory, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Department {
    InformatikElektrotechnik,
    Agrarwirtschaft,
    Maschinenbau,
    Wirtschaft,
    MedienBauwesen,
    SozialeArbeit,
}

/// A room reference in the `C<building>-<floor>.<number>` convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Room {
    pub building: u8,
    pub floor: u8,
    pub number: u8,
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{:02}-{}.{:02}", self.building, self.floor, self.number)
    }
}

impl Serialize for Room {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Lecturer {
    pub name: String,
}

/// One dated occurrence of a scheduled block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Occurrence {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// A single dated class session, one per (span, active week) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub title: String,
    pub department: Option<Department>,
    #[serde(rename = "type")]
    pub kind: EventType,
    pub lecturers: Vec<Lecturer>,
    pub rooms: Vec<Room>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub course: Course,
    pub semester: u8,
    pub group: u8,
}

/// A recurring class session merged across all its weekly occurrences.
/// Identity is (title, department, type, lecturers, rooms).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackedEvent {
    pub title: String,
    pub department: Option<Department>,
    #[serde(rename = "type")]
    pub kind: EventType,
    pub lecturers: Vec<Lecturer>,
    pub rooms: Vec<Room>,
    pub occurrences: Vec<Occurrence>,
    pub course: Course,
    pub semesters: BTreeSet<u8>,
    pub groups: BTreeSet<u8>,
}

/// Legacy grouped view: all events of one document keyed by module title.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub title: String,
    pub semester: u8,
    pub group: u8,
    pub modules: Vec<Module>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Module {
    pub title: String,
    pub category: EventType,
    pub events: Vec<ModuleEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleEvent {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub rooms: Vec<Room>,
}
