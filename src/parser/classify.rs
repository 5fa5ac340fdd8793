use std::sync::LazyLock;

use regex::Regex;

use crate::model::{EventType, Lecturer, Room};

static ROOM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"C(\d{2})-(\d)\.(\d{2})").unwrap());

const SALUTATIONS: &[&str] = &["Prof.", "Dr.", "Dipl.", "Hr.", "Fr."];
// "-ÜL" also contains "-Ü": lab markers are checked first, so a title
// carrying both classifies as a lab
const LAB_MARKERS: &[&str] = &["-ÜL", "ÜL-"];
const EXERCISE_MARKERS: &[&str] = &["-Ü", "Ü-"];

/// A span's text split into its parts. Each line is claimed by at most one
/// pass: rooms first, then lecturers, whatever remains is the title.
#[derive(Debug, Clone)]
pub struct Classified {
    pub title: String,
    pub kind: EventType,
    pub lecturers: Vec<Lecturer>,
    pub rooms: Vec<Room>,
}

pub fn classify(raw: &str) -> Classified {
    let lines: Vec<&str> = raw.lines().collect();
    let (rooms, rest) = take_rooms(&lines);
    let (lecturers, rest) = take_lecturers(&rest);
    let title = rest.join(" ");
    let kind = classify_kind(&title);

    Classified { title, kind, lecturers, rooms }
}

/// Room pass: a line holding one or more `C<bb>-<f>.<nn>` references yields
/// one Room per match and is consumed entirely.
fn take_rooms<'a>(lines: &[&'a str]) -> (Vec<Room>, Vec<&'a str>) {
    let mut rooms = Vec::new();
    let mut rest = Vec::new();

    for line in lines {
        let before = rooms.len();
        for caps in ROOM_RE.captures_iter(line) {
            rooms.push(Room {
                building: caps[1].parse().unwrap_or(0),
                floor: caps[2].parse().unwrap_or(0),
                number: caps[3].parse().unwrap_or(0),
            });
        }
        if rooms.len() == before {
            rest.push(*line);
        }
    }

    (rooms, rest)
}

/// Lecturer pass: a remaining line carrying an academic or formal salutation
/// is a lecturer name.
fn take_lecturers<'a>(lines: &[&'a str]) -> (Vec<Lecturer>, Vec<&'a str>) {
    let mut lecturers = Vec::new();
    let mut rest = Vec::new();

    for line in lines {
        if SALUTATIONS.iter().any(|s| line.contains(s)) {
            lecturers.push(Lecturer { name: line.trim().to_string() });
        } else {
            rest.push(*line);
        }
    }

    (lecturers, rest)
}

fn classify_kind(title: &str) -> EventType {
    if LAB_MARKERS.iter().any(|m| title.contains(m)) {
        return EventType::Lab;
    }
    if EXERCISE_MARKERS.iter().any(|m| title.contains(m)) {
        return EventType::Exercise;
    }
    EventType::Lecture
}
