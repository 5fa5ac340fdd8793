use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;

use crate::document::Cell;
use crate::parser::PageError;

// The time header row renders each label three times at overlapping
// positions. The pattern pins down the non-redundant digit groups across the
// overlay; concatenating the captures in order yields the plain HH:MM label.
static OVERLAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d\d(\d)?\d?\d?(\d):(:):\d\d(\d)\d\d(\d)").unwrap());

/// The page's time axis: one slot start time per interior table column.
/// A span from column `a` to closing column `b` runs from `slot(a)` to
/// `slot(b)`, the start of the slot after its last occupied cell.
#[derive(Debug, Clone)]
pub struct TimeRange {
    slots: Vec<NaiveTime>,
}

impl TimeRange {
    pub fn slot(&self, column: usize) -> Option<NaiveTime> {
        self.slots.get(column).copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Decode the first table row into the page's time axis. Every interior cell
/// must decode; without the axis nothing on the page can be dated, so any
/// mismatch is fatal for the page.
pub fn reconstruct(page: usize, header_row: &[Cell]) -> Result<TimeRange, PageError> {
    if header_row.len() < 2 {
        return Err(PageError::MissingGrid { page });
    }

    let interior = &header_row[1..header_row.len() - 1];
    let mut slots = Vec::with_capacity(interior.len());

    for (column, cell) in interior.iter().enumerate() {
        let text = cell.as_deref().unwrap_or("");
        let time = decode_overlay(text)
            .and_then(|label| NaiveTime::parse_from_str(&label, "%H:%M").ok())
            .ok_or_else(|| PageError::TimeAxis {
                page,
                column,
                cell: text.to_string(),
            })?;
        slots.push(time);
    }

    Ok(TimeRange { slots })
}

fn decode_overlay(cell: &str) -> Option<String> {
    let caps = OVERLAY_RE.captures(cell)?;
    Some(
        (1..=5)
            .filter_map(|i| caps.get(i))
            .map(|m| m.as_str())
            .collect(),
    )
}
