use tracing::debug;

use crate::document::Cell;
use crate::model::WEEKDAYS;

/// A contiguous run of occupied cells in one weekday row: one scheduled block
/// before classification. `end` is the column of the empty cell that closed
/// the run (the interior column count if the run reached the row boundary),
/// so `end > start` always holds.
#[derive(Debug, Clone)]
pub struct Span {
    pub day: String,
    pub start: usize,
    pub end: usize,
    pub raw: String,
    pub weeks: Vec<u32>,
    pub year: i32,
}

/// Scan one table row left to right and emit its spans. Cell alphabet:
/// `None` is a merged-cell continuation and preserves state, `Some("")`
/// closes an open span, any other text opens or extends one. Rows whose
/// day-label cell is not a weekday are not schedule rows and yield nothing.
pub fn scan_row(row: &[Cell], weeks: &[u32], year: i32) -> Vec<Span> {
    if row.len() < 2 {
        return Vec::new();
    }
    let day = match row[0].as_deref().map(str::trim) {
        Some(d) if WEEKDAYS.contains(&d) => d,
        other => {
            debug!("skipping row with day label {:?}", other);
            return Vec::new();
        }
    };

    let interior = &row[1..row.len() - 1];
    let mut spans = Vec::new();
    let mut open: Option<Span> = None;

    for (idx, cell) in interior.iter().enumerate() {
        match cell.as_deref() {
            None => {}
            Some("") => {
                if let Some(mut span) = open.take() {
                    span.end = idx;
                    spans.push(span);
                }
            }
            Some(text) => match open.as_mut() {
                // adjacent occupied cells belong to the same span; only an
                // empty gap separates two blocks
                Some(span) => {
                    span.raw.push('\n');
                    span.raw.push_str(text);
                }
                None => {
                    open = Some(Span {
                        day: day.to_string(),
                        start: idx,
                        end: 0,
                        raw: text.to_string(),
                        weeks: weeks.to_vec(),
                        year,
                    });
                }
            },
        }
    }

    // a run still open at the end of the row closes at the row boundary
    if let Some(mut span) = open.take() {
        span.end = interior.len();
        spans.push(span);
    }

    spans
}
