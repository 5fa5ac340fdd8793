use chrono::{NaiveDate, Weekday};
use tracing::warn;

use crate::model::{Occurrence, WEEKDAYS};
use crate::parser::grid::Span;
use crate::parser::timerange::TimeRange;

/// Expand a span into concrete start/end timestamp pairs, one per active
/// week, in week-list order. A week with no calendar resolution is skipped
/// with a warning; the remaining weeks still materialize.
pub fn materialize(span: &Span, times: &TimeRange) -> Vec<Occurrence> {
    let Some(weekday) = weekday_of(&span.day) else {
        warn!("span at column {} has unmapped day label {:?}, dropped", span.start, span.day);
        return Vec::new();
    };

    let (Some(start_time), Some(end_time)) = (times.slot(span.start), times.slot(span.end)) else {
        // a span closed at the row boundary has no end-boundary label
        warn!(
            "no time boundary for {} columns {}..{}, span dropped",
            span.day, span.start, span.end
        );
        return Vec::new();
    };

    let mut occurrences = Vec::with_capacity(span.weeks.len());
    for &week in &span.weeks {
        let Some(date) = NaiveDate::from_isoywd_opt(span.year, week, weekday) else {
            warn!(
                "week {} of {} has no calendar date, skipping {} span at column {}",
                week, span.year, span.day, span.start
            );
            continue;
        };
        occurrences.push(Occurrence {
            start: date.and_time(start_time),
            end: date.and_time(end_time),
        });
    }

    occurrences
}

fn weekday_of(label: &str) -> Option<Weekday> {
    let idx = WEEKDAYS.iter().position(|d| *d == label)?;
    Weekday::try_from(idx as u8).ok()
}
