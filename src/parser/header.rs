use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::model::Course;

// The header line ordering changed between document generations; both forms
// are recognized, first match wins.
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Vorlesungsplan für\s+([\w\- ]+?)\s+(\d{1,2})\. ?Sem\.\s*Gruppe\s*(\d{1,2})")
        .unwrap()
});
static HEADER_LEGACY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Vorlesungsplan für\s+(\d{1,2})\. ?Sem\.\s*([\w\- ]+?)-Gruppe\s*(\d{1,2})")
        .unwrap()
});
static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{4})\s*/\s*\d{2,4}\b").unwrap());
static BARE_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{4})\b").unwrap());

/// Metadata parsed from the first three text lines of a page. Advisory: a
/// header that matches neither grammar leaves the fields zero-valued, the
/// grid scan does not depend on it.
#[derive(Debug, Clone, Default)]
pub struct PageHeader {
    /// Course label as printed, e.g. "Elektrotechnik".
    pub title: String,
    pub course: Course,
    pub semester: u8,
    pub group: u8,
    pub year: i32,
    /// Calendar week numbers in which the page's blocks occur.
    pub weeks: Vec<u32>,
}

pub fn extract(lines: &[String]) -> PageHeader {
    let mut header = PageHeader::default();

    if let Some(line) = lines.first() {
        parse_title_line(line, &mut header);
    }
    if let Some(line) = lines.get(1) {
        header.year = parse_year(line);
    }
    if let Some(line) = lines.get(2) {
        header.weeks = parse_weeks(line);
    }

    header
}

fn parse_title_line(line: &str, header: &mut PageHeader) {
    let (label, semester, group) = if let Some(caps) = HEADER_RE.captures(line) {
        (caps[1].to_string(), caps[2].parse().ok(), caps[3].parse().ok())
    } else if let Some(caps) = HEADER_LEGACY_RE.captures(line) {
        (caps[2].to_string(), caps[1].parse().ok(), caps[3].parse().ok())
    } else {
        warn!("header line did not match either plan grammar: {line:?}");
        // the label after "für" is still better than nothing
        let label = line
            .split_once("für")
            .map(|(_, rest)| rest.trim().to_string())
            .unwrap_or_default();
        (label, None, None)
    };

    header.course = Course::from_label(&label);
    header.title = label;
    header.semester = semester.unwrap_or(0);
    header.group = group.unwrap_or(0);
}

/// The second header line carries the academic year as `YYYY/YY`; the first
/// calendar year is the one all week numbers resolve against.
fn parse_year(line: &str) -> i32 {
    let caps = YEAR_RE
        .captures(line)
        .or_else(|| BARE_YEAR_RE.captures(line));
    match caps {
        Some(caps) => caps[1].parse().unwrap_or(0),
        None => {
            warn!("no year found in header line: {line:?}");
            0
        }
    }
}

/// Week list line, `Kalenderwoche: 14-16, 20 Datum: ...`: comma-separated
/// tokens, each a single week number or an inclusive `a-b` range.
fn parse_weeks(line: &str) -> Vec<u32> {
    let body = line
        .split_once("Kalenderwoche:")
        .map(|(_, rest)| rest)
        .unwrap_or(line);
    let body = body.split("Datum:").next().unwrap_or("").replace(' ', "");

    let mut weeks = Vec::new();
    for token in body.split(',').filter(|t| !t.is_empty()) {
        match token.split_once('-') {
            Some((a, b)) => match (a.parse::<u32>(), b.parse::<u32>()) {
                (Ok(a), Ok(b)) => weeks.extend(a..=b),
                _ => warn!("skipping unreadable week range {token:?}"),
            },
            None => match token.parse::<u32>() {
                Ok(week) => weeks.push(week),
                Err(_) => warn!("skipping unreadable week number {token:?}"),
            },
        }
    }
    weeks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn full_header() {
        let header = extract(&lines(&[
            "Vorlesungsplan für   Elektrotechnik 1. Sem. Gruppe 4",
            "Wintersemester 2022/2023",
            "Kalenderwoche: 40-41, 44 Datum: 4/10/22 bis 4/11/22",
        ]));
        assert_eq!(header.title, "Elektrotechnik");
        assert_eq!(header.course, Course::Elektrotechnik);
        assert_eq!(header.semester, 1);
        assert_eq!(header.group, 4);
        assert_eq!(header.year, 2022);
        assert_eq!(header.weeks, vec![40, 41, 44]);
    }

    #[test]
    fn legacy_header_ordering() {
        let header = extract(&lines(&[
            "Vorlesungsplan für   3. Sem. Informatik-Gruppe 2",
            "Semesterplan 2023/24",
            "Kalenderwoche: 14-16, 20 Datum: 3/4/23 bis 19/5/23",
        ]));
        assert_eq!(header.course, Course::Informatik);
        assert_eq!(header.semester, 3);
        assert_eq!(header.group, 2);
        assert_eq!(header.year, 2023);
        assert_eq!(header.weeks, vec![14, 15, 16, 20]);
    }

    #[test]
    fn week_range_expansion() {
        assert_eq!(parse_weeks("Kalenderwoche: 14-16, 20"), vec![14, 15, 16, 20]);
    }

    #[test]
    fn week_list_skips_garbage_tokens() {
        assert_eq!(parse_weeks("Kalenderwoche: 14, x, 16-xx, 20 Datum: 1/1/23"), vec![14, 20]);
    }

    #[test]
    fn unmatched_header_degrades_to_zero_values() {
        let header = extract(&lines(&[
            "Stundenplan für Maschinenbau",
            "irgendwas",
            "keine Wochen hier",
        ]));
        assert_eq!(header.semester, 0);
        assert_eq!(header.group, 0);
        assert_eq!(header.course, Course::Unknown);
        assert_eq!(header.title, "Maschinenbau");
        assert_eq!(header.year, 0);
        assert!(header.weeks.is_empty());
    }

    #[test]
    fn missing_lines_are_fine() {
        let header = extract(&[]);
        assert_eq!(header.year, 0);
        assert!(header.weeks.is_empty());
    }
}
