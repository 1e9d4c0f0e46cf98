use chrono::NaiveDate;

use crate::models::{DateRange, JourneyItem};

/// A journey-item date as it arrives from the store: a real calendar date,
/// a free-text placeholder the importer could not normalize (kept verbatim
/// for display), or nothing at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemDate {
    Parsed(NaiveDate),
    Raw(String),
    Absent,
}

impl ItemDate {
    pub fn from_raw(raw: Option<&str>) -> ItemDate {
        let raw = match raw {
            Some(value) if !value.is_empty() => value,
            _ => return ItemDate::Absent,
        };

        if !looks_like_iso_date(raw) {
            return ItemDate::Raw(raw.to_string());
        }

        match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => ItemDate::Parsed(date),
            Err(_) => ItemDate::Raw(raw.to_string()),
        }
    }

    /// Display string: parsed dates as `15 Jan 2024`, raw text unchanged,
    /// absent as nothing.
    pub fn display(&self) -> Option<String> {
        match self {
            ItemDate::Parsed(date) => Some(format_display(*date)),
            ItemDate::Raw(text) => Some(text.clone()),
            ItemDate::Absent => None,
        }
    }

    /// The calendar date, only when one was actually parsed. Raw text never
    /// participates in date arithmetic.
    pub fn as_parsed(&self) -> Option<NaiveDate> {
        match self {
            ItemDate::Parsed(date) => Some(*date),
            _ => None,
        }
    }
}

fn looks_like_iso_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit())
}

fn format_display(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

pub fn parse_display_date(raw: Option<&str>) -> Option<String> {
    ItemDate::from_raw(raw).display()
}

/// Pooled min/max over every parsed start and end date across the items.
/// Start and end fields go into the same pool, so a range can open on an
/// end date if that happens to be the earliest real date present.
pub fn compute_overall_date_range(items: &[JourneyItem]) -> DateRange {
    let mut dates: Vec<NaiveDate> = Vec::new();
    for item in items {
        dates.extend(item.start_date.as_parsed());
        dates.extend(item.end_date.as_parsed());
    }

    DateRange {
        start: dates.iter().min().copied().map(format_display),
        end: dates.iter().max().copied().map(format_display),
    }
}
