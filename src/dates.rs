//! Day-aligned date windows.
//!
//! Every function takes its reference instant explicitly; nothing in this
//! module reads the clock. Instants are naive local date-times in the
//! service's calendar.

use crate::types::DateFilter;
use chrono::{DateTime, Days, Local, NaiveDate, NaiveDateTime, NaiveTime};

/// Storage/text format for due dates. Fixed width, so text order is time order.
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Inclusive `[start, end]` interval of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateWindow {
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }
}

fn last_instant() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)
}

fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

/// 00:00:00.000 on the reference day.
pub fn start_of_day(reference: NaiveDateTime) -> NaiveDateTime {
    reference.date().and_time(NaiveTime::MIN)
}

/// 23:59:59.999 on the reference day.
pub fn end_of_day(reference: NaiveDateTime) -> NaiveDateTime {
    reference.date().and_time(last_instant())
}

pub fn end_of_today(reference: NaiveDateTime) -> NaiveDateTime {
    end_of_day(reference)
}

pub fn end_of_tomorrow(reference: NaiveDateTime) -> NaiveDateTime {
    add_days(reference.date(), 1).and_time(last_instant())
}

/// From the start of the reference day through the end of the seventh day after it.
pub fn next_7_days_window(reference: NaiveDateTime) -> DateWindow {
    DateWindow {
        start: start_of_day(reference),
        end: add_days(reference.date(), 7).and_time(last_instant()),
    }
}

/// From the start of `start`'s day through the end of `end`'s day.
pub fn range_window(start: NaiveDateTime, end: NaiveDateTime) -> DateWindow {
    DateWindow {
        start: start_of_day(start),
        end: end_of_day(end),
    }
}

impl DateFilter {
    /// The due-date window this filter selects, or `None` for no restriction.
    pub fn window(&self, reference: NaiveDateTime) -> Option<DateWindow> {
        match self {
            DateFilter::None => None,
            DateFilter::Today => Some(DateWindow {
                start: start_of_day(reference),
                end: end_of_today(reference),
            }),
            DateFilter::Tomorrow => {
                let end = end_of_tomorrow(reference);
                Some(DateWindow {
                    start: start_of_day(end),
                    end,
                })
            }
            DateFilter::NextWeek => Some(next_7_days_window(reference)),
        }
    }
}

/// Parse a due date from text, keeping only its calendar day.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS[.fff]`, the storage format and
/// RFC 3339 timestamps, which are converted to the server's local day first.
pub fn parse_due_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", STORAGE_FORMAT, "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.date());
        }
    }
    None
}

/// Render an instant in the storage format.
pub fn to_storage(instant: NaiveDateTime) -> String {
    instant.format(STORAGE_FORMAT).to_string()
}

/// Parse an instant stored in the storage format.
pub fn from_storage(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, STORAGE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

/// Every calendar day from `start` to `end`, inclusive. Empty when `end < start`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= end)
}
