//! Core types for the to-do service.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Task identifier, assigned by storage on insert.
pub type TaskId = i64;

/// Storage encoding of "no priority". Never leaves the `db` module.
pub(crate) const PRIORITY_NONE_SENTINEL: i64 = 5;

/// Task priority, 1 is the most urgent.
///
/// "No priority" is modelled as `Option<Priority>::None` and sorts after
/// every explicit priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    P1 = 1,
    P2 = 2,
    P3 = 3,
    P4 = 4,
}

impl Priority {
    pub fn as_i64(self) -> i64 {
        self as i64
    }

    /// Parse the wire encoding. `5` is the legacy "none" marker.
    pub fn from_wire(value: i64) -> Result<Option<Self>, String> {
        match value {
            1 => Ok(Some(Priority::P1)),
            2 => Ok(Some(Priority::P2)),
            3 => Ok(Some(Priority::P3)),
            4 => Ok(Some(Priority::P4)),
            PRIORITY_NONE_SENTINEL => Ok(None),
            other => Err(format!(
                "priority must be 1-4 or null (got {})",
                other
            )),
        }
    }

    /// Decode a stored priority column.
    pub(crate) fn from_stored(value: i64) -> Option<Self> {
        Self::from_wire(value).ok().flatten()
    }

    /// Encode an optional priority for storage.
    pub(crate) fn to_stored(priority: Option<Self>) -> i64 {
        priority.map_or(PRIORITY_NONE_SENTINEL, Priority::as_i64)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i64())
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_i64())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        match Priority::from_wire(value).map_err(serde::de::Error::custom)? {
            Some(priority) => Ok(priority),
            None => Err(serde::de::Error::custom(
                "priority 5 means none; send null instead",
            )),
        }
    }
}

/// Deserialize an optional priority, accepting `null`, 1-4, and the legacy `5`.
pub fn deserialize_optional_priority<'de, D>(deserializer: D) -> Result<Option<Priority>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<i64>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value) => Priority::from_wire(value).map_err(serde::de::Error::custom),
    }
}

/// Task completion status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Active,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Active => "active",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(TaskStatus::Active),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }

    /// The other status.
    pub fn toggled(self) -> Self {
        match self {
            TaskStatus::Active => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Active,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub description: String,
    pub priority: Option<Priority>,
    /// Always normalized to the last millisecond of its day.
    pub due_date: NaiveDateTime,
    pub category_name: Option<String>,
    pub status: TaskStatus,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

/// A named grouping label for tasks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
}

/// Due-date filter applied when listing tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFilter {
    #[default]
    None,
    Today,
    Tomorrow,
    NextWeek,
}

impl DateFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateFilter::None => "none",
            DateFilter::Today => "today",
            DateFilter::Tomorrow => "tomorrow",
            DateFilter::NextWeek => "next-week",
        }
    }

    /// Parse a filter name. Empty and `"none"` mean no filter.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "" | "none" => Some(DateFilter::None),
            "today" => Some(DateFilter::Today),
            "tomorrow" => Some(DateFilter::Tomorrow),
            "next-week" => Some(DateFilter::NextWeek),
            _ => None,
        }
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DateFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DateFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        match value {
            None => Ok(DateFilter::None),
            Some(s) => DateFilter::parse(&s).ok_or_else(|| {
                serde::de::Error::custom(format!(
                    "unknown dateFilter '{}' (expected today, tomorrow or next-week)",
                    s
                ))
            }),
        }
    }
}

/// Input for creating a task.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub name: String,
    pub description: String,
    pub priority: Option<Priority>,
    /// Any instant on the due day; the time of day is discarded.
    pub due_date: NaiveDateTime,
    pub category: Option<String>,
}

/// Completed-task count for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: chrono::NaiveDate,
    pub completed: u32,
}

/// Per-day completed-task counts over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub days: Vec<DailyCount>,
    pub total: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_wire_encoding() {
        assert_eq!(Priority::from_wire(1), Ok(Some(Priority::P1)));
        assert_eq!(Priority::from_wire(4), Ok(Some(Priority::P4)));
        assert_eq!(Priority::from_wire(5), Ok(None));
        assert!(Priority::from_wire(0).is_err());
        assert!(Priority::from_wire(6).is_err());
    }

    #[test]
    fn none_priority_sorts_last_in_storage() {
        let stored: Vec<i64> = [None, Some(Priority::P4), Some(Priority::P1)]
            .into_iter()
            .map(Priority::to_stored)
            .collect();
        assert_eq!(stored, vec![5, 4, 1]);
        assert_eq!(Priority::from_stored(5), None);
        assert_eq!(Priority::from_stored(2), Some(Priority::P2));
    }

    #[test]
    fn status_toggles_between_two_values() {
        assert_eq!(TaskStatus::Active.toggled(), TaskStatus::Completed);
        assert_eq!(TaskStatus::Completed.toggled().toggled(), TaskStatus::Completed);
        assert_eq!(TaskStatus::parse("archived"), None);
    }

    #[test]
    fn date_filter_deserializes_nullish_as_none() {
        let f: DateFilter = serde_json::from_str("null").unwrap();
        assert_eq!(f, DateFilter::None);
        let f: DateFilter = serde_json::from_str("\"next-week\"").unwrap();
        assert_eq!(f, DateFilter::NextWeek);
        assert!(serde_json::from_str::<DateFilter>("\"yesterday\"").is_err());
    }

    #[test]
    fn task_serializes_none_priority_as_null() {
        let task = Task {
            id: 1,
            name: "Pay taxes".into(),
            description: "Before the deadline".into(),
            priority: None,
            due_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_milli_opt(23, 59, 59, 999)
                .unwrap(),
            category_name: None,
            status: TaskStatus::Active,
        };
        let json = serde_json::to_value(&task).unwrap();
        assert!(json["priority"].is_null());
        assert_eq!(json["status"], "active");
        assert_eq!(json["due_date"], "2024-01-02T23:59:59.999");
    }
}
