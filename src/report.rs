//! Completed-task counts per day.

use crate::dates::days_between;
use crate::error::{TodoError, TodoResult};
use crate::types::{DailyCount, ReportSummary, Task};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Longest range, in days, a per-day summary may cover.
pub const MAX_SUMMARY_DAYS: i64 = 3660;

/// Reject summary ranges that would produce more than `MAX_SUMMARY_DAYS` rows.
pub fn check_summary_range(start: NaiveDate, end: NaiveDate) -> TodoResult<()> {
    let days = (end - start).num_days() + 1;
    if days > MAX_SUMMARY_DAYS {
        return Err(TodoError::validation(
            "endDate",
            format!(
                "Report range spans {} days; the limit is {}",
                days, MAX_SUMMARY_DAYS
            ),
        ));
    }
    Ok(())
}

/// Count completed tasks per calendar day in `[start, end]`.
///
/// Every day in the range gets an entry, zero when nothing was completed.
/// Tasks due outside the range are ignored.
pub fn daily_completed_counts(start: NaiveDate, end: NaiveDate, tasks: &[Task]) -> ReportSummary {
    let mut by_day: HashMap<NaiveDate, u32> = HashMap::new();
    for task in tasks.iter().filter(|t| t.is_completed()) {
        *by_day.entry(task.due_date.date()).or_default() += 1;
    }

    let days: Vec<DailyCount> = days_between(start, end)
        .map(|date| DailyCount {
            date,
            completed: by_day.get(&date).copied().unwrap_or(0),
        })
        .collect();
    let total = days.iter().map(|d| d.completed).sum();

    ReportSummary {
        start_date: start,
        end_date: end,
        days,
        total,
    }
}

/// Render a summary as a plain-text table.
pub fn format_table(summary: &ReportSummary) -> String {
    let mut out = String::from("Date           Completed Tasks\n");
    for day in &summary.days {
        out.push_str(&format!(
            "{:<15}{:>15}\n",
            day.date.format("%b %d, %Y").to_string(),
            day.completed
        ));
    }
    out.push_str(&format!("{:<15}{:>15}\n", "Total", summary.total));
    out
}
