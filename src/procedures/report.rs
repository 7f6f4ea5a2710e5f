//! Report procedures.

use super::{ProcedureInfo, ProcedureKind, parse_date_field, parse_input, to_output};
use crate::db::Database;
use crate::error::TodoResult;
use crate::report::{check_summary_range, daily_completed_counts};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

pub fn get_procedures() -> Vec<ProcedureInfo> {
    vec![
        ProcedureInfo {
            name: "generateReport",
            kind: ProcedureKind::Query,
            description: "Tasks due between startDate and endDate, inclusive of both days.",
        },
        ProcedureInfo {
            name: "generateReportSummary",
            kind: ProcedureKind::Query,
            description: "Completed-task counts for each day between startDate and endDate.",
        },
    ]
}

#[derive(Debug, Deserialize)]
struct ReportInput {
    #[serde(rename = "startDate")]
    start_date: Option<String>,
    #[serde(rename = "endDate")]
    end_date: Option<String>,
}

impl ReportInput {
    fn range(&self) -> TodoResult<(NaiveDate, NaiveDate)> {
        let start = parse_date_field("startDate", self.start_date.as_deref())?;
        let end = parse_date_field("endDate", self.end_date.as_deref())?;
        Ok((start, end))
    }
}

pub fn generate_report(db: &Database, input: Value) -> TodoResult<Value> {
    let input: ReportInput = parse_input("generateReport", input)?;
    let (start, end) = input.range()?;
    to_output(&db.generate_report(start, end)?)
}

pub fn generate_report_summary(db: &Database, input: Value) -> TodoResult<Value> {
    let input: ReportInput = parse_input("generateReportSummary", input)?;
    let (start, end) = input.range()?;
    check_summary_range(start, end)?;
    let tasks = db.generate_report(start, end)?;
    to_output(&daily_completed_counts(start, end, &tasks))
}
