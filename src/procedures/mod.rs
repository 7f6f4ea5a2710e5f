//! Typed procedure calls over the contract layer.
//!
//! Each procedure decodes a JSON input object into its typed input, runs the
//! matching database operation and encodes the result as JSON. This is the
//! outermost layer that receives the reference instant: callers pass `now`
//! explicitly, so every date-filtered procedure is deterministic.

pub mod categories;
pub mod report;
pub mod tasks;

use crate::db::Database;
use crate::error::{TodoError, TodoResult};
use chrono::NaiveDateTime;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

/// Whether a procedure reads or writes state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcedureKind {
    Query,
    Mutation,
}

/// Description of one callable procedure.
#[derive(Debug, Clone, Serialize)]
pub struct ProcedureInfo {
    pub name: &'static str,
    pub kind: ProcedureKind,
    pub description: &'static str,
}

/// Procedure handler that dispatches calls to the contract layer.
#[derive(Clone)]
pub struct ProcedureHandler {
    pub db: Arc<Database>,
}

impl ProcedureHandler {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Get all available procedures.
    pub fn get_procedures(&self) -> Vec<ProcedureInfo> {
        let mut procedures = Vec::new();
        procedures.extend(tasks::get_procedures());
        procedures.extend(categories::get_procedures());
        procedures.extend(report::get_procedures());
        procedures
    }

    /// Call a procedure by name.
    pub fn call(&self, name: &str, input: Value, now: NaiveDateTime) -> TodoResult<Value> {
        debug!(procedure = %name, "Dispatching procedure");
        match name {
            // Task procedures
            "getAllTasks" => tasks::get_all_tasks(&self.db, input, now),
            "getTasksByCategory" => tasks::get_tasks_by_category(&self.db, input, now),
            "createTask" => tasks::create_task(&self.db, input),
            "changeStatus" => tasks::change_status(&self.db, input),
            "deleteTask" => tasks::delete_task(&self.db, input),

            // Category procedures
            "getAllCategories" => categories::get_all_categories(&self.db, input),
            "createCategory" => categories::create_category(&self.db, input),
            "deleteCategory" => categories::delete_category(&self.db, input),

            // Report procedures
            "generateReport" => report::generate_report(&self.db, input),
            "generateReportSummary" => report::generate_report_summary(&self.db, input),

            _ => Err(TodoError::unknown_procedure(name)),
        }
    }
}

/// Decode a procedure input. `null` is treated as an empty object.
pub fn parse_input<T: DeserializeOwned>(procedure: &str, input: Value) -> TodoResult<T> {
    let input = if input.is_null() { json!({}) } else { input };
    serde_json::from_value(input).map_err(|e| {
        TodoError::validation(
            "input",
            format!("Invalid input for {}: {}", procedure, e),
        )
    })
}

/// Encode a procedure result.
pub fn to_output<T: Serialize>(value: &T) -> TodoResult<Value> {
    serde_json::to_value(value).map_err(TodoError::internal)
}

/// Parse a calendar date field.
pub fn parse_date_field(field: &str, value: Option<&str>) -> TodoResult<chrono::NaiveDate> {
    let text =
        value.ok_or_else(|| TodoError::validation(field, format!("{} is required", field)))?;
    crate::dates::parse_due_date(text).ok_or_else(|| {
        TodoError::validation(field, format!("{} is not a valid date: {}", field, text))
    })
}
