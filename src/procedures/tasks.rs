//! Task procedures.

use super::{ProcedureInfo, ProcedureKind, parse_date_field, parse_input, to_output};
use crate::db::Database;
use crate::error::{TodoError, TodoResult};
use crate::types::{
    DateFilter, NewTask, Priority, TaskId, TaskStatus, deserialize_optional_priority,
};
use chrono::{NaiveDateTime, NaiveTime};
use serde::Deserialize;
use serde_json::Value;

pub fn get_procedures() -> Vec<ProcedureInfo> {
    vec![
        ProcedureInfo {
            name: "getAllTasks",
            kind: ProcedureKind::Query,
            description: "List every task, optionally filtered by dateFilter (today, tomorrow, next-week).",
        },
        ProcedureInfo {
            name: "getTasksByCategory",
            kind: ProcedureKind::Query,
            description: "List the tasks of one category, with the same dateFilter options.",
        },
        ProcedureInfo {
            name: "createTask",
            kind: ProcedureKind::Mutation,
            description: "Create a task with name, description, priority (1-4 or null), due_date and optional category.",
        },
        ProcedureInfo {
            name: "changeStatus",
            kind: ProcedureKind::Mutation,
            description: "Flip a task between active and completed given its currentStatus.",
        },
        ProcedureInfo {
            name: "deleteTask",
            kind: ProcedureKind::Mutation,
            description: "Delete a task by taskId.",
        },
    ]
}

#[derive(Debug, Deserialize)]
struct ListTasksInput {
    #[serde(rename = "dateFilter", default)]
    date_filter: DateFilter,
}

#[derive(Debug, Deserialize)]
struct TasksByCategoryInput {
    category_name: String,
    #[serde(rename = "dateFilter", default)]
    date_filter: DateFilter,
}

#[derive(Debug, Deserialize)]
struct CreateTaskInput {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default, deserialize_with = "deserialize_optional_priority")]
    priority: Option<Priority>,
    due_date: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChangeStatusInput {
    #[serde(rename = "taskId")]
    task_id: TaskId,
    #[serde(rename = "currentStatus")]
    current_status: String,
}

#[derive(Debug, Deserialize)]
struct DeleteTaskInput {
    #[serde(rename = "taskId")]
    task_id: TaskId,
}

pub fn get_all_tasks(db: &Database, input: Value, now: NaiveDateTime) -> TodoResult<Value> {
    let input: ListTasksInput = parse_input("getAllTasks", input)?;
    let tasks = db.list_tasks(input.date_filter, now)?;
    to_output(&tasks)
}

pub fn get_tasks_by_category(
    db: &Database,
    input: Value,
    now: NaiveDateTime,
) -> TodoResult<Value> {
    let input: TasksByCategoryInput = parse_input("getTasksByCategory", input)?;
    let tasks = db.list_tasks_by_category(&input.category_name, input.date_filter, now)?;
    to_output(&tasks)
}

pub fn create_task(db: &Database, input: Value) -> TodoResult<Value> {
    let input: CreateTaskInput = parse_input("createTask", input)?;
    let due_day = parse_date_field("due_date", input.due_date.as_deref())?;

    let task = db.create_task(NewTask {
        name: input.name,
        description: input.description,
        priority: input.priority,
        due_date: due_day.and_time(NaiveTime::MIN),
        category: input.category,
    })?;
    to_output(&task)
}

pub fn change_status(db: &Database, input: Value) -> TodoResult<Value> {
    let input: ChangeStatusInput = parse_input("changeStatus", input)?;
    let current = TaskStatus::parse(&input.current_status).ok_or_else(|| {
        TodoError::validation(
            "currentStatus",
            format!(
                "currentStatus must be 'active' or 'completed' (got '{}')",
                input.current_status
            ),
        )
    })?;

    let task = db.change_task_status(input.task_id, current)?;
    to_output(&task)
}

pub fn delete_task(db: &Database, input: Value) -> TodoResult<Value> {
    let input: DeleteTaskInput = parse_input("deleteTask", input)?;
    db.delete_task(input.task_id)?;
    Ok(Value::Null)
}
