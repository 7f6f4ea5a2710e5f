//! Task queries and mutations.

use super::Database;
use super::categories::category_exists_internal;
use crate::dates::{self, DateWindow, range_window};
use crate::error::{TodoError, TodoResult};
use crate::types::{DateFilter, NewTask, Priority, Task, TaskId, TaskStatus};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, info};

/// Build the ORDER BY clause for a task listing.
/// Priority ascending puts the stored "none" marker after 1-4.
fn build_order_clause(filter: DateFilter) -> &'static str {
    match filter {
        DateFilter::NextWeek => "t.priority ASC, t.due_date DESC, t.id ASC",
        _ => "t.priority ASC, t.id ASC",
    }
}

pub fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    let id: TaskId = row.get("id")?;
    let name: String = row.get("name")?;
    let description: String = row.get("description")?;
    let priority: i64 = row.get("priority")?;
    let due_date: String = row.get("due_date")?;
    let category_name: Option<String> = row.get("category_name")?;
    let status: String = row.get("status")?;

    let due_date = dates::from_storage(&due_date).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            Type::Text,
            format!("invalid due_date '{}'", due_date).into(),
        )
    })?;
    let status = TaskStatus::parse(&status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            Type::Text,
            format!("invalid status '{}'", status).into(),
        )
    })?;

    Ok(Task {
        id,
        name,
        description,
        priority: Priority::from_stored(priority),
        due_date,
        category_name,
        status,
    })
}

/// Internal helper to get a task using an existing connection (avoids deadlock).
fn get_task_internal(conn: &Connection, task_id: TaskId) -> TodoResult<Option<Task>> {
    let task = conn
        .query_row(
            "SELECT * FROM Task WHERE id = ?1",
            params![task_id],
            parse_task_row,
        )
        .optional()?;
    Ok(task)
}

/// Select tasks, optionally restricted to a category and a due-date window.
fn query_tasks(
    conn: &Connection,
    category: Option<&str>,
    window: Option<DateWindow>,
    order_clause: &str,
) -> TodoResult<Vec<Task>> {
    let mut sql = String::from("SELECT t.* FROM Task t WHERE 1 = 1");
    let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(name) = category {
        sql.push_str(" AND t.category_name = ?");
        params_vec.push(Box::new(name.to_string()));
    }

    if let Some(window) = window {
        sql.push_str(" AND t.due_date >= ? AND t.due_date <= ?");
        params_vec.push(Box::new(dates::to_storage(window.start)));
        params_vec.push(Box::new(dates::to_storage(window.end)));
    }

    sql.push_str(" ORDER BY ");
    sql.push_str(order_clause);

    let params_refs: Vec<&dyn rusqlite::ToSql> =
        params_vec.iter().map(|b| b.as_ref()).collect();

    let mut stmt = conn.prepare(&sql)?;
    let tasks = stmt
        .query_map(params_refs.as_slice(), parse_task_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(tasks)
}

fn require_text(field: &str, value: &str, message: &str) -> TodoResult<()> {
    if value.trim().is_empty() {
        return Err(TodoError::validation(field, message));
    }
    Ok(())
}

impl Database {
    /// Get a single task by id.
    pub fn get_task(&self, task_id: TaskId) -> TodoResult<Option<Task>> {
        self.with_conn(|conn| get_task_internal(conn, task_id))
    }

    /// List all tasks, restricted by a due-date filter relative to `now`.
    pub fn list_tasks(&self, filter: DateFilter, now: NaiveDateTime) -> TodoResult<Vec<Task>> {
        self.with_conn(|conn| {
            query_tasks(conn, None, filter.window(now), build_order_clause(filter))
        })
    }

    /// List tasks of one category. An unknown category yields an empty list.
    pub fn list_tasks_by_category(
        &self,
        category_name: &str,
        filter: DateFilter,
        now: NaiveDateTime,
    ) -> TodoResult<Vec<Task>> {
        let category_name = category_name.trim();
        self.with_conn(|conn| {
            query_tasks(
                conn,
                Some(category_name),
                filter.window(now),
                build_order_clause(filter),
            )
        })
    }

    /// Create a new active task.
    ///
    /// The due date is normalized to the end of its day. When a category is
    /// given it must already exist; the check and the insert share a transaction.
    pub fn create_task(&self, input: NewTask) -> TodoResult<Task> {
        require_text("name", &input.name, "Task name is required")?;
        require_text(
            "description",
            &input.description,
            "Task description is required",
        )?;

        let category = input
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        let due_date = dates::end_of_day(input.due_date);

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            if let Some(ref name) = category
                && !category_exists_internal(&tx, name)?
            {
                return Err(TodoError::unknown_category(name));
            }

            tx.execute(
                "INSERT INTO Task (name, description, priority, due_date, category_name, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    input.name,
                    input.description,
                    Priority::to_stored(input.priority),
                    dates::to_storage(due_date),
                    category,
                    TaskStatus::Active.as_str(),
                ],
            )?;
            let id = tx.last_insert_rowid();

            tx.commit()?;
            info!(task_id = id, category = ?category, "Task created");

            Ok(Task {
                id,
                name: input.name,
                description: input.description,
                priority: input.priority,
                due_date,
                category_name: category,
                status: TaskStatus::Active,
            })
        })
    }

    /// Set a task's status to the opposite of `current_status`.
    ///
    /// `current_status` is the caller's view of the task; concurrent toggles
    /// resolve last-writer-wins.
    pub fn change_task_status(
        &self,
        task_id: TaskId,
        current_status: TaskStatus,
    ) -> TodoResult<Task> {
        let new_status = current_status.toggled();

        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE Task SET status = ?1 WHERE id = ?2",
                params![new_status.as_str(), task_id],
            )?;
            if updated == 0 {
                return Err(TodoError::task_not_found(task_id));
            }

            debug!(task_id, status = %new_status, "Task status changed");
            get_task_internal(conn, task_id)?.ok_or_else(|| TodoError::task_not_found(task_id))
        })
    }

    /// Delete a task.
    pub fn delete_task(&self, task_id: TaskId) -> TodoResult<()> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM Task WHERE id = ?1", params![task_id])?;
            if deleted == 0 {
                return Err(TodoError::task_not_found(task_id));
            }
            info!(task_id, "Task deleted");
            Ok(())
        })
    }

    /// Tasks due within `[start-of-day(start), end-of-day(end)]`, ordered by due date.
    pub fn generate_report(&self, start: NaiveDate, end: NaiveDate) -> TodoResult<Vec<Task>> {
        if end < start {
            return Err(TodoError::validation(
                "endDate",
                format!("endDate {} is before startDate {}", end, start),
            ));
        }

        let window = range_window(start.and_time(NaiveTime::MIN), end.and_time(NaiveTime::MIN));
        self.with_conn(|conn| query_tasks(conn, None, Some(window), "t.due_date ASC, t.id ASC"))
    }
}
