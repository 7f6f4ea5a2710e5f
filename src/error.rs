//! Structured error types for contract operations.

use serde::Serialize;
use std::fmt;
use tracing::error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Rejected before touching storage
    ValidationError,

    // Storage state errors
    NotFound,
    Conflict,
    ReferenceError,

    // Internal errors
    InternalError,
    UnknownProcedure,
}

/// Structured error returned by every contract operation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TodoError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl TodoError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    // Convenience constructors

    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message).with_field(field)
    }

    pub fn task_not_found(task_id: i64) -> Self {
        Self::new(ErrorCode::NotFound, format!("Task not found: {}", task_id))
    }

    pub fn category_not_found(name: &str) -> Self {
        Self::new(ErrorCode::NotFound, format!("Category not found: {}", name))
    }

    pub fn category_exists() -> Self {
        Self::new(ErrorCode::Conflict, "Category already exists").with_field("name")
    }

    pub fn unknown_category(name: &str) -> Self {
        Self::new(
            ErrorCode::ReferenceError,
            format!("Category does not exist: {}", name),
        )
        .with_field("category")
    }

    pub fn unknown_procedure(name: &str) -> Self {
        Self::new(
            ErrorCode::UnknownProcedure,
            format!("Unknown procedure: {}", name),
        )
    }

    /// Wrap an unexpected failure. The detail is logged, never returned.
    pub fn internal(err: impl fmt::Display) -> Self {
        error!(error = %err, "Internal storage failure");
        Self::new(ErrorCode::InternalError, "Internal server error")
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code
    }
}

impl fmt::Display for TodoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TodoError {}

impl From<rusqlite::Error> for TodoError {
    fn from(err: rusqlite::Error) -> Self {
        TodoError::internal(err)
    }
}

// Allow using ? with anyhow errors by converting them
impl From<anyhow::Error> for TodoError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<TodoError>() {
            Ok(todo_err) => todo_err,
            Err(err) => TodoError::internal(err),
        }
    }
}

/// True when `err` is SQLite rejecting a duplicate primary/unique key.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
                && (e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                    || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE)
    )
}

/// Result type for contract operations.
pub type TodoResult<T> = std::result::Result<T, TodoError>;
