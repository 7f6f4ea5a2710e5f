//! Category operations.

use super::Database;
use crate::error::{TodoError, TodoResult, is_unique_violation};
use crate::types::Category;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};

/// Internal helper to check a category using an existing connection (avoids deadlock).
pub(crate) fn category_exists_internal(conn: &Connection, name: &str) -> TodoResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM Category WHERE name = ?1",
            params![name],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

impl Database {
    /// List every category, ordered by name.
    pub fn list_categories(&self) -> TodoResult<Vec<Category>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT name FROM Category ORDER BY name ASC")?;
            let categories = stmt
                .query_map([], |row| Ok(Category { name: row.get(0)? }))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(categories)
        })
    }

    /// Create a category. The name is trimmed and must be non-empty and unused.
    pub fn create_category(&self, name: &str) -> TodoResult<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TodoError::validation("name", "Category name is required"));
        }

        self.with_conn(|conn| {
            match conn.execute("INSERT INTO Category (name) VALUES (?1)", params![name]) {
                Ok(_) => {
                    info!(category = %name, "Category created");
                    Ok(Category {
                        name: name.to_string(),
                    })
                }
                Err(e) if is_unique_violation(&e) => {
                    debug!(category = %name, "Rejected duplicate category");
                    Err(TodoError::category_exists())
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    /// Delete a category and clear it from every task that references it.
    ///
    /// Both statements run in one transaction. Tasks are never deleted.
    pub fn delete_category(&self, name: &str) -> TodoResult<()> {
        let name = name.trim();
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            // Detach tasks first
            let detached = tx.execute(
                "UPDATE Task SET category_name = NULL WHERE category_name = ?1",
                params![name],
            )?;

            let deleted = tx.execute("DELETE FROM Category WHERE name = ?1", params![name])?;

            if deleted == 0 {
                // Dropping the transaction rolls back the update
                return Err(TodoError::category_not_found(name));
            }

            tx.commit()?;
            info!(category = %name, detached_tasks = detached, "Category deleted");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn create_trims_name() {
        let db = Database::open_in_memory().unwrap();
        let category = db.create_category("  Work ").unwrap();
        assert_eq!(category.name, "Work");
    }

    #[test]
    fn blank_name_is_rejected_before_storage() {
        let db = Database::open_in_memory().unwrap();
        let err = db.create_category("   ").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(db.list_categories().unwrap().is_empty());
    }

    #[test]
    fn duplicate_name_conflicts() {
        let db = Database::open_in_memory().unwrap();
        db.create_category("Home").unwrap();
        let err = db.create_category("Home").unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(db.list_categories().unwrap().len(), 1);
    }

    #[test]
    fn delete_matches_the_trimmed_name() {
        let db = Database::open_in_memory().unwrap();
        db.create_category(" Work").unwrap();
        db.delete_category(" Work").unwrap();
        assert!(db.list_categories().unwrap().is_empty());
    }

    #[test]
    fn deleting_missing_category_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        let err = db.delete_category("Nope").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
