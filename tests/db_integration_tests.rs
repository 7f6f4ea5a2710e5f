//! Integration tests for the database layer.
//!
//! These tests drive the contract operations against an in-memory SQLite
//! database with a fixed reference instant.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use todo_server::db::Database;
use todo_server::error::ErrorCode;
use todo_server::types::{DateFilter, NewTask, Priority, TaskStatus};

/// Helper to create a fresh in-memory database for testing.
fn setup_db() -> Database {
    Database::open_in_memory().expect("Failed to create in-memory database")
}

/// Reference instant used by every date-filtered query: 2024-03-15 09:30.
fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 15)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

fn task(name: &str, priority: Option<Priority>, due: NaiveDateTime) -> NewTask {
    NewTask {
        name: name.to_string(),
        description: format!("{} description", name),
        priority,
        due_date: due,
        category: None,
    }
}

fn in_category(mut input: NewTask, category: &str) -> NewTask {
    input.category = Some(category.to_string());
    input
}

fn names(tasks: &[todo_server::types::Task]) -> Vec<&str> {
    tasks.iter().map(|t| t.name.as_str()).collect()
}

mod task_tests {
    use super::*;

    #[test]
    fn create_task_normalizes_due_date_to_end_of_day() {
        let db = setup_db();

        let created = db
            .create_task(task("Water plants", Some(Priority::P2), now()))
            .expect("Failed to create task");

        assert_eq!(created.status, TaskStatus::Active);
        assert_eq!(
            created.due_date,
            NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_hms_milli_opt(23, 59, 59, 999)
                .unwrap()
        );

        let stored = db.get_task(created.id).unwrap().expect("task stored");
        assert_eq!(stored, created);
    }

    #[test]
    fn empty_name_is_rejected_and_nothing_is_stored() {
        let db = setup_db();

        let err = db.create_task(task("", None, now())).unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.field.as_deref(), Some("name"));
        assert_eq!(err.message, "Task name is required");
        assert!(db.list_tasks(DateFilter::None, now()).unwrap().is_empty());
    }

    #[test]
    fn empty_description_is_rejected() {
        let db = setup_db();
        let mut input = task("Call mom", None, now());
        input.description = "   ".to_string();

        let err = db.create_task(input).unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.field.as_deref(), Some("description"));
    }

    #[test]
    fn unknown_category_is_a_reference_error() {
        let db = setup_db();

        let err = db
            .create_task(in_category(task("Orphan", None, now()), "Nowhere"))
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ReferenceError);
        assert!(db.list_tasks(DateFilter::None, now()).unwrap().is_empty());
    }

    #[test]
    fn blank_category_means_no_category() {
        let db = setup_db();

        let created = db
            .create_task(in_category(task("Loose", None, now()), "  "))
            .unwrap();

        assert!(created.category_name.is_none());
    }

    #[test]
    fn list_orders_by_priority_with_none_last() {
        let db = setup_db();
        db.create_task(task("none", None, now())).unwrap();
        db.create_task(task("p3", Some(Priority::P3), now())).unwrap();
        db.create_task(task("p1", Some(Priority::P1), now())).unwrap();
        db.create_task(task("p1-later", Some(Priority::P1), now()))
            .unwrap();

        let tasks = db.list_tasks(DateFilter::None, now()).unwrap();

        assert_eq!(names(&tasks), vec!["p1", "p1-later", "p3", "none"]);
    }

    #[test]
    fn today_filter_includes_only_todays_tasks() {
        let db = setup_db();
        let late_tonight = now().date().and_hms_opt(23, 0, 0).unwrap();
        db.create_task(task("yesterday", None, now() - Duration::days(1)))
            .unwrap();
        db.create_task(task("early today", None, now().date().and_hms_opt(0, 0, 0).unwrap()))
            .unwrap();
        db.create_task(task("tonight", None, late_tonight)).unwrap();
        db.create_task(task("tomorrow", None, now() + Duration::days(1)))
            .unwrap();

        let tasks = db.list_tasks(DateFilter::Today, now()).unwrap();

        assert_eq!(names(&tasks), vec!["early today", "tonight"]);
    }

    #[test]
    fn tomorrow_filter_selects_the_next_day_only() {
        let db = setup_db();
        db.create_task(task("today", None, now())).unwrap();
        db.create_task(task("tomorrow", None, now() + Duration::days(1)))
            .unwrap();
        db.create_task(task("day after", None, now() + Duration::days(2)))
            .unwrap();

        let tasks = db.list_tasks(DateFilter::Tomorrow, now()).unwrap();

        assert_eq!(names(&tasks), vec!["tomorrow"]);
    }

    #[test]
    fn next_week_filter_orders_by_priority_then_due_date_descending() {
        let db = setup_db();
        db.create_task(task("past", Some(Priority::P1), now() - Duration::days(1)))
            .unwrap();
        db.create_task(task("soon", Some(Priority::P2), now() + Duration::days(1)))
            .unwrap();
        db.create_task(task("later", Some(Priority::P2), now() + Duration::days(6)))
            .unwrap();
        db.create_task(task("edge", Some(Priority::P1), now() + Duration::days(7)))
            .unwrap();
        db.create_task(task("too far", Some(Priority::P1), now() + Duration::days(8)))
            .unwrap();

        let tasks = db.list_tasks(DateFilter::NextWeek, now()).unwrap();

        assert_eq!(names(&tasks), vec!["edge", "later", "soon"]);
    }

    #[test]
    fn double_toggle_restores_status() {
        let db = setup_db();
        let created = db.create_task(task("Flip", None, now())).unwrap();

        let completed = db
            .change_task_status(created.id, TaskStatus::Active)
            .unwrap();
        assert_eq!(completed.status, TaskStatus::Completed);

        let active = db
            .change_task_status(created.id, completed.status)
            .unwrap();
        assert_eq!(active.status, TaskStatus::Active);
    }

    #[test]
    fn change_status_of_missing_task_is_not_found() {
        let db = setup_db();

        let err = db.change_task_status(42, TaskStatus::Active).unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn delete_task_removes_it() {
        let db = setup_db();
        let created = db.create_task(task("Gone", None, now())).unwrap();

        db.delete_task(created.id).unwrap();

        assert!(db.get_task(created.id).unwrap().is_none());
        let err = db.delete_task(created.id).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}

mod category_tests {
    use super::*;

    #[test]
    fn duplicate_category_is_a_conflict() {
        let db = setup_db();
        db.create_category("Work").unwrap();

        let err = db.create_category("Work").unwrap_err();

        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.message, "Category already exists");
        assert_eq!(db.list_categories().unwrap().len(), 1);
    }

    #[test]
    fn empty_category_name_is_rejected() {
        let db = setup_db();

        let err = db.create_category("").unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(db.list_categories().unwrap().is_empty());
    }

    #[test]
    fn categories_are_listed_by_name() {
        let db = setup_db();
        db.create_category("Work").unwrap();
        db.create_category("Home").unwrap();
        db.create_category("Errands").unwrap();

        let categories: Vec<String> = db
            .list_categories()
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();

        assert_eq!(categories, vec!["Errands", "Home", "Work"]);
    }

    #[test]
    fn by_category_listing_only_returns_members() {
        let db = setup_db();
        db.create_category("Home").unwrap();
        db.create_category("Work").unwrap();
        db.create_task(in_category(task("dishes", Some(Priority::P3), now()), "Home"))
            .unwrap();
        db.create_task(in_category(task("report", Some(Priority::P1), now()), "Work"))
            .unwrap();
        db.create_task(task("loose", None, now())).unwrap();

        let home = db
            .list_tasks_by_category("Home", DateFilter::None, now())
            .unwrap();
        assert_eq!(names(&home), vec!["dishes"]);

        let unknown = db
            .list_tasks_by_category("Garden", DateFilter::None, now())
            .unwrap();
        assert!(unknown.is_empty());
    }

    #[test]
    fn by_category_listing_applies_date_filter() {
        let db = setup_db();
        db.create_category("Home").unwrap();
        db.create_task(in_category(task("today", None, now()), "Home"))
            .unwrap();
        db.create_task(in_category(
            task("next month", None, now() + Duration::days(30)),
            "Home",
        ))
        .unwrap();
        db.create_task(in_category(
            task("last week", None, now() - Duration::days(7)),
            "Home",
        ))
        .unwrap();

        let tasks = db
            .list_tasks_by_category("Home", DateFilter::NextWeek, now())
            .unwrap();

        assert_eq!(names(&tasks), vec!["today"]);
    }

    #[test]
    fn by_category_listing_applies_today_filter() {
        let db = setup_db();
        db.create_category("Home").unwrap();
        db.create_category("Work").unwrap();
        db.create_task(in_category(task("home today", None, now()), "Home"))
            .unwrap();
        db.create_task(in_category(
            task("home tomorrow", None, now() + Duration::days(1)),
            "Home",
        ))
        .unwrap();
        db.create_task(in_category(
            task("home yesterday", None, now() - Duration::days(1)),
            "Home",
        ))
        .unwrap();
        db.create_task(in_category(task("work today", None, now()), "Work"))
            .unwrap();

        let tasks = db
            .list_tasks_by_category("Home", DateFilter::Today, now())
            .unwrap();

        assert_eq!(names(&tasks), vec!["home today"]);
    }

    #[test]
    fn by_category_listing_applies_tomorrow_filter() {
        let db = setup_db();
        db.create_category("Home").unwrap();
        db.create_task(in_category(task("today", Some(Priority::P1), now()), "Home"))
            .unwrap();
        db.create_task(in_category(
            task("tomorrow low", Some(Priority::P4), now() + Duration::days(1)),
            "Home",
        ))
        .unwrap();
        db.create_task(in_category(
            task("tomorrow high", Some(Priority::P2), now() + Duration::days(1)),
            "Home",
        ))
        .unwrap();
        db.create_task(in_category(
            task("in two days", None, now() + Duration::days(2)),
            "Home",
        ))
        .unwrap();
        db.create_task(task("tomorrow uncategorized", None, now() + Duration::days(1)))
            .unwrap();

        let tasks = db
            .list_tasks_by_category("Home", DateFilter::Tomorrow, now())
            .unwrap();

        assert_eq!(names(&tasks), vec!["tomorrow high", "tomorrow low"]);
    }

    #[test]
    fn padded_category_names_match_the_stored_name() {
        let db = setup_db();
        db.create_category(" Work ").unwrap();
        db.create_task(in_category(task("report", None, now()), "Work"))
            .unwrap();

        let tasks = db
            .list_tasks_by_category(" Work", DateFilter::None, now())
            .unwrap();
        assert_eq!(names(&tasks), vec!["report"]);

        db.delete_category(" Work").unwrap();
        assert!(db.list_categories().unwrap().is_empty());
    }

    #[test]
    fn delete_category_detaches_tasks() {
        let db = setup_db();
        db.create_category("Work").unwrap();
        let created = db
            .create_task(in_category(task("Pay taxes", Some(Priority::P1), now()), "Work"))
            .unwrap();
        db.create_task(task("Relax", None, now())).unwrap();

        let in_work = db
            .list_tasks_by_category("Work", DateFilter::None, now())
            .unwrap();
        assert_eq!(names(&in_work), vec!["Pay taxes"]);
        let all = db.list_tasks(DateFilter::None, now()).unwrap();
        assert_eq!(all[0].id, created.id);

        db.delete_category("Work").unwrap();

        assert!(db.list_categories().unwrap().is_empty());
        let survivor = db.get_task(created.id).unwrap().expect("task survives");
        assert!(survivor.category_name.is_none());
        assert_eq!(db.list_tasks(DateFilter::None, now()).unwrap().len(), 2);
    }

    #[test]
    fn delete_missing_category_is_not_found() {
        let db = setup_db();

        let err = db.delete_category("Ghost").unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
    }
}

mod report_tests {
    use super::*;
    use todo_server::report::daily_completed_counts;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn complete(db: &Database, input: NewTask) {
        let created = db.create_task(input).unwrap();
        db.change_task_status(created.id, TaskStatus::Active).unwrap();
    }

    #[test]
    fn report_covers_whole_days_of_the_range() {
        let db = setup_db();
        db.create_task(task("before", None, day(1).and_hms_opt(23, 0, 0).unwrap()))
            .unwrap();
        db.create_task(task("first", None, day(2).and_hms_opt(0, 0, 0).unwrap()))
            .unwrap();
        db.create_task(task("last", None, day(5).and_hms_opt(8, 0, 0).unwrap()))
            .unwrap();
        db.create_task(task("after", None, day(6).and_hms_opt(0, 0, 0).unwrap()))
            .unwrap();

        let tasks = db.generate_report(day(2), day(5)).unwrap();

        assert_eq!(names(&tasks), vec!["first", "last"]);
    }

    #[test]
    fn summary_counts_completed_tasks_per_day() {
        let db = setup_db();
        complete(&db, task("a", None, day(2).and_hms_opt(9, 0, 0).unwrap()));
        complete(&db, task("b", None, day(2).and_hms_opt(15, 0, 0).unwrap()));
        complete(&db, task("c", None, day(5).and_hms_opt(9, 0, 0).unwrap()));
        db.create_task(task("still open", None, day(3).and_hms_opt(9, 0, 0).unwrap()))
            .unwrap();

        let tasks = db.generate_report(day(1), day(7)).unwrap();
        let summary = daily_completed_counts(day(1), day(7), &tasks);

        assert_eq!(summary.days.len(), 7);
        assert_eq!(summary.days[1].completed, 2);
        assert_eq!(summary.days[2].completed, 0);
        assert_eq!(summary.days[4].completed, 1);
        assert_eq!(summary.total, 3);
        assert_eq!(
            summary.total,
            tasks.iter().filter(|t| t.is_completed()).count() as u32
        );
    }

    #[test]
    fn inverted_range_is_rejected() {
        let db = setup_db();

        let err = db.generate_report(day(5), day(2)).unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.field.as_deref(), Some("endDate"));
    }
}

mod file_tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn data_survives_reopen() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("todo.db");

        {
            let db = Database::open(&path).unwrap();
            db.create_category("Home").unwrap();
            db.create_task(in_category(task("Persist", None, now()), "Home"))
                .unwrap();
        }

        let db = Database::open(&path).unwrap();
        let tasks = db
            .list_tasks_by_category("Home", DateFilter::None, now())
            .unwrap();
        assert_eq!(names(&tasks), vec!["Persist"]);
    }
}
