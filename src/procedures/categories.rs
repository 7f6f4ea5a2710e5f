//! Category procedures.

use super::{ProcedureInfo, ProcedureKind, parse_input, to_output};
use crate::db::Database;
use crate::error::TodoResult;
use serde::Deserialize;
use serde_json::Value;

pub fn get_procedures() -> Vec<ProcedureInfo> {
    vec![
        ProcedureInfo {
            name: "getAllCategories",
            kind: ProcedureKind::Query,
            description: "List every category.",
        },
        ProcedureInfo {
            name: "createCategory",
            kind: ProcedureKind::Mutation,
            description: "Create a category; fails with CONFLICT if the name is taken.",
        },
        ProcedureInfo {
            name: "deleteCategory",
            kind: ProcedureKind::Mutation,
            description: "Delete a category; its tasks are kept with category_name cleared.",
        },
    ]
}

#[derive(Debug, Deserialize)]
struct CategoryNameInput {
    #[serde(default)]
    name: String,
}

pub fn get_all_categories(db: &Database, _input: Value) -> TodoResult<Value> {
    to_output(&db.list_categories()?)
}

pub fn create_category(db: &Database, input: Value) -> TodoResult<Value> {
    let input: CategoryNameInput = parse_input("createCategory", input)?;
    let category = db.create_category(&input.name)?;
    to_output(&category)
}

pub fn delete_category(db: &Database, input: Value) -> TodoResult<Value> {
    let input: CategoryNameInput = parse_input("deleteCategory", input)?;
    db.delete_category(&input.name)?;
    Ok(Value::Null)
}
