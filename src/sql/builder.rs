//! Builds parameterized SELECT, INSERT, UPDATE, DELETE text from an entity
//! definition. Identifiers come from the static registry only; every value is
//! a bind parameter.

use crate::registry::EntityDef;
use serde_json::{Map, Value};

/// Quote identifier for PostgreSQL (safe: only from the registry).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

/// SELECT list: id, every non-sensitive declared column, then timestamps.
/// Sensitive columns are excluded structurally so no row read from storage can
/// carry them.
fn select_column_list(entity: &EntityDef) -> String {
    let mut cols = vec![quoted("id")];
    cols.extend(
        entity
            .columns
            .iter()
            .filter(|c| !entity.is_sensitive(c.name))
            .map(|c| quoted(c.name)),
    );
    cols.push(quoted("created_at"));
    cols.push(quoted("updated_at"));
    cols.join(", ")
}

/// SELECT every row, oldest first.
pub fn select_all(entity: &EntityDef) -> String {
    format!(
        "SELECT {} FROM {} ORDER BY {}",
        select_column_list(entity),
        quoted(entity.table),
        quoted("id")
    )
}

/// SELECT one row by primary key. Caller binds the id as the sole param.
pub fn select_by_id(entity: &EntityDef) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = $1",
        select_column_list(entity),
        quoted(entity.table),
        quoted("id")
    )
}

/// INSERT the columns present in the snake_cased body; absent or null columns
/// are omitted so column defaults apply. Returns the stored row.
pub fn insert(entity: &EntityDef, body: &Map<String, Value>) -> QueryBuf {
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    let mut params = Vec::new();
    for col in entity.columns {
        match body.get(col.name) {
            Some(v) if !v.is_null() => {
                params.push(v.clone());
                cols.push(quoted(col.name));
                placeholders.push(format!("${}", params.len()));
            }
            _ => {}
        }
    }
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(entity.table),
        cols.join(", "),
        placeholders.join(", "),
        select_column_list(entity)
    );
    QueryBuf { sql, params }
}

/// Full-record replace: every declared column is overwritten. A column absent
/// from the body resets to its default (or NULL when it has none), and
/// updated_at is bumped. The id binds as the last param.
pub fn replace(entity: &EntityDef, id: i64, body: &Map<String, Value>) -> QueryBuf {
    let mut sets = Vec::new();
    let mut params = Vec::new();
    for col in entity.columns {
        match body.get(col.name) {
            Some(v) if !v.is_null() => {
                params.push(v.clone());
                sets.push(format!("{} = ${}", quoted(col.name), params.len()));
            }
            _ => {
                if col.default.is_some() {
                    sets.push(format!("{} = DEFAULT", quoted(col.name)));
                } else if col.nullable {
                    sets.push(format!("{} = NULL", quoted(col.name)));
                }
                // NOT NULL without default: validation guarantees presence.
            }
        }
    }
    sets.push(format!("{} = NOW()", quoted("updated_at")));
    params.push(Value::Number(id.into()));
    let sql = format!(
        "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
        quoted(entity.table),
        sets.join(", "),
        quoted("id"),
        params.len(),
        select_column_list(entity)
    );
    QueryBuf { sql, params }
}

/// DELETE one row by primary key; RETURNING distinguishes not-found. Caller
/// binds the id as the sole param.
pub fn delete(entity: &EntityDef) -> String {
    format!(
        "DELETE FROM {} WHERE {} = $1 RETURNING {}",
        quoted(entity.table),
        quoted("id"),
        quoted("id")
    )
}

/// Existence probe for a unique column, optionally excluding one row (the row
/// being replaced).
pub fn exists_where(
    entity: &EntityDef,
    column: &str,
    value: &Value,
    exclude_id: Option<i64>,
) -> QueryBuf {
    let mut params = vec![value.clone()];
    let mut sql = format!(
        "SELECT 1 FROM {} WHERE {} = $1",
        quoted(entity.table),
        quoted(column)
    );
    if let Some(id) = exclude_id {
        params.push(Value::Number(id.into()));
        sql.push_str(&format!(" AND {} <> ${}", quoted("id"), params.len()));
    }
    sql.push_str(" LIMIT 1");
    QueryBuf { sql, params }
}
