//! Generic repository against PostgreSQL: the only seam through which
//! handlers touch storage. Rows travel as JSON objects with snake_case keys.

use crate::error::AppError;
use crate::registry::EntityDef;
use crate::sql::{self, PgBindValue, QueryBuf};
use serde_json::{Map, Value};
use sqlx::PgPool;

#[derive(Clone)]
pub struct Repository {
    pool: PgPool,
}

impl Repository {
    pub fn new(pool: PgPool) -> Self {
        Repository { pool }
    }

    /// Every record of the entity type, oldest first.
    pub async fn find_all(&self, entity: &EntityDef) -> Result<Vec<Value>, AppError> {
        let sql = sql::select_all(entity);
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    /// One record by primary key, or None.
    pub async fn find_by_id(&self, entity: &EntityDef, id: i64) -> Result<Option<Value>, AppError> {
        let sql = sql::select_by_id(entity);
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(row_to_json))
    }

    /// Insert one record; the store assigns the identifier and defaults.
    /// Returns the stored row.
    pub async fn create(&self, entity: &EntityDef, body: &Map<String, Value>) -> Result<Value, AppError> {
        let q = sql::insert(entity, body);
        tracing::debug!(sql = %q.sql, "query");
        let row = bind_all(sqlx::query(&q.sql), &q).fetch_one(&self.pool).await?;
        Ok(row_to_json(&row))
    }

    /// Overwrite every mutable column of one record. Returns the updated row,
    /// or None when no record has the identifier.
    pub async fn replace(
        &self,
        entity: &EntityDef,
        id: i64,
        body: &Map<String, Value>,
    ) -> Result<Option<Value>, AppError> {
        let q = sql::replace(entity, id, body);
        tracing::debug!(sql = %q.sql, id, "query");
        let row = bind_all(sqlx::query(&q.sql), &q).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(row_to_json))
    }

    /// Remove one record by primary key. Returns whether a record matched.
    pub async fn delete(&self, entity: &EntityDef, id: i64) -> Result<bool, AppError> {
        let sql = sql::delete(entity);
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.is_some())
    }

    /// Whether any record (other than `exclude_id`, when given) holds `value`
    /// in `column`. Used for uniqueness pre-checks.
    pub async fn exists_where(
        &self,
        entity: &EntityDef,
        column: &str,
        value: &Value,
        exclude_id: Option<i64>,
    ) -> Result<bool, AppError> {
        let q = sql::exists_where(entity, column, value, exclude_id);
        tracing::debug!(sql = %q.sql, "query");
        let row = bind_all(sqlx::query(&q.sql), &q).fetch_optional(&self.pool).await?;
        Ok(row.is_some())
    }
}

fn bind_all<'q>(
    mut query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    q: &'q QueryBuf,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    for p in &q.params {
        query = query.bind(PgBindValue::from_json(p));
    }
    query
}

fn row_to_json(row: &sqlx::postgres::PgRow) -> Value {
    use sqlx::{Column, Row};
    let mut map = serde_json::Map::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, name));
    }
    Value::Object(map)
}

fn cell_to_value(row: &sqlx::postgres::PgRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(name) {
        return Value::Bool(b);
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    Value::Null
}
