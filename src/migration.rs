//! Apply the declared schema to the database: CREATE TABLE DDL generated from
//! the registry. Order follows foreign-key dependencies (registry order).

use crate::error::AppError;
use crate::registry::{EntityDef, ENTITIES};
use sqlx::PgPool;

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Create every entity table if it does not exist. Idempotent; run at startup
/// before the server accepts requests.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    for entity in ENTITIES {
        let ddl = create_table_sql(entity);
        tracing::debug!(table = entity.table, "ensuring table");
        sqlx::query(&ddl).execute(pool).await?;
    }
    Ok(())
}

/// DDL for one entity: surrogate key, declared columns with their NOT NULL /
/// DEFAULT / UNIQUE / REFERENCES clauses, and lifecycle timestamps owned by
/// the store.
fn create_table_sql(entity: &EntityDef) -> String {
    let mut defs = vec![format!("{} BIGSERIAL PRIMARY KEY", quote("id"))];
    for c in entity.columns {
        let mut def = format!("{} {}", quote(c.name), c.ty.sql());
        if !c.nullable {
            def.push_str(" NOT NULL");
        }
        if let Some(d) = c.default {
            def.push_str(" DEFAULT ");
            def.push_str(d);
        }
        if c.unique {
            def.push_str(" UNIQUE");
        }
        if let Some((table, column)) = c.references {
            def.push_str(&format!(" REFERENCES {} ({})", quote(table), quote(column)));
        }
        defs.push(def);
    }
    defs.push(format!(
        "{} TIMESTAMPTZ NOT NULL DEFAULT NOW()",
        quote("created_at")
    ));
    defs.push(format!(
        "{} TIMESTAMPTZ NOT NULL DEFAULT NOW()",
        quote("updated_at")
    ));
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
        quote(entity.table),
        defs.join(",\n  ")
    )
}
