//! Generic resource handlers: list, get, create, replace, delete. One set,
//! instantiated per entity through the registry; the entity is resolved from
//! the request path.

use crate::case::{object_keys_to_camel_case, object_keys_to_snake_case, to_camel_case};
use crate::error::AppError;
use crate::registry::{self, EntityDef};
use crate::repository::Repository;
use crate::state::AppState;
use crate::validate::validate;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{Map, Value};

fn resolve(segment: &str) -> Result<&'static EntityDef, AppError> {
    registry::by_path(segment)
        .ok_or_else(|| AppError::NotFound(format!("unknown resource '{}'", segment)))
}

fn parse_id(raw: &str) -> Result<i64, AppError> {
    match raw.parse::<i64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AppError::BadRequest("invalid id".into())),
    }
}

fn body_to_map(value: Value) -> Result<Map<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

/// Row as stored (snake_case keys) -> API record (camelCase keys).
fn to_api(mut row: Value) -> Value {
    if let Value::Object(ref mut map) = row {
        object_keys_to_camel_case(map);
    }
    row
}

/// Validate the camelCase body, then produce the snake_cased, prepared map the
/// repository persists. Shared by create and replace.
fn prepare_body(entity: &EntityDef, body: Value) -> Result<Map<String, Value>, AppError> {
    let mut body = body_to_map(body)?;
    validate(entity, &body)?;
    object_keys_to_snake_case(&mut body);
    if let Some(prepare) = entity.prepare {
        prepare(&mut body)?;
    }
    Ok(body)
}

/// Reject values already held by another record in a unique column.
async fn check_unique(
    repo: &Repository,
    entity: &EntityDef,
    body: &Map<String, Value>,
    exclude_id: Option<i64>,
) -> Result<(), AppError> {
    for col in entity.unique_columns() {
        let value = match body.get(col.name) {
            Some(v) if !v.is_null() => v,
            _ => continue,
        };
        if repo.exists_where(entity, col.name, value, exclude_id).await? {
            return Err(AppError::Conflict(format!(
                "{} already in use",
                to_camel_case(col.name)
            )));
        }
    }
    Ok(())
}

pub async fn list(
    State(state): State<AppState>,
    Path(resource): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let entity = resolve(&resource)?;
    let rows = state.repository().find_all(entity).await?;
    let records: Vec<Value> = rows.into_iter().map(to_api).collect();
    Ok((StatusCode::OK, Json(Value::Array(records))))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let entity = resolve(&resource)?;
    let id = parse_id(&id)?;
    let row = state
        .repository()
        .find_by_id(entity, id)
        .await?
        .ok_or_else(|| entity.not_found())?;
    Ok((StatusCode::OK, Json(to_api(row))))
}

pub async fn create(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let entity = resolve(&resource)?;
    let body = prepare_body(entity, body)?;
    let repo = state.repository();
    check_unique(&repo, entity, &body, None).await?;
    let row = repo.create(entity, &body).await?;
    let mut response = Map::new();
    response.insert(
        "message".to_string(),
        Value::String(format!("{} created successfully", entity.display)),
    );
    response.insert(entity.response_key.to_string(), to_api(row));
    Ok((StatusCode::CREATED, Json(Value::Object(response))))
}

pub async fn replace(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let entity = resolve(&resource)?;
    // Validation failures win over not-found: the body is checked before the
    // record is looked up.
    let body = prepare_body(entity, body)?;
    let id = parse_id(&id)?;
    let repo = state.repository();
    check_unique(&repo, entity, &body, Some(id)).await?;
    let row = repo
        .replace(entity, id, &body)
        .await?
        .ok_or_else(|| entity.not_found())?;
    Ok((StatusCode::OK, Json(to_api(row))))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let entity = resolve(&resource)?;
    let id = parse_id(&id)?;
    if !state.repository().delete(entity, id).await? {
        return Err(entity.not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}
