//! Relational handlers: fetch, create, update, delete against `/rest/DB`.
//!
//! Query parameters arrive as an ordered list so filter predicates and their
//! bound values keep the query-string order. Reserved keys (`sort_by`,
//! `order`, `limit`, `offset`) never become filters.

use crate::error::ApiError;
use crate::response::{success_created, success_ok};
use crate::sql::{self, FetchOptions, SortOrder};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Map, Value};

fn parse_fetch_options(params: Vec<(String, String)>) -> FetchOptions {
    let mut opts = FetchOptions::default();
    for (k, v) in params {
        match k.as_str() {
            "sort_by" => opts.sort_by = Some(v),
            "order" => opts.order = SortOrder::parse(&v),
            // Non-numeric values drop the clause entirely.
            "limit" => opts.limit = v.parse().ok(),
            "offset" => opts.offset = v.parse().ok(),
            _ => opts.filters.push((k, v)),
        }
    }
    opts
}

/// Body must be a JSON object with at least one field; arrays, primitives and
/// empty objects are rejected before any backend call.
fn body_to_record(value: Value) -> Result<Map<String, Value>, ApiError> {
    let map = match value {
        Value::Object(m) => m,
        Value::Array(_) => {
            return Err(ApiError::InvalidBody(
                "body must be a JSON object, not an array".into(),
            ))
        }
        _ => return Err(ApiError::InvalidBody("body must be a JSON object".into())),
    };
    if map.is_empty() {
        return Err(ApiError::InvalidBody(
            "body must contain at least one field".into(),
        ));
    }
    Ok(map)
}

/// GET /rest/DB/:table — filtered, sorted, paginated row fetch.
pub async fn fetch_rows(
    State(state): State<AppState>,
    Path(table): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let opts = parse_fetch_options(params);
    let q = sql::select(&table, None, &opts);
    let rows = state.db.fetch_all(&q.sql, &q.params).await?;
    Ok(success_ok(rows))
}

/// GET /rest/DB/:table/:id — single-row fetch; filters still apply.
pub async fn fetch_row(
    State(state): State<AppState>,
    Path((table, id)): Path<(String, String)>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let opts = parse_fetch_options(params);
    let q = sql::select(&table, Some(&id), &opts);
    let rows = state.db.fetch_all(&q.sql, &q.params).await?;
    Ok(success_ok(rows))
}

/// POST /rest/DB/:table — 201 echoing the input payload.
pub async fn create_row(
    State(state): State<AppState>,
    Path(table): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let record = body_to_record(body)?;
    let q = sql::insert(&table, &record);
    state.db.execute(&q.sql, &q.params).await?;
    Ok(success_created(Value::Object(record)))
}

/// PUT|PATCH /rest/DB/:table/:id — values bound in SET order, id last.
pub async fn update_row(
    State(state): State<AppState>,
    Path((table, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let record = body_to_record(body)?;
    let q = sql::update(&table, &id, &record);
    state.db.execute(&q.sql, &q.params).await?;
    Ok(success_ok(Value::Object(record)))
}

/// DELETE /rest/DB/:table/:id.
pub async fn delete_row(
    State(state): State<AppState>,
    Path((table, id)): Path<(String, String)>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let q = sql::delete(&table, &id);
    let affected = state.db.execute(&q.sql, &q.params).await?;
    Ok(success_ok(json!({ "deleted": affected })))
}

/// Update and delete require a path id; the route table sends id-less
/// attempts here.
pub async fn reject_missing_id(Path(table): Path<String>) -> ApiError {
    ApiError::MissingRequiredId(format!("/DB/{} requires /{{id}}", table))
}
