//! Key-value handlers: multi-get, single get, multi-put, full enumeration
//! against `/rest/KV`.

use crate::error::ApiError;
use crate::kv::{batch, list};
use crate::response::{success_keys, success_ok, success_written};
use crate::state::AppState;
use crate::store::KvStore;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use std::sync::Arc;

fn resolve_namespace(state: &AppState, namespace: &str) -> Result<Arc<dyn KvStore>, ApiError> {
    state
        .kv
        .get(namespace)
        .ok_or_else(|| ApiError::InvalidNamespace(format!("unknown namespace: {}", namespace)))
}

/// GET /rest/KV/:namespace — multi-key get when `keys` is supplied, otherwise
/// enumerate every key in the namespace.
pub async fn read_namespace(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<axum::response::Response, ApiError> {
    let store = resolve_namespace(&state, &namespace)?;
    let keys_param = params.into_iter().find(|(k, _)| k == "keys").map(|(_, v)| v);
    match keys_param {
        Some(raw) => {
            let keys = batch::parse_key_list(&raw);
            let values = batch::get_many(store.as_ref(), &namespace, &keys).await?;
            Ok(success_ok(Value::Object(values)).into_response())
        }
        None => {
            let keys = list::list_all_keys(store.as_ref(), &namespace).await?;
            Ok(success_keys(keys).into_response())
        }
    }
}

/// GET /rest/KV/:namespace/:key — single-key get; absent key is a 404.
pub async fn read_key(
    State(state): State<AppState>,
    Path((namespace, key)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let store = resolve_namespace(&state, &namespace)?;
    let value = batch::get_one(store.as_ref(), &namespace, &key).await?;
    Ok(success_ok(Value::String(value)))
}

/// PUT /rest/KV/:namespace — body is a key→value object; writes run
/// concurrently, fail-fast, no rollback.
pub async fn write_namespace(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let store = resolve_namespace(&state, &namespace)?;
    let entries = match body {
        Value::Object(m) => m,
        _ => {
            return Err(ApiError::InvalidBody(
                "body must be a JSON object of key/value pairs".into(),
            ))
        }
    };
    let written = batch::put_many(store.as_ref(), &namespace, &entries).await?;
    Ok(success_written(written))
}
