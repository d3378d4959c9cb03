//! Multi-key reads and writes against one namespace, with per-key result
//! shaping. Namespace resolution happens in the handler before these run.

use crate::error::ApiError;
use crate::store::KvStore;
use futures_util::future::try_join_all;
use serde_json::{Map, Value};

/// Split a comma-separated `keys` parameter: trimmed, empty entries dropped,
/// input order preserved.
pub fn parse_key_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect()
}

/// Fetch a single value. Absent key is a 404; backend failures echo the
/// namespace and key for diagnosis.
pub async fn get_one(
    store: &dyn KvStore,
    namespace: &str,
    key: &str,
) -> Result<String, ApiError> {
    match store.get(key).await {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(ApiError::NotFound(format!("key not found: {}", key))),
        Err(e) => Err(ApiError::Backend(format!("{}/{}: {}", namespace, key, e))),
    }
}

/// Multi-key get. The backend returns values positionally aligned with the
/// input keys; misses are dropped from the result rather than reported
/// per key. All misses is a 404 — the deliberate "nothing found" policy.
pub async fn get_many(
    store: &dyn KvStore,
    namespace: &str,
    keys: &[String],
) -> Result<Map<String, Value>, ApiError> {
    if keys.is_empty() {
        return Err(ApiError::EmptyInput("no keys supplied".into()));
    }
    let values = store
        .get_many(keys)
        .await
        .map_err(|e| ApiError::Backend(format!("{}: {}", namespace, e)))?;
    let mut out = Map::new();
    for (key, value) in keys.iter().zip(values) {
        if let Some(v) = value {
            out.insert(key.clone(), Value::String(v));
        }
    }
    if out.is_empty() {
        return Err(ApiError::NotFound(
            "no values found for the requested keys".into(),
        ));
    }
    Ok(out)
}

/// Multi-key put: all writes issued concurrently, the whole operation fails if
/// any one fails, completed writes are not rolled back. Returns the keys
/// written, in body order.
pub async fn put_many(
    store: &dyn KvStore,
    namespace: &str,
    entries: &Map<String, Value>,
) -> Result<Vec<String>, ApiError> {
    if entries.is_empty() {
        return Err(ApiError::EmptyInput("no entries supplied".into()));
    }
    let writes = entries.iter().map(|(key, value)| {
        let value = value_as_store_string(value);
        async move {
            store
                .put(key, &value)
                .await
                .map_err(|e| ApiError::Backend(format!("{}/{}: {}", namespace, key, e)))
        }
    });
    try_join_all(writes).await?;
    Ok(entries.keys().cloned().collect())
}

/// Stored values are strings; non-string JSON is stored in serialized form.
fn value_as_store_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{KeyPage, MemoryKv, StoreError};
    use async_trait::async_trait;
    use serde_json::json;

    struct FailingKv;

    #[async_trait]
    impl crate::store::KvStore for FailingKv {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError("connection reset".into()))
        }
        async fn get_many(&self, _keys: &[String]) -> Result<Vec<Option<String>>, StoreError> {
            Err(StoreError("connection reset".into()))
        }
        async fn put(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError("connection reset".into()))
        }
        async fn list(&self, _cursor: Option<&str>) -> Result<KeyPage, StoreError> {
            Err(StoreError("connection reset".into()))
        }
    }

    #[test]
    fn key_list_trims_and_drops_empties() {
        assert_eq!(parse_key_list("a, b ,,c,"), vec!["a", "b", "c"]);
        assert!(parse_key_list("").is_empty());
        assert!(parse_key_list(" , ,").is_empty());
    }

    #[tokio::test]
    async fn get_many_drops_misses() {
        let kv = MemoryKv::new();
        kv.put("a", "1").await.unwrap();
        kv.put("b", "2").await.unwrap();
        let out = get_many(&kv, "NS", &["a".into(), "missing".into(), "b".into()])
            .await
            .unwrap();
        assert_eq!(Value::Object(out), json!({"a": "1", "b": "2"}));
    }

    #[tokio::test]
    async fn get_many_all_misses_is_not_found() {
        let kv = MemoryKv::new();
        let err = get_many(&kv, "NS", &["x".into(), "y".into()])
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn get_many_rejects_empty_key_list() {
        let kv = MemoryKv::new();
        let err = get_many(&kv, "NS", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::EmptyInput(_)));
    }

    #[tokio::test]
    async fn get_one_miss_is_not_found() {
        let kv = MemoryKv::new();
        let err = get_one(&kv, "NS", "nope").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn backend_errors_carry_namespace_and_key() {
        let err = get_one(&FailingKv, "CACHE", "k1").await.unwrap_err();
        assert_eq!(err.to_string(), "CACHE/k1: connection reset");
    }

    #[tokio::test]
    async fn put_many_writes_all_entries() {
        let kv = MemoryKv::new();
        let entries = match json!({"a": "1", "b": 2, "c": {"nested": true}}) {
            Value::Object(m) => m,
            _ => unreachable!(),
        };
        let written = put_many(&kv, "NS", &entries).await.unwrap();
        assert_eq!(written, vec!["a", "b", "c"]);
        assert_eq!(kv.get("a").await.unwrap().as_deref(), Some("1"));
        assert_eq!(kv.get("b").await.unwrap().as_deref(), Some("2"));
        assert_eq!(
            kv.get("c").await.unwrap().as_deref(),
            Some(r#"{"nested":true}"#)
        );
    }

    #[tokio::test]
    async fn put_many_rejects_empty_object() {
        let kv = MemoryKv::new();
        let err = put_many(&kv, "NS", &Map::new()).await.unwrap_err();
        assert!(matches!(err, ApiError::EmptyInput(_)));
    }

    #[tokio::test]
    async fn put_many_surfaces_write_failure() {
        let entries = match json!({"a": "1"}) {
            Value::Object(m) => m,
            _ => unreachable!(),
        };
        let err = put_many(&FailingKv, "CACHE", &entries).await.unwrap_err();
        assert!(matches!(err, ApiError::Backend(_)));
    }
}
