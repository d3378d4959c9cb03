//! sqlx-backed implementations of the storage traits.

use crate::sql::PgBindValue;
use crate::store::{KeyPage, KvStore, RelationalStore, StoreError};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

/// Relational store over a PostgreSQL pool: dynamic statements, positionally
/// bound parameters, rows decoded back to JSON objects.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }
}

#[async_trait]
impl RelationalStore for PgStore {
    async fn fetch_all(&self, sql: &str, params: &[Value]) -> Result<Vec<Value>, StoreError> {
        tracing::debug!(sql = %sql, params = ?params, "query");
        let mut query = sqlx::query(sql);
        for p in params {
            query = query.bind(PgBindValue::from_json(p));
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64, StoreError> {
        tracing::debug!(sql = %sql, params = ?params, "execute");
        let mut query = sqlx::query(sql);
        for p in params {
            query = query.bind(PgBindValue::from_json(p));
        }
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

fn row_to_json(row: &sqlx::postgres::PgRow) -> Value {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = serde_json::Map::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, name));
    }
    Value::Object(map)
}

fn cell_to_value(row: &sqlx::postgres::PgRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(name) {
        return Value::Number(n.into());
    }
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
    if let Ok(Some(u)) = row.try_get::<Option<uuid::Uuid>, _>(name) {
        return Value::String(u.to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(name) {
        return Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<serde_json::Value>, _>(name) {
        return j;
    }
    Value::Null
}

/// Backing table for all PostgreSQL-hosted KV namespaces.
const KV_TABLE: &str = "kv_data";

/// Create the KV table if missing. Call once before building the registry.
pub async fn ensure_kv_table(pool: &PgPool) -> Result<(), StoreError> {
    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            namespace TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            PRIMARY KEY (namespace, key)
        )
        "#,
        KV_TABLE
    );
    sqlx::query(&ddl).execute(pool).await?;
    Ok(())
}

/// One KV namespace stored in the shared table. Listing uses keyset
/// pagination: the cursor is the last key of the previous page, a short page
/// sets `list_complete`.
pub struct PgKvStore {
    pool: PgPool,
    namespace: String,
    page_size: i64,
}

impl PgKvStore {
    pub fn new(pool: PgPool, namespace: impl Into<String>, page_size: i64) -> Self {
        PgKvStore {
            pool,
            namespace: namespace.into(),
            page_size: page_size.max(1),
        }
    }
}

#[async_trait]
impl KvStore for PgKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let sql = format!(
            "SELECT value FROM {} WHERE namespace = $1 AND key = $2",
            KV_TABLE
        );
        tracing::debug!(namespace = %self.namespace, key = %key, "kv get");
        let row: Option<(String,)> = sqlx::query_as(&sql)
            .bind(&self.namespace)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.0))
    }

    async fn get_many(&self, keys: &[String]) -> Result<Vec<Option<String>>, StoreError> {
        let sql = format!(
            "SELECT key, value FROM {} WHERE namespace = $1 AND key = ANY($2)",
            KV_TABLE
        );
        tracing::debug!(namespace = %self.namespace, count = keys.len(), "kv get_many");
        let rows: Vec<(String, String)> = sqlx::query_as(&sql)
            .bind(&self.namespace)
            .bind(keys)
            .fetch_all(&self.pool)
            .await?;
        let found: std::collections::HashMap<String, String> = rows.into_iter().collect();
        Ok(keys.iter().map(|k| found.get(k).cloned()).collect())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let sql = format!(
            r#"
            INSERT INTO {} (namespace, key, value, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (namespace, key)
            DO UPDATE SET value = $3, updated_at = NOW()
            "#,
            KV_TABLE
        );
        tracing::debug!(namespace = %self.namespace, key = %key, "kv put");
        sqlx::query(&sql)
            .bind(&self.namespace)
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list(&self, cursor: Option<&str>) -> Result<KeyPage, StoreError> {
        tracing::debug!(namespace = %self.namespace, cursor = ?cursor, "kv list");
        let keys: Vec<(String,)> = match cursor {
            Some(c) => {
                let sql = format!(
                    "SELECT key FROM {} WHERE namespace = $1 AND key > $2 ORDER BY key LIMIT $3",
                    KV_TABLE
                );
                sqlx::query_as(&sql)
                    .bind(&self.namespace)
                    .bind(c)
                    .bind(self.page_size)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT key FROM {} WHERE namespace = $1 ORDER BY key LIMIT $2",
                    KV_TABLE
                );
                sqlx::query_as(&sql)
                    .bind(&self.namespace)
                    .bind(self.page_size)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        let keys: Vec<String> = keys.into_iter().map(|r| r.0).collect();
        let list_complete = (keys.len() as i64) < self.page_size;
        let cursor = if list_complete {
            None
        } else {
            keys.last().cloned()
        };
        Ok(KeyPage {
            keys,
            cursor,
            list_complete,
        })
    }
}
